//! Checkout payloads and finalized orders.
//!
//! [`CheckoutRequest`] is the order draft the storefront submits to create a
//! payment session. [`Order`] is the server-owned result, read back by
//! payment session id on the confirmation page and never modified here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::customer::Customer;
use crate::pricing::OrderTotals;
use crate::promo::PromoApplication;
use crate::types::{Email, MenuItemId, Money, OrderId, OrderStatus, PaymentStatus};

/// The order draft posted to the checkout-session endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub customer_email: Email,
    pub customer_phone: String,
    pub delivery_address: String,
    pub items: Vec<CartLine>,
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub total_amount: Money,
    pub promocode_used: Option<String>,
    pub discount_amount: Money,
    /// The pre-discount subtotal, sent only when a promo is applied.
    pub original_total: Option<Money>,
}

impl CheckoutRequest {
    /// Assemble the draft from validated customer details, resolved cart
    /// lines, and totals computed by [`OrderTotals::compute`].
    #[must_use]
    pub fn new(
        customer: Customer,
        items: Vec<CartLine>,
        totals: &OrderTotals,
        promo: &PromoApplication,
    ) -> Self {
        let promocode_used = promo.applied_code().map(str::to_owned);
        let original_total = promocode_used.as_ref().map(|_| totals.subtotal);

        Self {
            customer_name: customer.name,
            customer_email: customer.email,
            customer_phone: customer.phone,
            delivery_address: customer.address,
            items,
            subtotal: totals.subtotal,
            delivery_fee: totals.delivery_fee,
            total_amount: totals.total,
            promocode_used,
            discount_amount: totals.discount_amount,
            original_total,
        }
    }
}

/// A line on a finalized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_item_id: Option<MenuItemId>,
    pub title: String,
    pub price: Money,
    pub quantity: u32,
    pub total: Money,
}

/// A finalized order as returned by the food API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub delivery_address: String,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub subtotal: Money,
    #[serde(default)]
    pub delivery_fee: Money,
    pub total_amount: Money,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promocode_used: Option<String>,
    #[serde(default)]
    pub discount_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Whether delivery was free for this order.
    #[must_use]
    pub const fn free_delivery(&self) -> bool {
        self.delivery_fee.is_zero()
    }
}
