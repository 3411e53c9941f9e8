//! Response shapes returned by the food API.
//!
//! The API is not consistent about envelopes, so each endpoint gets a small
//! type here that normalizes what it returns to one internal value.

use grab_eat_core::{Category, DiscountPercent, MenuItem, Order};
use serde::Deserialize;

/// The `status` value the API uses for success.
pub const SUCCESS: &str = "success";

/// `{ status, message? }` acknowledgements for form submissions.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(SUCCESS)
    }
}

/// `GET /category/getAll`.
#[derive(Debug, Deserialize)]
pub struct CategoriesResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<Category>>,
}

impl CategoriesResponse {
    /// The category list, present only on a `status: "success"` response.
    #[must_use]
    pub fn into_categories(self) -> Option<Vec<Category>> {
        if self.status.as_deref() == Some(SUCCESS) {
            self.data
        } else {
            None
        }
    }
}

/// `GET /menu/getAll`: a bare array, `{data}`, or `{status: "success", data}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MenuResponse {
    Bare(Vec<MenuItem>),
    Wrapped {
        #[serde(default)]
        status: Option<String>,
        data: Vec<MenuItem>,
    },
}

impl MenuResponse {
    /// The menu items, or `None` when the envelope reports a failure.
    #[must_use]
    pub fn into_items(self) -> Option<Vec<MenuItem>> {
        match self {
            Self::Bare(items) => Some(items),
            Self::Wrapped { status, data } => match status.as_deref() {
                None | Some(SUCCESS) => Some(data),
                Some(_) => None,
            },
        }
    }
}

/// `POST /orders/verify-promocode`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PromoVerdict {
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub discount: Option<DiscountPercent>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /orders/create-checkout-session`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /orders/success?session_id=...`: `{status: "success", data}` or a
/// bare order document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OrderResponse {
    Wrapped { status: String, data: Order },
    Bare(Order),
}

impl OrderResponse {
    #[must_use]
    pub fn into_order(self) -> Option<Order> {
        match self {
            Self::Wrapped { status, data } if status == SUCCESS => Some(data),
            Self::Wrapped { .. } => None,
            Self::Bare(order) => Some(order),
        }
    }
}
