//! Checkout: order draft, payment session, and handoff to the payment page.
//!
//! # Ordering
//!
//! 1. Validate customer details (no network on failure)
//! 2. Resolve cart lines against the menu and compute totals
//! 3. Create the payment session
//! 4. Build the payment page URL
//! 5. Persist the session id, then clear the cart and promo
//!
//! Nothing is written to storage until step 5, so any earlier failure leaves
//! the cart and promo exactly as they were and the customer can retry.

use grab_eat_core::cart::subtotal;
use grab_eat_core::{
    CheckoutRequest, CheckoutSessionId, CustomerInfo, DeliveryPolicy, FieldErrors, MenuItem,
    OrderTotals, PromoApplication,
};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::api::{ApiError, FoodApiClient};
use crate::services::cart::CartStore;
use crate::services::promo;
use crate::storage::{KeyValueStore, StorageError, keys};

/// Placeholder replaced by the payment session id in the payment URL template.
pub const SESSION_ID_PLACEHOLDER: &str = "{session_id}";

/// Generic failure notice shown when checkout cannot proceed.
pub const CHECKOUT_FAILED_MESSAGE: &str = "Checkout failed. Please try again.";

/// Errors in the payment URL template.
#[derive(Debug, Error)]
pub enum PaymentRedirectError {
    #[error("template must contain {{session_id}}")]
    MissingPlaceholder,
    #[error("template is not a valid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("template must use http or https")]
    UnsupportedScheme,
}

/// The hosted payment page, addressed by payment session id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRedirect {
    template: String,
}

impl PaymentRedirect {
    /// Validate a URL template containing [`SESSION_ID_PLACEHOLDER`].
    ///
    /// # Errors
    ///
    /// Returns [`PaymentRedirectError`] if the placeholder is missing or the
    /// template does not form an http(s) URL.
    pub fn new(template: impl Into<String>) -> Result<Self, PaymentRedirectError> {
        let redirect = Self {
            template: template.into(),
        };
        if !redirect.template.contains(SESSION_ID_PLACEHOLDER) {
            return Err(PaymentRedirectError::MissingPlaceholder);
        }
        let sample = redirect.url_for(&CheckoutSessionId::new("cs_sample"))?;
        if !matches!(sample.scheme(), "http" | "https") {
            return Err(PaymentRedirectError::UnsupportedScheme);
        }
        Ok(redirect)
    }

    /// The payment page for `session_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the substituted template is not a valid URL.
    pub fn url_for(&self, session_id: &CheckoutSessionId) -> Result<Url, url::ParseError> {
        let encoded: String =
            url::form_urlencoded::byte_serialize(session_id.as_str().as_bytes()).collect();
        Url::parse(&self.template.replace(SESSION_ID_PLACEHOLDER, &encoded))
    }
}

/// Reasons a checkout did not hand off to the payment page.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Customer details are incomplete. No request was sent.
    #[error("customer details are incomplete")]
    Validation(FieldErrors),

    /// Nothing in the cart resolves to a menu item. No request was sent.
    #[error("cart is empty")]
    EmptyCart,

    /// Loading the menu or creating the payment session failed.
    #[error("food API error: {0}")]
    Api(#[from] ApiError),

    /// The payment page URL could not be built.
    #[error("payment redirect error: {0}")]
    Redirect(#[from] url::ParseError),

    /// The session id could not be stored.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CheckoutError {
    /// The message to show the customer.
    #[must_use]
    pub fn customer_message(&self) -> &str {
        match self {
            Self::Validation(_) => "Please fill in all required fields",
            Self::EmptyCart => "Your cart is empty",
            Self::Api(e) => e.customer_message().unwrap_or(CHECKOUT_FAILED_MESSAGE),
            Self::Redirect(_) | Self::Storage(_) => CHECKOUT_FAILED_MESSAGE,
        }
    }
}

/// A successful handoff.
#[derive(Debug, Clone)]
pub struct CheckoutHandoff {
    pub session_id: CheckoutSessionId,
    pub redirect_url: Url,
    pub totals: OrderTotals,
}

/// Runs the checkout sequence.
pub struct CheckoutOrchestrator<'a> {
    api: &'a FoodApiClient,
    payment: &'a PaymentRedirect,
    delivery: &'a DeliveryPolicy,
}

impl<'a> CheckoutOrchestrator<'a> {
    #[must_use]
    pub const fn new(
        api: &'a FoodApiClient,
        payment: &'a PaymentRedirect,
        delivery: &'a DeliveryPolicy,
    ) -> Self {
        Self {
            api,
            payment,
            delivery,
        }
    }

    /// Check out the cart for `info`.
    ///
    /// On success the session id is stored, the cart and promo are cleared,
    /// and the payment page URL is returned.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`]; the cart and promo are untouched on every
    /// error path.
    #[instrument(skip_all)]
    pub async fn checkout<S: KeyValueStore>(
        &self,
        cart: &mut CartStore<S>,
        promo: &mut PromoApplication,
        info: &CustomerInfo,
    ) -> Result<CheckoutHandoff, CheckoutError> {
        let customer = info.validate().map_err(CheckoutError::Validation)?;
        if cart.cart().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let menu: Vec<MenuItem> = self.api.get_menu_items().await?;
        let lines = cart.cart().lines(&menu);
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let totals = OrderTotals::compute(subtotal(&lines), promo, self.delivery);
        let request = CheckoutRequest::new(customer, lines, &totals, promo);

        let session_id = self.api.create_checkout_session(&request).await?;
        let redirect_url = self.payment.url_for(&session_id)?;

        cart.store()
            .set(keys::SESSION_ID, session_id.as_str().to_string())
            .await?;

        // The handoff is committed from here on; cleanup failures are logged only
        if let Err(e) = cart.clear().await {
            tracing::warn!(error = %e, "Failed to clear stored cart after checkout");
        }
        promo.clear();
        if let Err(e) = promo::save(cart.store(), promo).await {
            tracing::warn!(error = %e, "Failed to clear stored promo after checkout");
        }

        tracing::info!(
            session_id = %session_id,
            total = %totals.total,
            "Checkout handed off to payment page"
        );

        Ok(CheckoutHandoff {
            session_id,
            redirect_url,
            totals,
        })
    }
}
