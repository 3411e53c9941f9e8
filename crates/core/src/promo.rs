//! Promo code application state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::DiscountPercent;
use crate::types::Money;

/// Message shown when the code field is blank.
pub const MISSING_CODE_MESSAGE: &str = "Please enter a promocode";
/// Message shown when no email has been entered yet.
pub const MISSING_EMAIL_MESSAGE: &str = "Please enter your email first";
/// Message used when the verification round-trip fails.
pub const VERIFY_FAILED_MESSAGE: &str = "Error verifying promocode. Please try again.";
/// Fallback when the API rejects a code without saying why.
pub const INVALID_CODE_MESSAGE: &str = "Invalid promocode";

/// Outcome of the last verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromoStatus {
    #[default]
    Unverified,
    Valid,
    Invalid,
}

/// Reasons a promo verification request cannot be sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromoInputError {
    #[error("{}", MISSING_CODE_MESSAGE)]
    MissingCode,
    #[error("{}", MISSING_EMAIL_MESSAGE)]
    MissingEmail,
}

/// A validated promo verification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoRequest {
    pub code: String,
    pub user_email: String,
}

impl PromoRequest {
    /// Build a request from raw form input.
    ///
    /// The code is trimmed; there is no format check beyond non-emptiness.
    ///
    /// # Errors
    ///
    /// Returns [`PromoInputError`] when the code or the email is blank.
    pub fn new(code: &str, email: &str) -> Result<Self, PromoInputError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(PromoInputError::MissingCode);
        }

        let email = email.trim();
        if email.is_empty() {
            return Err(PromoInputError::MissingEmail);
        }

        Ok(Self {
            code: code.to_owned(),
            user_email: email.to_owned(),
        })
    }
}

/// The promo code state attached to a cart.
///
/// The discount only counts while the promo is applied: [`Self::discount_for`]
/// and [`Self::discount_percent`] report zero otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromoApplication {
    code: String,
    status: PromoStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    discount_percent: DiscountPercent,
    applied: bool,
}

impl PromoApplication {
    /// Record a successful verification of `code`.
    pub fn accept(&mut self, code: &str, percent: DiscountPercent) {
        self.code = code.trim().to_owned();
        self.status = PromoStatus::Valid;
        self.message = Some(format!("Promocode applied! {percent} discount"));
        self.discount_percent = percent;
        self.applied = true;
    }

    /// Record a rejected code; any previously applied discount is dropped.
    pub fn reject(&mut self, code: &str, message: impl Into<String>) {
        self.code = code.trim().to_owned();
        self.status = PromoStatus::Invalid;
        self.message = Some(message.into());
        self.discount_percent = DiscountPercent::ZERO;
        self.applied = false;
    }

    /// Reset to the unapplied defaults. Idempotent.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub const fn status(&self) -> PromoStatus {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub const fn is_applied(&self) -> bool {
        self.applied
    }

    /// The code to submit with an order, present only while applied.
    #[must_use]
    pub fn applied_code(&self) -> Option<&str> {
        self.applied.then_some(self.code.as_str())
    }

    /// The effective discount percentage.
    #[must_use]
    pub const fn discount_percent(&self) -> DiscountPercent {
        if self.applied {
            self.discount_percent
        } else {
            DiscountPercent::ZERO
        }
    }

    /// The discount taken off `subtotal`.
    #[must_use]
    pub fn discount_for(&self, subtotal: Money) -> Money {
        if self.applied {
            self.discount_percent.of(subtotal)
        } else {
            Money::ZERO
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_trims_code() {
        let request = PromoRequest::new("  SAVE10 ", "me@example.com").unwrap();
        assert_eq!(request.code, "SAVE10");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({ "code": "SAVE10", "userEmail": "me@example.com" })
        );
    }

    #[test]
    fn test_request_preconditions() {
        assert_eq!(
            PromoRequest::new("   ", "me@example.com"),
            Err(PromoInputError::MissingCode)
        );
        assert_eq!(PromoRequest::new("SAVE10", ""), Err(PromoInputError::MissingEmail));
        assert_eq!(
            PromoInputError::MissingEmail.to_string(),
            "Please enter your email first"
        );
    }

    #[test]
    fn test_accept_applies_discount() {
        let mut promo = PromoApplication::default();
        promo.accept("SAVE10", DiscountPercent::whole(10));

        assert!(promo.is_applied());
        assert_eq!(promo.status(), PromoStatus::Valid);
        assert_eq!(promo.applied_code(), Some("SAVE10"));
        assert_eq!(promo.message(), Some("Promocode applied! 10% discount"));
        assert_eq!(promo.discount_for(Money::from_cents(1000)), Money::from_cents(100));
    }

    #[test]
    fn test_reject_drops_previous_discount() {
        let mut promo = PromoApplication::default();
        promo.accept("SAVE10", DiscountPercent::whole(10));
        promo.reject("EXPIRED", "Promocode has expired");

        assert!(!promo.is_applied());
        assert_eq!(promo.status(), PromoStatus::Invalid);
        assert_eq!(promo.message(), Some("Promocode has expired"));
        assert_eq!(promo.applied_code(), None);
        assert_eq!(promo.discount_for(Money::from_cents(1000)), Money::ZERO);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut once = PromoApplication::default();
        once.accept("SAVE10", DiscountPercent::whole(10));
        once.clear();

        let mut twice = once.clone();
        twice.clear();

        assert_eq!(once, twice);
        assert_eq!(once, PromoApplication::default());
    }

    #[test]
    fn test_deserialized_unapplied_state_has_no_discount() {
        let promo: PromoApplication = serde_json::from_value(serde_json::json!({
            "code": "SAVE20",
            "status": "valid",
            "discountPercent": 20,
            "applied": false
        }))
        .unwrap();

        assert!(promo.discount_percent().is_zero());
        assert_eq!(promo.discount_for(Money::from_cents(2000)), Money::ZERO);
    }
}
