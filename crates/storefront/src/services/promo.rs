//! Promo code verification and the stored promo state.

use grab_eat_core::promo::{INVALID_CODE_MESSAGE, PromoInputError, VERIFY_FAILED_MESSAGE};
use grab_eat_core::{DiscountPercent, PromoApplication, PromoRequest};
use tracing::instrument;

use crate::api::FoodApiClient;
use crate::storage::{KeyValueStore, StorageError, keys};

/// Verifies promo codes against the food API.
pub struct PromoVerifier<'a> {
    api: &'a FoodApiClient,
}

impl<'a> PromoVerifier<'a> {
    #[must_use]
    pub const fn new(api: &'a FoodApiClient) -> Self {
        Self { api }
    }

    /// Verify `code` for `email` and record the outcome on `promo`.
    ///
    /// Transport failures are recorded as a rejection with a generic message;
    /// they never surface as errors.
    ///
    /// # Errors
    ///
    /// Returns [`PromoInputError`] without any network call when the code or
    /// the email is blank. `promo` is left untouched in that case.
    #[instrument(skip(self, promo, email))]
    pub async fn verify(
        &self,
        promo: &mut PromoApplication,
        code: &str,
        email: &str,
    ) -> Result<(), PromoInputError> {
        let request = PromoRequest::new(code, email)?;

        match self.api.verify_promo_code(&request).await {
            Ok(verdict) if verdict.valid => {
                let percent = verdict.discount.unwrap_or(DiscountPercent::ZERO);
                tracing::info!(code = %request.code, %percent, "Promo code applied");
                promo.accept(&request.code, percent);
            }
            Ok(verdict) => {
                let message = verdict
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| INVALID_CODE_MESSAGE.to_string());
                tracing::info!(code = %request.code, "Promo code rejected");
                promo.reject(&request.code, message);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Promo verification failed");
                promo.reject(&request.code, VERIFY_FAILED_MESSAGE);
            }
        }

        Ok(())
    }
}

/// Read the stored promo state, defaulting to unapplied when missing or
/// unreadable.
pub async fn load<S: KeyValueStore>(store: &S) -> PromoApplication {
    match store.get(keys::PROMO).await {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Discarding corrupted stored promo");
            PromoApplication::default()
        }),
        Ok(None) => PromoApplication::default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read stored promo");
            PromoApplication::default()
        }
    }
}

/// Store the promo state. The unapplied default deletes the key.
///
/// # Errors
///
/// Returns an error if the write fails.
pub async fn save<S: KeyValueStore>(
    store: &S,
    promo: &PromoApplication,
) -> Result<(), StorageError> {
    if *promo == PromoApplication::default() {
        return store.remove(keys::PROMO).await;
    }
    let raw = serde_json::to_string(promo).map_err(|e| StorageError::Unavailable(e.to_string()))?;
    store.set(keys::PROMO, raw).await
}
