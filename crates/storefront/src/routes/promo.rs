//! Promo code route handlers.

use axum::{Json, extract::State};
use grab_eat_core::PromoApplication;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::{PromoVerifier, promo};
use crate::state::AppState;
use crate::storage::SessionStore;

/// Promo verification input.
#[derive(Debug, Deserialize)]
pub struct PromoInput {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub email: String,
}

/// Verify a promo code and store the outcome.
///
/// POST /api/promo/verify
///
/// A rejected code is not an error: the response carries the invalid promo
/// state and its message.
#[instrument(skip(state, session, input), fields(code = %input.code))]
pub async fn verify(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<PromoInput>,
) -> Result<Json<PromoApplication>> {
    let store = SessionStore::new(session);
    let mut current = promo::load(&store).await;

    PromoVerifier::new(state.api())
        .verify(&mut current, &input.code, &input.email)
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    promo::save(&store, &current).await?;

    add_breadcrumb(
        "promo",
        "Promo code verified",
        Some(&[
            ("code", current.code()),
            ("applied", if current.is_applied() { "true" } else { "false" }),
        ]),
    );

    Ok(Json(current))
}

/// Remove the promo code.
///
/// DELETE /api/promo
#[instrument(skip(session))]
pub async fn remove(session: Session) -> Result<Json<PromoApplication>> {
    let store = SessionStore::new(session);
    let mut current = promo::load(&store).await;
    current.clear();
    promo::save(&store, &current).await?;
    Ok(Json(current))
}
