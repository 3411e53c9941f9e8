//! Checkout route handler.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use grab_eat_core::CustomerInfo;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::services::{CartStore, CheckoutOrchestrator, promo};
use crate::state::AppState;
use crate::storage::SessionStore;

/// Submit the checkout form and redirect to the payment page.
///
/// POST /checkout
///
/// Responds with 303 See Other to the hosted payment page. Any failure
/// leaves the cart and promo in place so the customer can retry.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(info): Form<CustomerInfo>,
) -> Result<Response> {
    let store = SessionStore::new(session);
    let (mut cart, mut current_promo) =
        tokio::join!(CartStore::restore(store.clone()), promo::load(&store));

    add_breadcrumb(
        "checkout",
        "Checkout submitted",
        Some(&[("items", &cart.cart().total_quantity().to_string())]),
    );

    let config = state.config();
    let handoff = CheckoutOrchestrator::new(state.api(), &config.payment, &config.delivery)
        .checkout(&mut cart, &mut current_promo, &info)
        .await?;

    Ok(Redirect::to(handoff.redirect_url.as_str()).into_response())
}
