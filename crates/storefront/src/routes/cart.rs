//! Cart route handlers.
//!
//! The cart lives in the visitor's session as a map of menu item id to
//! quantity. Lines and totals are resolved against the current menu on every
//! read, so prices always come from the API.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use grab_eat_core::cart::subtotal;
use grab_eat_core::{CartLine, MenuItemId, OrderTotals, PromoApplication};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::{CartStore, MenuLoader, promo};
use crate::state::AppState;
use crate::storage::SessionStore;

/// Cart line display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    #[serde(flatten)]
    pub line: CartLine,
    pub price_display: String,
    pub total_display: String,
    pub image_src: String,
}

/// Cart display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub item_count: u32,
    pub totals: OrderTotals,
    pub total_display: String,
    pub free_delivery: bool,
    pub promo: PromoApplication,
}

/// Result of a quantity change.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityResponse {
    pub item_id: MenuItemId,
    pub quantity: u32,
    pub item_count: u32,
}

/// Add or remove one unit.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemInput {
    pub item_id: MenuItemId,
}

/// Set a quantity outright.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityInput {
    pub item_id: MenuItemId,
    pub quantity: u32,
}

fn require_item_id(item_id: &MenuItemId) -> Result<()> {
    if item_id.as_str().trim().is_empty() {
        return Err(AppError::BadRequest("itemId is required".to_string()));
    }
    Ok(())
}

fn quantity_response(
    cart: &CartStore<SessionStore>,
    item_id: MenuItemId,
    quantity: u32,
) -> Json<QuantityResponse> {
    Json(QuantityResponse {
        item_id,
        quantity,
        item_count: cart.cart().total_quantity(),
    })
}

/// Show the cart with resolved lines and totals.
///
/// GET /api/cart
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let store = SessionStore::new(session);
    let loader = MenuLoader::new(state.api());
    let (cart, promo, menu) = tokio::join!(
        CartStore::restore(store.clone()),
        promo::load(&store),
        loader.items()
    );
    let menu = menu?;

    let lines = cart.cart().lines(&menu);
    let totals = OrderTotals::compute(subtotal(&lines), &promo, &state.config().delivery);
    let placeholder = &state.config().placeholder_image_url;

    let items = lines
        .into_iter()
        .map(|line| CartLineView {
            price_display: line.price.to_string(),
            total_display: line.total.to_string(),
            image_src: line.image_url.as_deref().unwrap_or(placeholder).to_owned(),
            line,
        })
        .collect();

    Ok(Json(CartView {
        items,
        item_count: cart.cart().total_quantity(),
        total_display: totals.total.to_string(),
        free_delivery: totals.delivery_fee.is_zero(),
        totals,
        promo,
    }))
}

/// Add one unit of an item.
///
/// POST /api/cart/add
#[instrument(skip(session), fields(item_id = %input.item_id))]
pub async fn add(
    session: Session,
    Json(input): Json<CartItemInput>,
) -> Result<Json<QuantityResponse>> {
    require_item_id(&input.item_id)?;
    let mut cart = CartStore::restore(SessionStore::new(session)).await;
    let quantity = cart.add(&input.item_id).await;

    add_breadcrumb(
        "cart",
        "Added item to cart",
        Some(&[("item_id", input.item_id.as_str())]),
    );

    Ok(quantity_response(&cart, input.item_id, quantity))
}

/// Remove one unit of an item.
///
/// POST /api/cart/remove
#[instrument(skip(session), fields(item_id = %input.item_id))]
pub async fn remove(
    session: Session,
    Json(input): Json<CartItemInput>,
) -> Result<Json<QuantityResponse>> {
    require_item_id(&input.item_id)?;
    let mut cart = CartStore::restore(SessionStore::new(session)).await;
    let quantity = cart.remove(&input.item_id).await;

    add_breadcrumb(
        "cart",
        "Removed item from cart",
        Some(&[("item_id", input.item_id.as_str())]),
    );

    Ok(quantity_response(&cart, input.item_id, quantity))
}

/// Set the quantity of an item; zero removes it.
///
/// POST /api/cart/update
#[instrument(skip(session), fields(item_id = %input.item_id, quantity = input.quantity))]
pub async fn update(
    session: Session,
    Json(input): Json<UpdateQuantityInput>,
) -> Result<Json<QuantityResponse>> {
    require_item_id(&input.item_id)?;
    let mut cart = CartStore::restore(SessionStore::new(session)).await;
    let quantity = cart.set_quantity(&input.item_id, input.quantity).await;
    Ok(quantity_response(&cart, input.item_id, quantity))
}

/// Empty the cart.
///
/// DELETE /api/cart
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Response> {
    let mut cart = CartStore::restore(SessionStore::new(session)).await;
    cart.clear().await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
