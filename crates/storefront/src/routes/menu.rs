//! Menu route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use grab_eat_core::menu::category_choices;
use grab_eat_core::{Category, MenuFilter, MenuItem, MenuItemId, Money};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::{CartStore, MenuLoader, MenuState};
use crate::state::AppState;
use crate::storage::SessionStore;

/// Menu item display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemView {
    pub id: MenuItemId,
    pub title: String,
    pub description: String,
    pub price: Money,
    pub price_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub combo: bool,
    pub image_src: String,
    /// Units of this item already in the visitor's cart.
    pub in_cart: u32,
}

impl MenuItemView {
    fn new(item: &MenuItem, placeholder: &str, in_cart: u32) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            description: item.description.clone(),
            price: item.price,
            price_display: item.price.to_string(),
            category: item.category_name().map(str::to_owned),
            combo: item.combo,
            image_src: item.image_src(placeholder).to_owned(),
            in_cart,
        }
    }
}

/// Menu page data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuView {
    /// "All" followed by the category names present on the menu.
    pub categories: Vec<String>,
    pub filter: MenuFilter,
    pub items: Vec<MenuItemView>,
    pub cart_count: u32,
}

/// List categories.
///
/// GET /api/categories
///
/// Always succeeds; an unreachable API yields an empty list.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(MenuLoader::new(state.api()).categories().await)
}

/// Show the filtered menu.
///
/// GET /api/menu?category=&q=
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<MenuFilter>,
) -> Result<Json<MenuView>> {
    let loader = MenuLoader::new(state.api());
    let (loaded, cart) = tokio::join!(
        loader.load(),
        CartStore::restore(SessionStore::new(session))
    );

    let items = match loaded {
        MenuState::Ready { items, .. } => items,
        MenuState::Failed { message } => return Err(AppError::Unavailable(message.to_owned())),
    };

    let placeholder = &state.config().placeholder_image_url;
    let views = filter
        .apply(&items)
        .into_iter()
        .map(|item| MenuItemView::new(item, placeholder, cart.count(&item.id)))
        .collect();

    Ok(Json(MenuView {
        categories: category_choices(&items),
        filter,
        items: views,
        cart_count: cart.cart().total_quantity(),
    }))
}
