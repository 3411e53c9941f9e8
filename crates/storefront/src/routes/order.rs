//! Order confirmation route handlers.
//!
//! The payment page returns the customer to `/order/success`. The page looks
//! up the order for the stored payment session id and, once shown, follows
//! the countdown stream back to the home page.

use std::convert::Infallible;

use axum::{
    Json,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, StreamExt};
use grab_eat_core::Order;
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::services::{Confirmation, CountdownEvent, confirmation, countdown};
use crate::state::AppState;
use crate::storage::SessionStore;

/// Message shown when no order can be found.
pub const ORDER_NOT_FOUND_MESSAGE: &str = "We couldn't find your order details.";

/// Where a customer without an order can go next.
pub const NOT_FOUND_LINKS: [&str; 2] = ["/menu", "/"];

/// Confirmation page data.
#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ConfirmationView {
    Found {
        order: Order,
        total_display: String,
        free_delivery: bool,
        redirect_seconds: u64,
    },
    NotFound {
        message: &'static str,
        links: [&'static str; 2],
    },
}

/// Show the order for the stored payment session.
///
/// GET /order/success
///
/// Always 200; the `state` field tells the two outcomes apart.
#[instrument(skip(state, session))]
pub async fn success(State(state): State<AppState>, session: Session) -> Json<ConfirmationView> {
    let store = SessionStore::new(session);

    let view = match confirmation::load(state.api(), &store).await {
        Confirmation::Found(order) => ConfirmationView::Found {
            total_display: order.total_amount.to_string(),
            free_delivery: order.free_delivery(),
            redirect_seconds: state.config().order_redirect_seconds,
            order,
        },
        Confirmation::NotFound => ConfirmationView::NotFound {
            message: ORDER_NOT_FOUND_MESSAGE,
            links: NOT_FOUND_LINKS,
        },
    };

    Json(view)
}

/// Stream the redirect countdown.
///
/// GET /order/success/countdown
///
/// Emits `tick` events with the seconds remaining, then one `navigate` event
/// carrying the home path. Closing the connection cancels the countdown.
#[instrument(skip(state))]
pub async fn countdown_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = countdown(state.config().order_redirect_seconds).map(|event| {
        Ok(match event {
            CountdownEvent::Tick(remaining) => {
                Event::default().event("tick").data(remaining.to_string())
            }
            CountdownEvent::Navigate(path) => Event::default().event("navigate").data(path),
        })
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
