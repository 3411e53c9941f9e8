//! Order confirmation: the finalized order for the last payment session.
//!
//! Every failure on this path is soft. A missing session id, an unreadable
//! store, or a failed lookup all end in [`Confirmation::NotFound`].

use grab_eat_core::{CheckoutSessionId, Order};
use tracing::instrument;

use crate::api::FoodApiClient;
use crate::storage::{KeyValueStore, keys};

/// What the confirmation view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Found(Order),
    NotFound,
}

/// Look up the order for the stored payment session id.
///
/// No request is sent when no session id is stored.
#[instrument(skip_all)]
pub async fn load<S: KeyValueStore>(api: &FoodApiClient, store: &S) -> Confirmation {
    let session_id = match store.get(keys::SESSION_ID).await {
        Ok(Some(id)) if !id.trim().is_empty() => CheckoutSessionId::new(id.trim()),
        Ok(_) => {
            tracing::debug!("No stored payment session id");
            return Confirmation::NotFound;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read stored payment session id");
            return Confirmation::NotFound;
        }
    };

    match api.get_order_by_session(&session_id).await {
        Ok(order) => Confirmation::Found(order),
        Err(e) => {
            tracing::warn!(error = %e, session_id = %session_id, "Order lookup failed");
            Confirmation::NotFound
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::FoodApiConfig;
    use crate::storage::InMemoryStore;

    fn api(server: &MockServer) -> FoodApiClient {
        FoodApiClient::new(&FoodApiConfig {
            base_url: server.uri().parse().unwrap(),
            timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(300),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_no_session_id_sends_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let confirmation = load(&api(&server), &InMemoryStore::new()).await;
        assert_eq!(confirmation, Confirmation::NotFound);
    }

    #[tokio::test]
    async fn test_bare_order_document_is_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orders/success"))
            .and(query_param("session_id", "cs_test_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_id": "ord_1",
                "customerName": "Robin",
                "totalAmount": 1259,
                "status": "confirmed",
                "paymentStatus": "paid"
            })))
            .mount(&server)
            .await;

        let store = InMemoryStore::new();
        store.seed(keys::SESSION_ID, "cs_test_1");

        let Confirmation::Found(order) = load(&api(&server), &store).await else {
            panic!("order should be found");
        };
        assert_eq!(order.customer_name, "Robin");
        assert_eq!(order.total_amount.cents(), 1259);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orders/success"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "status": "error",
                "message": "Order not found"
            })))
            .mount(&server)
            .await;

        let store = InMemoryStore::new();
        store.seed(keys::SESSION_ID, "cs_missing");
        assert_eq!(load(&api(&server), &store).await, Confirmation::NotFound);
    }
}
