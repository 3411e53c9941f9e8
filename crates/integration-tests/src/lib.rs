//! Integration tests for Grab Eat.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p grab-eat-integration-tests
//! ```
//!
//! Each test starts the storefront in-process on an ephemeral port, backed by
//! a `wiremock` server standing in for the food API. The HTTP client keeps
//! cookies, so one client is one browser session.
//!
//! # Test Categories
//!
//! - `ordering_flow` - Menu, cart, promo, checkout handoff
//! - `confirmation` - Order lookup and countdown after payment
//! - `forms` - Contact and job application submissions

use std::collections::HashMap;
use std::net::SocketAddr;

use grab_eat_storefront::config::StorefrontConfig;
use grab_eat_storefront::state::AppState;
use reqwest::Client;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Payment page template used by every test server.
pub const PAYMENT_URL_TEMPLATE: &str = "https://pay.example.test/c/{session_id}";

/// A running storefront and the mock food API behind it.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub food_api: MockServer,
}

impl TestContext {
    /// Start a storefront against a fresh mock food API.
    ///
    /// `ORDER_REDIRECT_SECONDS` is 2 to keep countdown tests short.
    ///
    /// # Panics
    ///
    /// Panics if the server or client cannot be started.
    pub async fn start() -> Self {
        let food_api = MockServer::start().await;

        let vars = HashMap::from([
            ("STOREFRONT_BASE_URL", "http://localhost:3000".to_string()),
            ("FOOD_API_BASE_URL", food_api.uri()),
            ("PAYMENT_CHECKOUT_URL", PAYMENT_URL_TEMPLATE.to_string()),
            ("ORDER_REDIRECT_SECONDS", "2".to_string()),
        ]);
        let config = StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
            .expect("Failed to build test configuration");
        let state = AppState::new(config).expect("Failed to build application state");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let app = grab_eat_storefront::app(state);
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Test server error");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            food_api,
        }
    }

    /// Absolute storefront URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Serve `items` from the menu endpoint and two categories.
    pub async fn mount_menu(&self, items: Value) {
        Mock::given(method("GET"))
            .and(path("/menu/getAll"))
            .respond_with(ResponseTemplate::new(200).set_body_json(items))
            .mount(&self.food_api)
            .await;
        Mock::given(method("GET"))
            .and(path("/category/getAll"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": [
                    { "_id": "c1", "name": "Burgers" },
                    { "_id": "c2", "name": "Sides" }
                ]
            })))
            .mount(&self.food_api)
            .await;
    }

    /// POST a JSON body and return the parsed JSON response with its status.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the response is not JSON.
    pub async fn post_json(&self, path: &str, body: &Value) -> (u16, Value) {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Request failed");
        let status = response.status().as_u16();
        (status, response.json().await.expect("Response is not JSON"))
    }

    /// GET a path and return the parsed JSON response with its status.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the response is not JSON.
    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed");
        let status = response.status().as_u16();
        (status, response.json().await.expect("Response is not JSON"))
    }
}

/// A burger at 8.99 and fries at 4.99, both available.
#[must_use]
pub fn sample_menu() -> Value {
    json!([
        {
            "_id": "burger",
            "title": "Classic Burger",
            "desc": "Beef, cheddar, pickles",
            "price": 899,
            "categoryId": { "_id": "c1", "name": "Burgers" },
            "isAvailable": true,
            "image": "uploads/burger.png"
        },
        {
            "_id": "fries",
            "title": "Fries",
            "desc": "Sea salt",
            "price": 499,
            "categoryId": { "_id": "c2", "name": "Sides" },
            "isAvailable": true
        },
        {
            "_id": "shake",
            "title": "Milkshake",
            "desc": "Seasonal",
            "price": 399,
            "categoryId": "c2",
            "isAvailable": false
        }
    ])
}
