//! Client for the external food API.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest` 0.13
//! - The API owns menus, orders, promo codes, and payment sessions; the
//!   storefront never keeps its own copy beyond a short cache
//! - Categories and the menu are cached in memory via `moka`; failures are
//!   never cached
//! - Each endpoint's envelope is normalized here (see [`types`]) so callers
//!   only see canonical values
//!
//! # Endpoints
//!
//! ```text
//! GET  /category/getAll
//! GET  /menu/getAll
//! POST /contact/create
//! POST /job-applications/create
//! POST /orders/verify-promocode
//! POST /orders/create-checkout-session
//! GET  /orders/success?session_id=<id>
//! ```

mod cache;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use grab_eat_core::forms::{ContactMessage, JobApplication};
use grab_eat_core::{Category, CheckoutRequest, CheckoutSessionId, MenuItem, Order, PromoRequest};
use moka::future::Cache;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::FoodApiConfig;

use cache::{CacheKey, CacheValue};
use types::{
    CategoriesResponse, CheckoutSessionResponse, MenuResponse, OrderResponse, PromoVerdict,
    StatusResponse,
};

/// Errors talking to the food API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not valid JSON for the expected type.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The body was JSON but not one of the accepted envelopes.
    #[error("Unexpected response shape from {0}")]
    UnexpectedShape(&'static str),

    /// The API refused the request and said why.
    #[error("Rejected: {0}")]
    Rejected(String),
}

impl ApiError {
    /// A message safe to show to customers, when the API supplied one.
    #[must_use]
    pub fn customer_message(&self) -> Option<&str> {
        match self {
            Self::Rejected(message) => Some(message),
            _ => None,
        }
    }
}

/// Client for the food API.
///
/// Cheap to clone; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct FoodApiClient {
    inner: Arc<FoodApiClientInner>,
}

struct FoodApiClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl FoodApiClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &FoodApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(config.cache_ttl.max(Duration::from_millis(1)))
            .build();

        Ok(Self {
            inner: Arc::new(FoodApiClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    /// The API base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.inner.client.post(self.endpoint(endpoint)).json(body);
        send(request, endpoint).await
    }

    // =========================================================================
    // Menu
    // =========================================================================

    /// List menu categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a
    /// `status: "success"` category list.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories.as_ref().clone());
        }

        let endpoint = "/category/getAll";
        let response: CategoriesResponse =
            send(self.inner.client.get(self.endpoint(endpoint)), endpoint).await?;
        let categories = response
            .into_categories()
            .ok_or(ApiError::UnexpectedShape(endpoint))?;

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(Arc::new(categories.clone())),
            )
            .await;

        Ok(categories)
    }

    /// List all menu items as the API stores them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is none of the
    /// accepted menu envelopes.
    #[instrument(skip(self))]
    pub async fn get_menu_items(&self) -> Result<Vec<MenuItem>, ApiError> {
        if let Some(CacheValue::Menu(items)) = self.inner.cache.get(&CacheKey::Menu).await {
            debug!("Cache hit for menu");
            return Ok(items.as_ref().clone());
        }

        let endpoint = "/menu/getAll";
        let response: MenuResponse =
            send(self.inner.client.get(self.endpoint(endpoint)), endpoint).await?;
        let items = response
            .into_items()
            .ok_or(ApiError::UnexpectedShape(endpoint))?;

        self.inner
            .cache
            .insert(CacheKey::Menu, CacheValue::Menu(Arc::new(items.clone())))
            .await;

        Ok(items)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Ask the API whether a promo code is valid for a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the verdict cannot be decoded.
    #[instrument(skip(self, request), fields(code = %request.code))]
    pub async fn verify_promo_code(
        &self,
        request: &PromoRequest,
    ) -> Result<PromoVerdict, ApiError> {
        self.post("/orders/verify-promocode", request).await
    }

    /// Create a payment session for an order draft.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the API declines with a message,
    /// and other variants for transport or shape failures.
    #[instrument(skip(self, request), fields(total = %request.total_amount))]
    pub async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSessionId, ApiError> {
        let endpoint = "/orders/create-checkout-session";
        let response: CheckoutSessionResponse = self.post(endpoint, request).await?;

        match response {
            CheckoutSessionResponse {
                status: Some(status),
                session_id: Some(session_id),
                ..
            } if status == types::SUCCESS && !session_id.is_empty() => {
                Ok(CheckoutSessionId::new(session_id))
            }
            CheckoutSessionResponse {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Err(ApiError::Rejected(message)),
            _ => Err(ApiError::UnexpectedShape(endpoint)),
        }
    }

    /// Fetch the finalized order for a payment session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is neither a
    /// success envelope nor an order document.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn get_order_by_session(
        &self,
        session_id: &CheckoutSessionId,
    ) -> Result<Order, ApiError> {
        let endpoint = "/orders/success";
        let request = self
            .inner
            .client
            .get(self.endpoint(endpoint))
            .query(&[("session_id", session_id.as_str())]);

        let response: OrderResponse = send(request, endpoint).await?;
        response
            .into_order()
            .ok_or(ApiError::UnexpectedShape(endpoint))
    }

    // =========================================================================
    // Forms
    // =========================================================================

    /// Submit a contact message.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API acknowledges with `status: "success"`.
    #[instrument(skip(self, message), fields(subject = %message.subject))]
    pub async fn submit_contact(&self, message: &ContactMessage) -> Result<(), ApiError> {
        let response: StatusResponse = self.post("/contact/create", message).await?;
        acknowledge(response, "/contact/create")
    }

    /// Submit a job application.
    ///
    /// # Errors
    ///
    /// Returns an error unless the API acknowledges with `status: "success"`.
    #[instrument(skip(self, application), fields(position = %application.position))]
    pub async fn submit_job_application(
        &self,
        application: &JobApplication,
    ) -> Result<(), ApiError> {
        let response: StatusResponse = self
            .post("/job-applications/create", application)
            .await?;
        acknowledge(response, "/job-applications/create")
    }
}

/// Send a request and decode a JSON body, logging failures with a
/// truncated copy of the body.
async fn send<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    endpoint: &'static str,
) -> Result<T, ApiError> {
    let response = request.send().await?;
    let status = response.status();

    // Read as text first for better diagnostics
    let body = response.text().await?;

    if !status.is_success() {
        tracing::error!(
            endpoint,
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "Food API returned non-success status"
        );
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(
            endpoint,
            error = %e,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse food API response"
        );
        ApiError::Parse(e)
    })
}

fn acknowledge(response: StatusResponse, endpoint: &'static str) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    match response.message {
        Some(message) if !message.trim().is_empty() => Err(ApiError::Rejected(message)),
        _ => Err(ApiError::UnexpectedShape(endpoint)),
    }
}
