//! Menu loading.
//!
//! Categories are supplementary: a failed category fetch is logged and yields
//! an empty list. A failed menu fetch puts the whole menu view into its error
//! state.

use grab_eat_core::{Category, MenuItem};
use tracing::instrument;

use crate::api::{ApiError, FoodApiClient};

/// Message for the menu error state.
pub const MENU_UNAVAILABLE_MESSAGE: &str = "Failed to load menu items. Please try again later.";

/// Result of loading the menu page.
#[derive(Debug)]
pub enum MenuState {
    Ready {
        categories: Vec<Category>,
        items: Vec<MenuItem>,
    },
    Failed {
        message: &'static str,
    },
}

/// Loads categories and menu items from the food API.
pub struct MenuLoader<'a> {
    api: &'a FoodApiClient,
}

impl<'a> MenuLoader<'a> {
    #[must_use]
    pub const fn new(api: &'a FoodApiClient) -> Self {
        Self { api }
    }

    /// Fetch categories, falling back to an empty list on any failure.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Vec<Category> {
        match self.api.get_categories().await {
            Ok(categories) => categories,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load categories");
                Vec::new()
            }
        }
    }

    /// Fetch menu items with image paths resolved against the API base URL.
    ///
    /// # Errors
    ///
    /// Returns the API error when the menu cannot be loaded.
    #[instrument(skip(self))]
    pub async fn items(&self) -> Result<Vec<MenuItem>, ApiError> {
        let mut items = self.api.get_menu_items().await?;
        resolve_image_urls(&mut items, self.api.base_url());
        Ok(items)
    }

    /// Fetch categories and menu items concurrently.
    pub async fn load(&self) -> MenuState {
        let (categories, items) = tokio::join!(self.categories(), self.items());

        match items {
            Ok(items) => MenuState::Ready { categories, items },
            Err(e) => {
                tracing::error!(error = %e, "Failed to load menu items");
                MenuState::Failed {
                    message: MENU_UNAVAILABLE_MESSAGE,
                }
            }
        }
    }
}

/// Set `image_url` from each item's image path.
///
/// A non-blank `image` wins over any `imageUrl` the API sent; items without
/// one keep their `image_url` as is. The placeholder is chosen when rendering.
pub fn resolve_image_urls(items: &mut [MenuItem], base_url: &str) {
    for item in items.iter_mut() {
        let path = item.image.as_deref().map(str::trim).filter(|path| !path.is_empty());
        if let Some(path) = path {
            item.image_url = Some(resolve_image_url(base_url, path));
        }
    }
}

/// Resolve one image path. Absolute URLs are returned unchanged.
#[must_use]
pub fn resolve_image_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::FoodApiConfig;

    fn api(server: &MockServer) -> FoodApiClient {
        FoodApiClient::new(&FoodApiConfig {
            base_url: server.uri().parse().unwrap(),
            timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(300),
        })
        .unwrap()
    }

    #[test]
    fn test_resolve_image_url() {
        assert_eq!(
            resolve_image_url("http://api.test/", "/uploads/burger.png"),
            "http://api.test/uploads/burger.png"
        );
        assert_eq!(
            resolve_image_url("http://api.test", "https://cdn.test/fries.png"),
            "https://cdn.test/fries.png"
        );
    }

    #[test]
    fn test_items_without_image_keep_no_url() {
        let mut items: Vec<MenuItem> = serde_json::from_value(json!([
            { "_id": "a", "title": "Burger", "price": 899, "image": "uploads/a.png" },
            { "_id": "b", "title": "Fries", "price": 299, "image": "  " },
            { "_id": "c", "title": "Cola", "price": 199, "imageUrl": "https://cdn.test/c.png" },
            {
                "_id": "d",
                "title": "Shake",
                "price": 349,
                "image": "uploads/d.png",
                "imageUrl": "https://old.cdn/d.png"
            }
        ]))
        .unwrap();

        resolve_image_urls(&mut items, "http://api.test");

        let urls: Vec<_> = items.iter().map(|i| i.image_url.as_deref()).collect();
        assert_eq!(
            urls,
            vec![
                Some("http://api.test/uploads/a.png"),
                None,
                Some("https://cdn.test/c.png"),
                Some("http://api.test/uploads/d.png")
            ]
        );
    }

    #[tokio::test]
    async fn test_category_failure_is_soft() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/category/getAll"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/menu/getAll"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "_id": "a",
                    "title": "Burger",
                    "price": 899,
                    "isAvailable": true,
                    "image": "a.png"
                }
            ])))
            .mount(&server)
            .await;

        let api = api(&server);
        let MenuState::Ready { categories, items } = MenuLoader::new(&api).load().await else {
            panic!("menu should load without categories");
        };
        assert!(categories.is_empty());
        assert_eq!(
            items.first().unwrap().image_url,
            Some(format!("{}/a.png", server.uri()))
        );
    }

    #[tokio::test]
    async fn test_menu_failure_is_error_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/category/getAll"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": [{ "_id": "c1", "name": "Burgers" }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/menu/getAll"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
            .mount(&server)
            .await;

        let api = api(&server);
        assert!(matches!(
            MenuLoader::new(&api).load().await,
            MenuState::Failed {
                message: MENU_UNAVAILABLE_MESSAGE
            }
        ));
    }
}
