//! Menu items, categories, and menu filtering.
//!
//! Menu data is owned by the food API and read-only to the storefront. The
//! serde names follow the API's document shape (`_id`, `desc`, `categoryId`,
//! `isAvailable`), so items can be deserialized straight from responses.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{CategoryId, MenuItemId, Money};

/// Category sentinel that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

/// A menu category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
}

/// How a menu item refers to its category.
///
/// The API populates the reference with the full category document on the
/// menu listing, but a bare id is accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Populated(Category),
    Id(CategoryId),
}

impl CategoryRef {
    /// The category name, when the reference is populated.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Populated(category) => Some(category.name.as_str()),
            Self::Id(_) => None,
        }
    }

    /// The referenced category id.
    #[must_use]
    pub const fn id(&self) -> &CategoryId {
        match self {
            Self::Populated(category) => &category.id,
            Self::Id(id) => id,
        }
    }
}

/// A dish on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(rename = "_id")]
    pub id: MenuItemId,
    pub title: String,
    #[serde(rename = "desc", default)]
    pub description: String,
    /// Unit price in cents.
    pub price: Money,
    #[serde(rename = "categoryId", default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub combo: bool,
    /// Image path relative to the API base URL, as stored by the API.
    #[serde(default)]
    pub image: Option<String>,
    /// Absolute image URL, resolved when the menu is loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl MenuItem {
    /// The name of this item's category, if known.
    #[must_use]
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().and_then(CategoryRef::name)
    }

    /// The image to render, falling back to `placeholder` when none is known.
    #[must_use]
    pub fn image_src<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.image_url.as_deref().unwrap_or(placeholder)
    }

    /// Whether this item passes the category, search, and availability checks.
    #[must_use]
    pub fn matches(&self, category: &str, search_term: &str) -> bool {
        let matches_category =
            category == ALL_CATEGORIES || self.category_name() == Some(category);

        let needle = search_term.to_lowercase();
        let matches_search = self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle);

        matches_category && matches_search && self.is_available
    }
}

/// Menu filter criteria as selected in the menu view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuFilter {
    /// A blank category selects [`ALL_CATEGORIES`].
    #[serde(default = "all_categories", deserialize_with = "category_or_all")]
    pub category: String,
    #[serde(default, rename = "q")]
    pub search: String,
}

fn all_categories() -> String {
    ALL_CATEGORIES.to_owned()
}

fn category_or_all<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let category = String::deserialize(deserializer)?;
    let category = category.trim();
    if category.is_empty() {
        Ok(all_categories())
    } else {
        Ok(category.to_owned())
    }
}

impl Default for MenuFilter {
    fn default() -> Self {
        Self {
            category: all_categories(),
            search: String::new(),
        }
    }
}

impl MenuFilter {
    /// Apply this filter to `items`.
    #[must_use]
    pub fn apply<'a>(&self, items: &'a [MenuItem]) -> Vec<&'a MenuItem> {
        filter_items(items, &self.category, &self.search)
    }
}

/// Select the items matching `category` (or every category for
/// [`ALL_CATEGORIES`]) whose title or description contains `search_term`
/// case-insensitively, and which are available.
///
/// Items are borrowed, never modified.
#[must_use]
pub fn filter_items<'a>(
    items: &'a [MenuItem],
    category: &str,
    search_term: &str,
) -> Vec<&'a MenuItem> {
    items
        .iter()
        .filter(|item| item.matches(category, search_term))
        .collect()
}

/// The category choices for the menu view: [`ALL_CATEGORIES`] followed by
/// each distinct category name in first-seen order.
#[must_use]
pub fn category_choices(items: &[MenuItem]) -> Vec<String> {
    let mut choices = vec![all_categories()];
    for name in items.iter().filter_map(MenuItem::category_name) {
        if !choices.iter().any(|existing| existing == name) {
            choices.push(name.to_owned());
        }
    }
    choices
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn item(id: &str, title: &str, category: &str, available: bool) -> MenuItem {
        MenuItem {
            id: MenuItemId::new(id),
            title: title.to_string(),
            description: format!("Freshly made {}", title.to_lowercase()),
            price: Money::from_cents(500),
            category: Some(CategoryRef::Populated(Category {
                id: CategoryId::new(format!("cat-{category}")),
                name: category.to_string(),
            })),
            is_available: available,
            combo: false,
            image: None,
            image_url: None,
        }
    }

    #[test]
    fn test_filter_by_category() {
        let items = vec![
            item("1", "Burger", "Burgers", true),
            item("2", "Fries", "Sides", false),
        ];

        let filtered = filter_items(&items, "Burgers", "");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Burger");
    }

    #[test]
    fn test_filter_all_still_excludes_unavailable() {
        let items = vec![
            item("1", "Burger", "Burgers", true),
            item("2", "Fries", "Sides", false),
        ];

        let filtered = filter_items(&items, ALL_CATEGORIES, "");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Burger");
    }

    #[test]
    fn test_filter_search_is_case_insensitive_on_title_and_description() {
        let mut wrap = item("3", "Chicken Wrap", "Wraps", true);
        wrap.description = "Grilled chicken with GARLIC sauce".to_string();
        let items = vec![item("1", "Burger", "Burgers", true), wrap];

        assert_eq!(filter_items(&items, ALL_CATEGORIES, "bUrG").len(), 1);
        assert_eq!(filter_items(&items, ALL_CATEGORIES, "garlic")[0].title, "Chicken Wrap");
        assert!(filter_items(&items, ALL_CATEGORIES, "sushi").is_empty());
    }

    #[test]
    fn test_filter_does_not_modify_items() {
        let items = vec![item("1", "Burger", "Burgers", true)];
        let before = items.clone();
        let _ = filter_items(&items, "Sides", "x");
        assert_eq!(items, before);
    }

    #[test]
    fn test_unpopulated_category_only_matches_all() {
        let mut bare = item("4", "Soda", "Drinks", true);
        bare.category = Some(CategoryRef::Id(CategoryId::new("cat-drinks")));
        let items = vec![bare];

        assert!(filter_items(&items, "Drinks", "").is_empty());
        assert_eq!(filter_items(&items, ALL_CATEGORIES, "").len(), 1);
    }

    #[test]
    fn test_category_choices_are_distinct_in_first_seen_order() {
        let items = vec![
            item("1", "Burger", "Burgers", true),
            item("2", "Fries", "Sides", true),
            item("3", "Double Burger", "Burgers", true),
        ];

        assert_eq!(category_choices(&items), vec!["All", "Burgers", "Sides"]);
    }

    #[test]
    fn test_deserialize_api_shape() {
        let json = serde_json::json!({
            "_id": "665f1",
            "title": "Classic Burger",
            "desc": "Beef, cheddar, pickles",
            "price": 899,
            "categoryId": { "_id": "c1", "name": "Burgers" },
            "isAvailable": true,
            "combo": true,
            "image": "uploads/burger.jpg"
        });

        let parsed: MenuItem = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.id.as_str(), "665f1");
        assert_eq!(parsed.price, Money::from_cents(899));
        assert_eq!(parsed.category_name(), Some("Burgers"));
        assert!(parsed.is_available);
        assert!(parsed.combo);
        assert_eq!(parsed.image.as_deref(), Some("uploads/burger.jpg"));
        assert_eq!(parsed.image_src("placeholder.jpg"), "placeholder.jpg");
    }

    #[test]
    fn test_menu_filter_defaults_to_all() {
        let filter: MenuFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter, MenuFilter::default());
        assert_eq!(filter.category, ALL_CATEGORIES);
    }

    #[test]
    fn test_blank_category_means_all() {
        let filter: MenuFilter = serde_json::from_str(r#"{ "category": "  " }"#).unwrap();
        assert_eq!(filter.category, ALL_CATEGORIES);

        let filter: MenuFilter = serde_json::from_str(r#"{ "category": " Burgers " }"#).unwrap();
        assert_eq!(filter.category, "Burgers");
    }
}
