//! Cache types for food API responses.

use std::sync::Arc;

use grab_eat_core::{Category, MenuItem};

/// Cache key for menu data.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Categories,
    Menu,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Categories(Arc<Vec<Category>>),
    Menu(Arc<Vec<MenuItem>>),
}
