//! Durable per-browser key-value storage.
//!
//! The cart, the applied promo, and the last payment session id live in
//! per-browser storage that survives reloads. Services only see the
//! [`KeyValueStore`] trait: requests use [`SessionStore`], which keeps values
//! in the visitor's `tower-sessions` session, and tests use [`InMemoryStore`].
//!
//! Values are stored as raw strings (JSON for structured data), so a
//! corrupted entry is something readers must tolerate rather than a type error.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tower_sessions::Session;

/// Fixed storage keys.
pub mod keys {
    /// Cart mapping, JSON object of item id to quantity.
    pub const CART: &str = "grabEatCart";
    /// Payment session id of the last checkout handoff.
    pub const SESSION_ID: &str = "sessionId";
    /// Applied promo state.
    pub const PROMO: &str = "grabEatPromo";
}

/// Errors reading or writing durable storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The session backend failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The store refused the write.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A string key-value store scoped to one browser.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: String)
    -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Delete `key`. Deleting a missing key succeeds.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

// =============================================================================
// Session-backed store
// =============================================================================

/// Storage backed by the visitor's session.
#[derive(Clone)]
pub struct SessionStore {
    session: Session,
}

impl SessionStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl KeyValueStore for SessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.session.get::<String>(key).await?)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        Ok(self.session.insert(key, value).await?)
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.session.remove_value(key).await?;
        Ok(())
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// Process-local storage, shared between clones.
///
/// Writes can be made to fail with [`InMemoryStore::fail_writes`] to exercise
/// error paths.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `set` and `remove` calls fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Store a raw value directly, bypassing write failures.
    pub fn seed(&self, key: &str, value: impl Into<String>) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_owned(), value.into());
        }
    }

    /// Read a raw value directly.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }

    fn with_values<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>) -> T,
    ) -> Result<T, StorageError> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(f(&mut values))
    }
}

impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.with_values(|values| values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.check_writable()?;
        self.with_values(|values| {
            values.insert(key.to_owned(), value);
        })
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.with_values(|values| {
            values.remove(key);
        })
    }
}
