//! Session-scoped storage contracts and adapters.
//!
//! Session values live for one browser tab session and hold raw JSON text per key.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Host service for session-scoped values (JSON stored as text per key).
pub trait SessionStore {
    /// Loads the raw text stored for `key`.
    fn load_raw(&self, key: &str) -> Option<String>;

    /// Stores raw text for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage rejects the write.
    fn save_raw(&self, key: &str, raw: &str) -> Result<(), String>;

    /// Removes `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage rejects the delete.
    fn remove(&self, key: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op session store for unsupported targets and baseline tests.
pub struct NoopSessionStore;

impl SessionStore for NoopSessionStore {
    fn load_raw(&self, _key: &str) -> Option<String> {
        None
    }

    fn save_raw(&self, _key: &str, _raw: &str) -> Result<(), String> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory session store keyed by string. Clones share the same map.
pub struct MemorySessionStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemorySessionStore {
    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn load_raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    fn save_raw(&self, key: &str, raw: &str) -> Result<(), String> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}

/// Loads and deserializes a typed session value.
///
/// Missing keys and undecodable values both read as `None`.
pub fn load_session_with<S: SessionStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Option<T> {
    let raw = store.load_raw(key)?;
    serde_json::from_str(&raw).ok()
}

/// Serializes and saves a typed session value.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn save_session_with<S: SessionStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.save_raw(key, &raw)
}
