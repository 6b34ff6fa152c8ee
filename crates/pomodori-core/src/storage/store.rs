//! JSON-encoded persistence on top of a [`KvBackend`].
//!
//! `load` and `save` never fail. Missing keys, malformed JSON, values rejected
//! by a validator and backend errors all resolve to the fallback on read and
//! are dropped on write.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::kv::KvBackend;

pub struct PersistentStore {
    backend: Box<dyn KvBackend>,
}

impl PersistentStore {
    pub fn new(backend: impl KvBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Read `key`, or `fallback` if it is absent or unreadable.
    pub fn load<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        self.load_validated(key, fallback, |_| true)
    }

    /// Read `key`, returning `fallback` unless the decoded value passes `validate`.
    pub fn load_validated<T, F>(&self, key: &str, fallback: T, validate: F) -> T
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        let Some(raw) = self.load_raw(key) else {
            return fallback;
        };
        match serde_json::from_value::<T>(raw) {
            Ok(value) if validate(&value) => value,
            Ok(_) => {
                debug!(key, "stored value rejected by validator, using fallback");
                fallback
            }
            Err(err) => {
                debug!(key, error = %err, "stored value has wrong shape, using fallback");
                fallback
            }
        }
    }

    /// Read `key` as untyped JSON. `None` when absent, empty or malformed.
    pub fn load_raw(&self, key: &str) -> Option<serde_json::Value> {
        let text = match self.backend.get(key) {
            Ok(Some(text)) if !text.is_empty() => text,
            Ok(_) => return None,
            Err(err) => {
                warn!(key, error = %err, "storage read failed");
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(serde_json::Value::Null) => None,
            Ok(value) => Some(value),
            Err(err) => {
                debug!(key, error = %err, "stored value is not valid JSON");
                None
            }
        }
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let text = match serde_json::to_string(value) {
            Ok(text) => text,
            Err(err) => {
                warn!(key, error = %err, "could not encode value, write dropped");
                return;
            }
        };
        if let Err(err) = self.backend.set(key, &text) {
            warn!(key, error = %err, "storage write failed");
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(err) = self.backend.remove(key) {
            warn!(key, error = %err, "storage remove failed");
        }
    }
}
