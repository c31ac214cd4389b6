//! Scoped key-value storage
//!
//! Draft auto-save and session data go through an injected [`KeyValueStore`]
//! instead of ambient global state. [`ScopedStorage`] prefixes every key with
//! a namespace so unrelated data sharing the store is never touched.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Raw string store (browser local storage, a file, or memory).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
    fn keys(&self) -> Vec<String>;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries().remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.entries().keys().cloned().collect()
    }
}

/// Role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Agent,
}

/// Session data kept between page loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user_id: String,
    pub role: Role,
}

const SESSION_KEY: &str = "session";

/// Namespaced view over a [`KeyValueStore`].
#[derive(Clone)]
pub struct ScopedStorage {
    namespace: String,
    store: Arc<dyn KeyValueStore>,
}

impl ScopedStorage {
    pub fn new(namespace: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            namespace: namespace.into(),
            store,
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }

    pub fn read(&self, key: &str) -> Option<String> {
        self.store.get(&self.full_key(key))
    }

    pub fn write(&self, key: &str, value: String) {
        self.store.set(&self.full_key(key), value);
    }

    pub fn clear(&self, key: &str) {
        self.store.remove(&self.full_key(key));
    }

    /// Remove every key in this namespace.
    pub fn clear_all(&self) {
        let prefix = format!("{}:", self.namespace);
        for key in self.store.keys() {
            if key.starts_with(&prefix) {
                self.store.remove(&key);
            }
        }
    }

    /// Read and decode a JSON value. Undecodable entries are dropped.
    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(
                    namespace = %self.namespace,
                    key = %key,
                    error = %e,
                    "Discarding undecodable stored value"
                );
                self.clear(key);
                None
            }
        }
    }

    pub fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), serde_json::Error> {
        let raw = serde_json::to_string(value)?;
        self.write(key, raw);
        Ok(())
    }

    pub fn session(&self) -> Option<SessionInfo> {
        self.read_json(SESSION_KEY)
    }

    pub fn set_session(&self, session: &SessionInfo) -> Result<(), serde_json::Error> {
        self.write_json(SESSION_KEY, session)
    }

    pub fn clear_session(&self) {
        self.clear(SESSION_KEY);
    }
}
