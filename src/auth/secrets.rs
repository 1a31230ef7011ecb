//! Pluggable secret persistence.
//!
//! Session tokens outlive the process, so the credential store writes them
//! through a [`SecretStore`]. The app supplies the platform keychain binding;
//! tests and examples use [`InMemorySecretStore`].

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Durable storage for small secrets, keyed by name.
///
/// Implementations are expected to be cheap and non-blocking in the common
/// case; the credential store calls these from synchronous getters. Writes
/// are fire-and-forget: an implementation that fails internally should log
/// and move on rather than surface an error, since the in-memory session
/// keeps working either way.
pub trait SecretStore: Send + Sync {
    /// Persists `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &[u8]);

    /// Returns the value stored under `key`, if any.
    fn load(&self, key: &str) -> Option<Vec<u8>>;

    /// Removes the value stored under `key`, if any.
    fn delete(&self, key: &str);
}

/// A [`SecretStore`] backed by a process-local map.
///
/// Nothing survives a restart; this exists for tests and for callers that
/// explicitly want session-only credentials.
#[derive(Debug, Default)]
pub struct InMemorySecretStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemorySecretStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for InMemorySecretStore {
    fn save(&self, key: &str, value: &[u8]) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_vec());
    }

    fn load(&self, key: &str) -> Option<Vec<u8>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn delete(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_delete_round_trip() {
        let store = InMemorySecretStore::new();
        assert_eq!(store.load("accessToken"), None);

        store.save("accessToken", b"jwt-value");
        assert_eq!(store.load("accessToken"), Some(b"jwt-value".to_vec()));

        store.save("accessToken", b"rotated");
        assert_eq!(store.load("accessToken"), Some(b"rotated".to_vec()));

        store.delete("accessToken");
        assert_eq!(store.load("accessToken"), None);
    }

    #[test]
    fn test_delete_missing_key_is_noop() {
        let store = InMemorySecretStore::new();
        store.delete("never-saved");
        assert_eq!(store.load("never-saved"), None);
    }

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InMemorySecretStore>();
    }
}
