//! Session-scoped key-value store used to hand data between pages.
//!
//! The intake page writes a single serialized record and the ticket page
//! reads it back. The store capability is injected so the pipeline can run
//! against an in-memory fake in tests; the app itself uses [`MemoryStore`],
//! which lives exactly as long as the process and is never persisted.

use std::collections::HashMap;

use thiserror::Error;

/// Errors a session store may report on write.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store refused to accept the value for the given key.
    #[error("Session store rejected key {key}: {reason}")]
    Rejected {
        /// Key the write was addressed to.
        key: String,
        /// Store-specific failure description.
        reason: String,
    },
}

/// Key-value capability with session lifetime.
pub trait SessionStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store scoped to the current app run.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let mut store = MemoryStore::new();
        assert!(store.get("ticketData").is_none());
        store.set("ticketData", "{}").unwrap();
        assert_eq!(store.get("ticketData").as_deref(), Some("{}"));
    }

    #[test]
    fn set_replaces_previous_value() {
        let mut store = MemoryStore::new();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("two"));
    }
}
