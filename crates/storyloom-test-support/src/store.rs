//! Test save stores — mock `SaveStore` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use storyloom_core::error::DomainError;
use storyloom_core::store::SaveStore;

/// A save store backed by a map. Records every write so tests can assert on
/// what was persisted and in which order.
#[derive(Debug, Default)]
pub struct InMemorySaveStore {
    slots: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<(String, String)>>,
}

impl InMemorySaveStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose slot `key` already holds `raw`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_slot(key: &str, raw: &str) -> Self {
        let store = Self::default();
        store
            .slots
            .lock()
            .unwrap()
            .insert(key.to_owned(), raw.to_owned());
        store
    }

    /// Returns the current contents of slot `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn slot(&self, key: &str) -> Option<String> {
        self.slots.lock().unwrap().get(key).cloned()
    }

    /// Returns a snapshot of all `(key, raw)` writes in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl SaveStore for InMemorySaveStore {
    async fn read(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.slots.lock().unwrap().get(key).cloned())
    }

    async fn write(&self, key: &str, raw: &str) -> Result<(), DomainError> {
        self.slots
            .lock()
            .unwrap()
            .insert(key.to_owned(), raw.to_owned());
        self.writes
            .lock()
            .unwrap()
            .push((key.to_owned(), raw.to_owned()));
        Ok(())
    }
}

/// A save store that never holds a save and silently accepts writes.
#[derive(Debug)]
pub struct EmptySaveStore;

#[async_trait]
impl SaveStore for EmptySaveStore {
    async fn read(&self, _key: &str) -> Result<Option<String>, DomainError> {
        Ok(None)
    }

    async fn write(&self, _key: &str, _raw: &str) -> Result<(), DomainError> {
        Ok(())
    }
}

/// A save store that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingSaveStore;

#[async_trait]
impl SaveStore for FailingSaveStore {
    async fn read(&self, _key: &str) -> Result<Option<String>, DomainError> {
        Err(DomainError::Infrastructure("storage unavailable".into()))
    }

    async fn write(&self, _key: &str, _raw: &str) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("storage unavailable".into()))
    }
}
