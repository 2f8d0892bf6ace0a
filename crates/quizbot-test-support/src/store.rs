//! Test stores: mock `SessionStore` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use quizbot_core::error::DomainError;
use quizbot_core::store::SessionStore;

/// An in-memory store that also records every write batch, so tests can
/// assert how many updates a transition produced.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
    batches: Mutex<Vec<Vec<(String, String)>>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`. Seeding is not recorded
    /// as a write batch.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::default();
        store
            .values
            .lock()
            .unwrap()
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        store
    }

    /// Returns the current value of `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    /// Returns a snapshot of all write batches, oldest first. A single `set`
    /// call counts as a batch of one.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn write_batches(&self) -> Vec<Vec<(String, String)>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.set_many(&[(key.to_owned(), value.to_owned())]).await
    }

    async fn set_many(&self, entries: &[(String, String)]) -> Result<(), DomainError> {
        let mut values = self.values.lock().unwrap();
        for (key, value) in entries {
            values.insert(key.clone(), value.clone());
        }
        self.batches.lock().unwrap().push(entries.to_vec());
        Ok(())
    }
}

/// A store that always reports itself unavailable. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingSessionStore;

#[async_trait]
impl SessionStore for FailingSessionStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, DomainError> {
        Err(DomainError::StoreUnavailable("connection refused".into()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), DomainError> {
        Err(DomainError::StoreUnavailable("connection refused".into()))
    }
}

/// A store that fails its first `failures` operations and then behaves like a
/// [`MemorySessionStore`]. Used to exercise retry policies.
#[derive(Debug)]
pub struct FlakySessionStore {
    remaining_failures: AtomicUsize,
    inner: MemorySessionStore,
}

impl FlakySessionStore {
    /// Create a store that fails `failures` times before recovering.
    #[must_use]
    pub fn new(failures: usize) -> Self {
        Self {
            remaining_failures: AtomicUsize::new(failures),
            inner: MemorySessionStore::new(),
        }
    }

    /// The backing store, for assertions once the failures are spent.
    #[must_use]
    pub fn inner(&self) -> &MemorySessionStore {
        &self.inner
    }

    fn trip(&self) -> Result<(), DomainError> {
        let tripped = self
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if tripped {
            Err(DomainError::StoreUnavailable("connection reset".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SessionStore for FlakySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.trip()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.trip()?;
        self.inner.set(key, value).await
    }

    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>, DomainError> {
        self.trip()?;
        self.inner.get_many(keys).await
    }

    async fn set_many(&self, entries: &[(String, String)]) -> Result<(), DomainError> {
        self.trip()?;
        self.inner.set_many(entries).await
    }
}

/// A store whose writes are applied but reported as failed, like a backend
/// that commits a transaction and then drops the connection.
#[derive(Debug, Default)]
pub struct UnconfirmedWriteStore {
    inner: MemorySessionStore,
}

impl UnconfirmedWriteStore {
    /// Create a store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            inner: MemorySessionStore::with_entries(entries),
        }
    }

    /// The backing store, holding every write despite the reported failures.
    #[must_use]
    pub fn inner(&self) -> &MemorySessionStore {
        &self.inner
    }
}

#[async_trait]
impl SessionStore for UnconfirmedWriteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.set_many(&[(key.to_owned(), value.to_owned())]).await
    }

    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>, DomainError> {
        self.inner.get_many(keys).await
    }

    async fn set_many(&self, entries: &[(String, String)]) -> Result<(), DomainError> {
        self.inner.set_many(entries).await?;
        Err(DomainError::StoreUnavailable("response timed out".into()))
    }
}
