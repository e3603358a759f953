//! Key/value storage abstraction for directory records.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use adminhub_core::{DomainError, DomainResult};

/// Key/value store for directory records.
///
/// Lock poisoning surfaces as [`DomainError::Unavailable`] rather than as an
/// empty result, so callers evaluating permissions can fail closed.
pub trait KeyValueStore<K, V>: Send + Sync {
    fn get(&self, key: &K) -> DomainResult<Option<V>>;
    fn upsert(&self, key: K, value: V) -> DomainResult<()>;
    fn list(&self) -> DomainResult<Vec<V>>;
}

impl<K, V, S> KeyValueStore<K, V> for Arc<S>
where
    S: KeyValueStore<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> DomainResult<Option<V>> {
        (**self).get(key)
    }

    fn upsert(&self, key: K, value: V) -> DomainResult<()> {
        (**self).upsert(key, value)
    }

    fn list(&self) -> DomainResult<Vec<V>> {
        (**self).list()
    }
}

/// In-memory store for tests/dev.
#[derive(Debug)]
pub struct InMemoryStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> DomainError {
    DomainError::unavailable("in-memory store lock poisoned")
}

impl<K, V> KeyValueStore<K, V> for InMemoryStore<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> DomainResult<Option<V>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(key).cloned())
    }

    fn upsert(&self, key: K, value: V) -> DomainResult<()> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(key, value);
        Ok(())
    }

    fn list(&self) -> DomainResult<Vec<V>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().cloned().collect())
    }
}
