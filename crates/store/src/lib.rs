//! Durable ordered key/value storage used by the households services.

pub mod error;
pub mod file;
pub mod memory;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::InMemoryStore;

use std::sync::Arc;

/// Ordered key/value store with atomic single-key operations.
pub trait KeyValueStore<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Result<Option<V>, StoreError>;
    /// Insert or overwrite; returns the previous value.
    fn insert(&self, key: K, value: V) -> Result<Option<V>, StoreError>;
    /// Returns the removed value, if any.
    fn remove(&self, key: &K) -> Result<Option<V>, StoreError>;
    /// All values in key order.
    fn values(&self) -> Result<Vec<V>, StoreError>;
}

impl<K, V, S> KeyValueStore<K, V> for Arc<S>
where
    S: KeyValueStore<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> Result<Option<V>, StoreError> {
        (**self).get(key)
    }

    fn insert(&self, key: K, value: V) -> Result<Option<V>, StoreError> {
        (**self).insert(key, value)
    }

    fn remove(&self, key: &K) -> Result<Option<V>, StoreError> {
        (**self).remove(key)
    }

    fn values(&self) -> Result<Vec<V>, StoreError> {
        (**self).values()
    }
}
