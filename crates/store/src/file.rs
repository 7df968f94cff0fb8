use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Serialize, de::DeserializeOwned};

use crate::{KeyValueStore, StoreError};

/// Ordered store persisted as a single JSON document.
///
/// Every successful `insert`/`remove` has been flushed to disk before it
/// returns: the new document is written to a temp sibling, `fsync`ed, renamed
/// over the old one, and the parent directory is synced. If any step fails
/// the in-memory map is rolled back, so callers never observe a write that
/// did not reach disk.
#[derive(Debug)]
pub struct JsonFileStore<K, V> {
    path: PathBuf,
    inner: RwLock<BTreeMap<K, V>>,
}

impl<K, V> JsonFileStore<K, V>
where
    K: Ord + Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
{
    /// Open (or create) the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let map = match fs::read(&path) {
            Ok(bytes) => {
                let entries: Vec<(K, V)> = serde_json::from_slice(&bytes)?;
                entries.into_iter().collect()
            }
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        tracing::debug!(path = %path.display(), records = map.len(), "opened json store");

        Ok(Self {
            path,
            inner: RwLock::new(map),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, map: &BTreeMap<K, V>) -> Result<(), StoreError> {
        let entries: Vec<(&K, &V)> = map.iter().collect();
        let bytes = serde_json::to_vec_pretty(&entries)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let mut file = File::create(&tmp).map_err(|e| StoreError::io(&tmp, e))?;
        file.write_all(&bytes).map_err(|e| StoreError::io(&tmp, e))?;
        file.sync_all().map_err(|e| StoreError::io(&tmp, e))?;
        drop(file);

        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;
        sync_parent_dir(&self.path);
        Ok(())
    }
}

/// Make the rename itself durable. Directories cannot be opened for syncing
/// on every platform, so failures here are logged and ignored.
fn sync_parent_dir(path: &Path) {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return;
    };
    if let Err(e) = File::open(parent).and_then(|dir| dir.sync_all()) {
        tracing::debug!(dir = %parent.display(), error = %e, "directory sync skipped");
    }
}

impl<K, V> KeyValueStore<K, V> for JsonFileStore<K, V>
where
    K: Ord + Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Result<Option<V>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn insert(&self, key: K, value: V) -> Result<Option<V>, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let prev = map.insert(key.clone(), value);

        if let Err(err) = self.persist(&map) {
            match prev {
                Some(old) => {
                    map.insert(key, old);
                }
                None => {
                    map.remove(&key);
                }
            }
            tracing::error!(path = %self.path.display(), error = %err, "rolled back insert");
            return Err(err);
        }

        Ok(prev)
    }

    fn remove(&self, key: &K) -> Result<Option<V>, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let Some(removed) = map.remove(key) else {
            return Ok(None);
        };

        if let Err(err) = self.persist(&map) {
            map.insert(key.clone(), removed);
            tracing::error!(path = %self.path.display(), error = %err, "rolled back remove");
            return Err(err);
        }

        Ok(Some(removed))
    }

    fn values(&self) -> Result<Vec<V>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.values().cloned().collect())
    }
}
