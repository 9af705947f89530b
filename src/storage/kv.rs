//! Key-value store abstraction
//!
//! The rand module only needs point reads and writes plus ordered prefix
//! scans. `MemStore` backs tests and genesis dry-runs, `CacheStore` buffers
//! writes so a failed message or block leaves no trace in its parent.

use crate::errors::StoreError;
use std::collections::BTreeMap;

/// A key/value pair returned by prefix scans
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Minimal store interface consumed by the keeper
pub trait KvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError>;

    /// All entries whose key starts with `prefix`, in ascending key order
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KvPair>, StoreError>;

    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }

    /// Make written data durable. No-op for stores without a backing file.
    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// In-memory ordered store
#[derive(Debug, Default, Clone)]
pub struct MemStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KvPair>, StoreError> {
        Ok(self
            .entries
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

/// Write-buffering branch over a parent store.
///
/// Reads see buffered writes first. Nothing reaches the parent until
/// [`CacheStore::write`] or [`CacheStore::commit`]; dropping the cache or
/// calling [`CacheStore::discard`] throws every change away.
#[derive(Debug)]
pub struct CacheStore<P> {
    parent: P,
    // None marks a pending delete
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<P: KvStore> CacheStore<P> {
    pub fn new(parent: P) -> Self {
        Self {
            parent,
            writes: BTreeMap::new(),
        }
    }

    /// Number of buffered writes and deletes
    pub fn pending(&self) -> usize {
        self.writes.len()
    }

    /// Buffered changes in key order, `None` for deletes
    pub fn changes(&self) -> impl Iterator<Item = (&[u8], Option<&[u8]>)> {
        self.writes
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_deref()))
    }

    /// The store underneath, without buffered changes
    pub fn parent(&self) -> &P {
        &self.parent
    }

    /// Flush buffered changes into the parent and keep the branch open
    pub fn commit(&mut self) -> Result<(), StoreError> {
        for (key, value) in std::mem::take(&mut self.writes) {
            match value {
                Some(v) => self.parent.set(&key, &v)?,
                None => self.parent.delete(&key)?,
            }
        }
        Ok(())
    }

    /// Flush buffered changes into the parent and hand it back
    pub fn write(mut self) -> Result<P, StoreError> {
        self.commit()?;
        Ok(self.parent)
    }

    pub fn discard(&mut self) {
        self.writes.clear();
    }
}

impl<P: KvStore> KvStore for CacheStore<P> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        match self.writes.get(key) {
            Some(value) => Ok(value.clone()),
            None => self.parent.get(key),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.writes.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.writes.insert(key.to_vec(), None);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KvPair>, StoreError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.scan_prefix(prefix)?.into_iter().collect();

        for (key, value) in self
            .writes
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
        {
            match value {
                Some(v) => {
                    merged.insert(key.clone(), v.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_iter().collect())
    }
}

impl<T: KvStore + ?Sized> KvStore for &mut T {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        (**self).delete(key)
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KvPair>, StoreError> {
        (**self).scan_prefix(prefix)
    }

    fn flush(&self) -> Result<(), StoreError> {
        (**self).flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mem_store_prefix_scan_is_ordered() {
        let mut store = MemStore::new();
        store.set(&[2, 9], b"c").unwrap();
        store.set(&[2, 1], b"a").unwrap();
        store.set(&[3, 0], b"x").unwrap();
        store.set(&[2, 5], b"b").unwrap();
        store.set(&[1, 7], b"y").unwrap();

        let keys: Vec<Vec<u8>> = store
            .scan_prefix(&[2])
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![vec![2, 1], vec![2, 5], vec![2, 9]]);
    }

    #[test]
    fn test_cache_discard_leaves_parent_untouched() {
        let mut parent = MemStore::new();
        parent.set(b"k1", b"v1").unwrap();
        {
            let mut cache = CacheStore::new(&mut parent);
            cache.set(b"k2", b"v2").unwrap();
            cache.delete(b"k1").unwrap();
            assert_eq!(cache.get(b"k1").unwrap(), None);
            assert_eq!(cache.get(b"k2").unwrap(), Some(b"v2".to_vec()));
        }
        assert_eq!(parent.get(b"k1").unwrap(), Some(b"v1".to_vec()));
        assert_eq!(parent.get(b"k2").unwrap(), None);
    }

    #[test]
    fn test_cache_write_applies_changes() {
        let mut parent = MemStore::new();
        parent.set(b"k1", b"v1").unwrap();

        let mut cache = CacheStore::new(&mut parent);
        cache.set(b"k2", b"v2").unwrap();
        cache.delete(b"k1").unwrap();
        assert_eq!(cache.pending(), 2);
        cache.write().unwrap();

        assert_eq!(parent.get(b"k1").unwrap(), None);
        assert_eq!(parent.get(b"k2").unwrap(), Some(b"v2".to_vec()));
    }

    #[test]
    fn test_owned_branch_commit_and_discard() {
        let mut parent = MemStore::new();
        parent.set(b"k1", b"v1").unwrap();
        let mut cache = CacheStore::new(parent);

        cache.set(b"k2", b"v2").unwrap();
        cache.discard();
        assert_eq!(cache.get(b"k2").unwrap(), None);

        cache.set(b"k3", b"v3").unwrap();
        cache.delete(b"k1").unwrap();
        let changes: Vec<_> = cache.changes().collect();
        assert_eq!(changes, vec![(&b"k1"[..], None), (&b"k3"[..], Some(&b"v3"[..]))]);

        cache.commit().unwrap();
        assert_eq!(cache.pending(), 0);
        assert_eq!(cache.parent().get(b"k1").unwrap(), None);
        assert_eq!(cache.parent().get(b"k3").unwrap(), Some(b"v3".to_vec()));
    }

    #[test]
    fn test_cache_scan_merges_overlay() {
        let mut parent = MemStore::new();
        parent.set(&[5, 1], b"old").unwrap();
        parent.set(&[5, 2], b"gone").unwrap();

        let mut cache = CacheStore::new(&mut parent);
        cache.set(&[5, 1], b"new").unwrap();
        cache.delete(&[5, 2]).unwrap();
        cache.set(&[5, 3], b"added").unwrap();
        cache.set(&[6, 0], b"other").unwrap();

        let scanned = cache.scan_prefix(&[5]).unwrap();
        assert_eq!(
            scanned,
            vec![
                (vec![5, 1], b"new".to_vec()),
                (vec![5, 3], b"added".to_vec()),
            ]
        );
    }
}
