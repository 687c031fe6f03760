use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use linkfs_types::{NodeHash, NodeHasher};
use tracing::trace;

use crate::error::{StoreError, StoreResult};
use crate::traits::ChunkStore;

/// In-memory, HashMap-based chunk store.
///
/// Intended for tests and embedding. Payloads are held behind a `RwLock`
/// and cloned on read/write.
pub struct InMemoryChunkStore {
    hasher: NodeHasher,
    payloads: RwLock<HashMap<NodeHash, Vec<u8>>>,
}

impl InMemoryChunkStore {
    /// Create a new empty in-memory store using the node hasher.
    pub fn new() -> Self {
        Self::with_hasher(NodeHasher::NODE)
    }

    /// Create a new empty store hashing with the given hasher.
    pub fn with_hasher(hasher: NodeHasher) -> Self {
        Self {
            hasher,
            payloads: RwLock::new(HashMap::new()),
        }
    }

    /// Number of payloads currently stored.
    pub fn len(&self) -> usize {
        self.payloads.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.payloads.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored payloads.
    pub fn total_bytes(&self) -> u64 {
        self.payloads
            .read()
            .expect("lock poisoned")
            .values()
            .map(|p| p.len() as u64)
            .sum()
    }

    /// Returns `true` if a payload with this hash is stored.
    pub fn contains(&self, hash: &NodeHash) -> bool {
        self.payloads
            .read()
            .expect("lock poisoned")
            .contains_key(hash)
    }

    /// Overwrite the bytes stored under `hash` without rehashing.
    ///
    /// Only useful for simulating a corrupted or poisoned backend.
    pub fn insert_raw(&self, hash: NodeHash, payload: Vec<u8>) {
        self.payloads
            .write()
            .expect("lock poisoned")
            .insert(hash, payload);
    }

    /// Remove the payload stored under `hash`. Returns `true` if it existed.
    pub fn remove(&self, hash: &NodeHash) -> bool {
        self.payloads
            .write()
            .expect("lock poisoned")
            .remove(hash)
            .is_some()
    }

    /// Remove all payloads from the store.
    pub fn clear(&self) {
        self.payloads.write().expect("lock poisoned").clear();
    }

    /// Return a sorted list of all stored hashes.
    pub fn all_hashes(&self) -> Vec<NodeHash> {
        let map = self.payloads.read().expect("lock poisoned");
        let mut hashes: Vec<NodeHash> = map.keys().copied().collect();
        hashes.sort();
        hashes
    }
}

impl Default for InMemoryChunkStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChunkStore for InMemoryChunkStore {
    async fn put(&self, payload: &[u8]) -> StoreResult<NodeHash> {
        let hash = self.hasher.hash(payload);
        if hash.is_sentinel() {
            return Err(StoreError::SentinelHash);
        }
        let mut map = self.payloads.write().expect("lock poisoned");
        map.entry(hash).or_insert_with(|| payload.to_vec());
        trace!(hash = %hash.short_hex(), len = payload.len(), "put");
        Ok(hash)
    }

    async fn get(&self, hash: &NodeHash) -> StoreResult<Option<Vec<u8>>> {
        let map = self.payloads.read().expect("lock poisoned");
        Ok(map.get(hash).cloned())
    }
}

impl std::fmt::Debug for InMemoryChunkStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryChunkStore")
            .field("domain", &self.hasher.domain())
            .field("payload_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_and_get() {
        let store = InMemoryChunkStore::new();
        let hash = store.put(b"hello world").await.unwrap();
        assert!(!hash.is_sentinel());

        let read_back = store.get(&hash).await.unwrap().expect("should exist");
        assert_eq!(read_back, b"hello world");
    }

    #[tokio::test]
    async fn hash_matches_node_hasher() {
        let store = InMemoryChunkStore::new();
        let hash = store.put(b"payload").await.unwrap();
        assert_eq!(hash, NodeHasher::NODE.hash(b"payload"));
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = InMemoryChunkStore::new();
        let missing = NodeHash::from_raw([9u8; 20]);
        assert!(store.get(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_is_idempotent() {
        let store = InMemoryChunkStore::new();
        let h1 = store.put(b"same").await.unwrap();
        let h2 = store.put(b"same").await.unwrap();
        assert_eq!(h1, h2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.total_bytes(), 4);
    }

    #[tokio::test]
    async fn different_payloads_get_different_hashes() {
        let store = InMemoryChunkStore::new();
        let h1 = store.put(b"one").await.unwrap();
        let h2 = store.put(b"two").await.unwrap();
        assert_ne!(h1, h2);
        assert_eq!(store.all_hashes().len(), 2);
    }

    #[tokio::test]
    async fn remove_and_clear() {
        let store = InMemoryChunkStore::new();
        let h = store.put(b"gone").await.unwrap();
        assert!(store.contains(&h));
        assert!(store.remove(&h));
        assert!(!store.remove(&h));

        store.put(b"a").await.unwrap();
        store.put(b"b").await.unwrap();
        store.clear();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn insert_raw_bypasses_hashing() {
        let store = InMemoryChunkStore::new();
        let h = store.put(b"original").await.unwrap();
        store.insert_raw(h, b"poisoned".to_vec());
        assert_eq!(store.get(&h).await.unwrap().unwrap(), b"poisoned");
    }

    #[test]
    fn debug_shows_count() {
        let store = InMemoryChunkStore::new();
        let s = format!("{store:?}");
        assert!(s.contains("payload_count: 0"));
    }
}
