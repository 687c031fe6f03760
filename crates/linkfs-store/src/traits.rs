use async_trait::async_trait;
use linkfs_types::NodeHash;

use crate::error::StoreResult;

/// Immutable content-addressed key-value store.
///
/// This is the whole surface linkfs needs from the network: a distributed
/// hash table, a local directory, or an in-memory map all fit behind it.
///
/// Implementations must satisfy these invariants:
/// - `put` is idempotent. The same payload always yields the same hash and
///   storing it twice has no further effect.
/// - A hash returned by `put` is never [`NodeHash::SENTINEL`].
/// - `get` is read-only. It may be stale or transiently miss a payload that
///   was stored; callers decide whether to retry.
/// - No ordering or transaction guarantee holds across calls.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Store a payload and return its content hash.
    async fn put(&self, payload: &[u8]) -> StoreResult<NodeHash>;

    /// Fetch a payload by hash.
    ///
    /// Returns `Ok(None)` if the payload is not (currently) available.
    async fn get(&self, hash: &NodeHash) -> StoreResult<Option<Vec<u8>>>;
}

#[async_trait]
impl<S: ChunkStore + ?Sized> ChunkStore for std::sync::Arc<S> {
    async fn put(&self, payload: &[u8]) -> StoreResult<NodeHash> {
        (**self).put(payload).await
    }

    async fn get(&self, hash: &NodeHash) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(hash).await
    }
}
