//! Fault-injecting store used by the chain tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use linkfs_store::{ChunkStore, InMemoryChunkStore, StoreError, StoreResult};
use linkfs_types::NodeHash;

/// Wraps an [`InMemoryChunkStore`] and fails selected calls on demand.
#[derive(Default)]
pub(crate) struct FlakyStore {
    pub(crate) inner: InMemoryChunkStore,
    errors: Mutex<HashMap<NodeHash, usize>>,
    misses: Mutex<HashMap<NodeHash, usize>>,
    puts_allowed: Mutex<Option<usize>>,
    gets: AtomicUsize,
    puts: AtomicUsize,
}

impl FlakyStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The next `n` gets of `hash` return an error.
    pub(crate) fn fail_gets(&self, hash: NodeHash, n: usize) {
        self.errors.lock().unwrap().insert(hash, n);
    }

    /// The next `n` gets of `hash` report the payload as absent.
    pub(crate) fn miss_gets(&self, hash: NodeHash, n: usize) {
        self.misses.lock().unwrap().insert(hash, n);
    }

    /// Allow `n` more successful puts, then fail every put.
    pub(crate) fn fail_puts_after(&self, n: usize) {
        *self.puts_allowed.lock().unwrap() = Some(n);
    }

    pub(crate) fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub(crate) fn put_calls(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    fn take(map: &Mutex<HashMap<NodeHash, usize>>, hash: &NodeHash) -> bool {
        let mut map = map.lock().unwrap();
        match map.get_mut(hash) {
            Some(n) if *n > 0 => {
                *n -= 1;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl ChunkStore for FlakyStore {
    async fn put(&self, payload: &[u8]) -> StoreResult<NodeHash> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        {
            let mut allowed = self.puts_allowed.lock().unwrap();
            if let Some(n) = allowed.as_mut() {
                if *n == 0 {
                    return Err(StoreError::Unavailable("injected put failure".into()));
                }
                *n -= 1;
            }
        }
        self.inner.put(payload).await
    }

    async fn get(&self, hash: &NodeHash) -> StoreResult<Option<Vec<u8>>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if Self::take(&self.errors, hash) {
            return Err(StoreError::Unavailable("injected get failure".into()));
        }
        if Self::take(&self.misses, hash) {
            return Ok(None);
        }
        self.inner.get(hash).await
    }
}
