use std::path::Path;

use linkfs_store::ChunkStore;
use linkfs_types::NodeHash;
use serde::Serialize;
use tracing::{debug, info};

use crate::chunker::{chunk_buffer, chunk_file_by_name};
use crate::config::ChainConfig;
use crate::error::{ChainError, ChainResult};
use crate::node::encode_node;

/// Hashes of a freshly stored chain, head first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoredChain {
    hashes: Vec<NodeHash>,
}

impl StoredChain {
    /// Hash of the first node. Enough to fetch the whole file back.
    pub fn head(&self) -> NodeHash {
        self.hashes[0]
    }

    /// Every node hash, head first.
    pub fn hashes(&self) -> &[NodeHash] {
        &self.hashes
    }

    /// Number of nodes in the chain. Always at least one.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn into_hashes(self) -> Vec<NodeHash> {
        self.hashes
    }
}

/// Persists chunks as a sentinel-terminated chain of nodes.
///
/// A node's pointer must be the hash of its already-stored successor, so
/// the chain is written tail first, one `put` at a time.
pub struct ChainBuilder<S> {
    store: S,
    config: ChainConfig,
}

impl<S: ChunkStore> ChainBuilder<S> {
    pub fn new(store: S, config: ChainConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Store chunks as a linked chain and return the node hashes head first.
    ///
    /// An empty chunk list is stored as a single node with an empty payload,
    /// so a zero-length file still has a head hash and round-trips.
    ///
    /// The first failing `put` aborts with [`ChainError::StoreWrite`]. Nodes
    /// written before it stay in the store, unreferenced.
    #[tracing::instrument(skip_all, fields(chunks = chunks.len()))]
    pub async fn store_chunks<C: AsRef<[u8]>>(&self, chunks: &[C]) -> ChainResult<StoredChain> {
        let mut payloads: Vec<&[u8]> = chunks.iter().map(|c| c.as_ref()).collect();
        if payloads.is_empty() {
            payloads.push(&[]);
        }

        let mut hashes = Vec::with_capacity(payloads.len());
        let mut next = NodeHash::SENTINEL;
        for (index, chunk) in payloads.iter().enumerate().rev() {
            let node = encode_node(&next, chunk);
            let hash = self
                .store
                .put(&node)
                .await
                .map_err(|source| ChainError::StoreWrite { index, source })?;
            debug!(index, hash = %hash.short_hex(), next = %next.short_hex(), len = chunk.len(), "stored node");
            hashes.push(hash);
            next = hash;
        }
        hashes.reverse();

        info!(head = %hashes[0], nodes = hashes.len(), "chain stored");
        Ok(StoredChain { hashes })
    }

    /// Chunk an in-memory buffer and store it.
    pub async fn store_buffer(&self, buf: &[u8]) -> ChainResult<StoredChain> {
        if buf.len() as u64 > self.config.max_file_size {
            return Err(ChainError::FileTooLarge {
                size: buf.len() as u64,
                max: self.config.max_file_size,
            });
        }
        let chunks = chunk_buffer(buf, self.config.chunk_size)?;
        self.store_chunks(&chunks).await
    }

    /// Read a regular file, chunk it, and store it.
    pub async fn store_file_by_name(&self, path: impl AsRef<Path>) -> ChainResult<StoredChain> {
        let chunks = chunk_file_by_name(path, &self.config).await?;
        self.store_chunks(&chunks).await
    }
}
