//! Content-addressed linked-list encoding of files.
//!
//! A file is split into fixed-size chunks. Each chunk is stored as a node,
//! `[20-byte successor hash][chunk bytes]`, and the last node points at the
//! all-zero sentinel. Since a node's address is the hash of its bytes, the
//! head hash alone is enough to walk the chain and rebuild the file.
//!
//! # Components
//!
//! - [`chunk_buffer`] / [`chunk_file_by_name`] -- fixed-size chunking
//! - [`ChainBuilder`] -- tail-first sequential `put` of nodes
//! - [`ChainReader`] -- head-first walk with a single timed retry per node
//! - [`verify_chain`] -- offline well-formedness check
//!
//! Storage is delegated to any [`linkfs_store::ChunkStore`].

pub mod builder;
pub mod chunker;
pub mod config;
pub mod error;
pub mod node;
pub mod reader;
pub mod verify;

#[cfg(test)]
pub(crate) mod testing;

use std::path::Path;

use linkfs_store::ChunkStore;
use linkfs_types::NodeHash;

pub use builder::{ChainBuilder, StoredChain};
pub use chunker::{chunk_buffer, chunk_file_by_name};
pub use config::{ChainConfig, CHUNK_SIZE, MAX_FILE_SIZE, RETRY_DELAY};
pub use error::{ChainError, ChainResult};
pub use node::{decode_node, encode_node, ChainNode};
pub use reader::ChainReader;
pub use verify::verify_chain;

/// Store a file with the default configuration and return its node hashes, head first.
pub async fn store_file_by_name<S: ChunkStore>(
    store: S,
    path: impl AsRef<Path>,
) -> ChainResult<StoredChain> {
    ChainBuilder::new(store, ChainConfig::default())
        .store_file_by_name(path)
        .await
}

/// Fetch a file by head hash with the default configuration.
pub async fn fetch_file<S: ChunkStore>(store: S, head: &NodeHash) -> ChainResult<Vec<u8>> {
    ChainReader::new(store, ChainConfig::default())
        .fetch_file(head)
        .await
}
