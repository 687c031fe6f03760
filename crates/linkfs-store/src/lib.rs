//! Content-addressed chunk storage for linkfs.
//!
//! linkfs treats its backing store as an external collaborator with exactly
//! two operations: `put(bytes) -> hash` and `get(hash) -> bytes`. The
//! [`ChunkStore`] trait captures that contract; everything else about the
//! store (replication, durability, peer discovery, expiry) is its own
//! business.
//!
//! # Storage Backends
//!
//! - [`InMemoryChunkStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsChunkStore`] -- one file per payload under a local directory
//!
//! Both hash payloads with [`linkfs_types::NodeHasher::NODE`].

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsChunkStore;
pub use memory::InMemoryChunkStore;
pub use traits::ChunkStore;
