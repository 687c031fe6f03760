//! Foundation types for linkfs.
//!
//! Every node of a stored chain is addressed by a [`NodeHash`], the 20-byte
//! content hash of the node's bytes. This crate owns that type, its
//! canonical hex form, and the [`NodeHasher`] used by the bundled stores.
//!
//! # Key Types
//!
//! - [`NodeHash`] -- 20-byte content address, also the in-node successor pointer
//! - [`NodeHasher`] -- domain-separated BLAKE3 hasher truncated to 20 bytes
//! - [`TypeError`] -- hex and length validation failures

pub mod error;
pub mod hash;
pub mod hasher;

pub use error::TypeError;
pub use hash::{NodeHash, HASH_HEX_LEN, HASH_LEN};
pub use hasher::NodeHasher;
