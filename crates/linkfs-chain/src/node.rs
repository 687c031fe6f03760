//! Node wire format: `[20-byte successor pointer][chunk bytes]`.

use linkfs_types::{NodeHash, HASH_LEN};
use serde::Serialize;

use crate::error::{ChainError, ChainResult};

/// Concatenate a successor pointer and a chunk into node bytes.
pub fn encode_node(next: &NodeHash, chunk: &[u8]) -> Vec<u8> {
    let mut node = Vec::with_capacity(HASH_LEN + chunk.len());
    node.extend_from_slice(next.as_bytes());
    node.extend_from_slice(chunk);
    node
}

/// Split node bytes fetched from `hash` into its pointer and payload.
pub fn decode_node<'a>(hash: &NodeHash, bytes: &'a [u8]) -> ChainResult<(NodeHash, &'a [u8])> {
    if bytes.len() < HASH_LEN {
        return Err(ChainError::MalformedNode {
            hash: *hash,
            len: bytes.len(),
        });
    }
    let (pointer, payload) = bytes.split_at(HASH_LEN);
    Ok((NodeHash::from_slice(pointer)?, payload))
}

/// Summary of one fetched node, as reported by chain inspection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChainNode {
    /// Address the node was fetched from.
    pub hash: NodeHash,
    /// Successor pointer, or the sentinel for the tail.
    pub next: NodeHash,
    /// Payload length in bytes.
    pub payload_len: usize,
}

impl ChainNode {
    /// Describe the node whose bytes were fetched from `hash`.
    pub fn parse(hash: &NodeHash, bytes: &[u8]) -> ChainResult<Self> {
        let (next, payload) = decode_node(hash, bytes)?;
        Ok(Self {
            hash: *hash,
            next,
            payload_len: payload.len(),
        })
    }

    pub fn is_tail(&self) -> bool {
        self.next.is_sentinel()
    }
}
