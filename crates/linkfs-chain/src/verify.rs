//! Offline well-formedness check for a list of fetched nodes.

use linkfs_types::{NodeHash, NodeHasher};

use crate::error::{ChainError, ChainResult};
use crate::node::decode_node;

/// Verify that `nodes` (address, bytes), head first, form a valid chain.
///
/// Checks:
/// 1. Every node's bytes hash to its address
/// 2. Each node's pointer is the next node's address
/// 3. The last node's pointer is the sentinel
pub fn verify_chain(nodes: &[(NodeHash, Vec<u8>)], hasher: &NodeHasher) -> ChainResult<()> {
    for (index, (hash, bytes)) in nodes.iter().enumerate() {
        let computed = hasher.hash(bytes);
        if computed != *hash {
            return Err(ChainError::IntegrityMismatch {
                expected: *hash,
                computed,
            });
        }

        let (next, _) = decode_node(hash, bytes)?;
        match nodes.get(index + 1) {
            Some((succ, _)) if next == *succ => {}
            Some(_) => return Err(ChainError::BrokenLink { index }),
            None if next.is_sentinel() => {}
            None => return Err(ChainError::UnterminatedChain),
        }
    }
    Ok(())
}
