use crate::hash::{NodeHash, HASH_LEN};

/// Domain-separated BLAKE3 content hasher producing 20-byte node hashes.
///
/// The domain tag is prepended to every computation, so the same bytes
/// hashed under two tags never share an address. Output is read from the
/// BLAKE3 extendable output and cut at [`HASH_LEN`] bytes.
#[derive(Clone, Copy, Debug)]
pub struct NodeHasher {
    domain: &'static str,
}

impl NodeHasher {
    /// Hasher for chain nodes.
    pub const NODE: Self = Self {
        domain: "linkfs-node-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> NodeHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        let mut out = [0u8; HASH_LEN];
        hasher.finalize_xof().fill(&mut out);
        NodeHash::from_raw(out)
    }

    /// Verify that data produces the expected hash.
    pub fn verify(&self, data: &[u8], expected: &NodeHash) -> bool {
        self.hash(data) == *expected
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

impl Default for NodeHasher {
    fn default() -> Self {
        Self::NODE
    }
}
