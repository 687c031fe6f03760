use linkfs_store::StoreError;
use linkfs_types::{NodeHash, TypeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("not a regular file: {0}")]
    NotAFile(String),

    #[error("file too large: {size} bytes exceeds the {max} byte limit")]
    FileTooLarge { size: u64, max: u64 },

    #[error("format error: {0}")]
    Format(#[from] TypeError),

    #[error("store write failed at chunk {index}: {source}")]
    StoreWrite {
        index: usize,
        #[source]
        source: StoreError,
    },

    #[error("store read failed for {hash}: {source}")]
    StoreRead {
        hash: NodeHash,
        #[source]
        source: StoreError,
    },

    #[error("fetch of {hash} failed after retry: {source}")]
    FetchExhausted {
        hash: NodeHash,
        #[source]
        source: StoreError,
    },

    #[error("malformed node {hash}: {len} bytes is shorter than a pointer")]
    MalformedNode { hash: NodeHash, len: usize },

    #[error("integrity mismatch: requested {expected}, content hashes to {computed}")]
    IntegrityMismatch { expected: NodeHash, computed: NodeHash },

    #[error("broken link at node {index}: pointer does not match the next node")]
    BrokenLink { index: usize },

    #[error("chain does not end in the sentinel pointer")]
    UnterminatedChain,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ChainResult<T> = Result<T, ChainError>;
