use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use linkfs_types::{NodeHash, NodeHasher};
use tracing::trace;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::traits::ChunkStore;

/// Directory-backed chunk store.
///
/// Each payload lives in its own file at `<root>/<first 2 hex>/<remaining 38 hex>`.
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader never observes a partially written payload.
#[derive(Debug, Clone)]
pub struct FsChunkStore {
    root: PathBuf,
    hasher: NodeHasher,
}

impl FsChunkStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub async fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            hasher: NodeHasher::NODE,
        })
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, hash: &NodeHash) -> PathBuf {
        let hex = hash.to_hex();
        self.root.join(&hex[..2]).join(&hex[2..])
    }
}

#[async_trait]
impl ChunkStore for FsChunkStore {
    async fn put(&self, payload: &[u8]) -> StoreResult<NodeHash> {
        let hash = self.hasher.hash(payload);
        if hash.is_sentinel() {
            return Err(StoreError::SentinelHash);
        }
        let path = self.path_for(&hash);
        if tokio::fs::try_exists(&path).await? {
            trace!(hash = %hash.short_hex(), "payload already present");
            return Ok(hash);
        }
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        // Unique per call: concurrent puts of the same payload must not share a temp file.
        let tmp = path.with_extension(format!("tmp.{}", Uuid::new_v4()));
        tokio::fs::write(&tmp, payload).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            if tokio::fs::try_exists(&path).await? {
                trace!(hash = %hash.short_hex(), "payload written concurrently");
                return Ok(hash);
            }
            return Err(StoreError::Io(e));
        }
        trace!(hash = %hash.short_hex(), len = payload.len(), "put");
        Ok(hash)
    }

    async fn get(&self, hash: &NodeHash) -> StoreResult<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(hash)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsChunkStore::open(dir.path()).await.unwrap();
        let hash = store.put(b"on disk").await.unwrap();
        assert_eq!(store.get(&hash).await.unwrap().unwrap(), b"on disk");
    }

    #[tokio::test]
    async fn layout_uses_hex_fanout() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsChunkStore::open(dir.path()).await.unwrap();
        let hash = store.put(b"fanout").await.unwrap();
        let hex = hash.to_hex();
        assert!(dir.path().join(&hex[..2]).join(&hex[2..]).is_file());
    }

    #[tokio::test]
    async fn same_hashes_as_memory_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsChunkStore::open(dir.path()).await.unwrap();
        let hash = store.put(b"payload").await.unwrap();
        assert_eq!(hash, NodeHasher::NODE.hash(b"payload"));
    }

    #[tokio::test]
    async fn put_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsChunkStore::open(dir.path()).await.unwrap();
        let h1 = store.put(b"twice").await.unwrap();
        let h2 = store.put(b"twice").await.unwrap();
        assert_eq!(h1, h2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_identical_puts_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsChunkStore::open(dir.path()).await.unwrap();
        for round in 0..20u32 {
            let payload: Vec<u8> = (0..64 * 1024u32).map(|i| (i ^ round) as u8).collect();
            let expected = NodeHasher::NODE.hash(&payload);
            let tasks: Vec<_> = (0..16)
                .map(|_| {
                    let store = store.clone();
                    let payload = payload.clone();
                    tokio::spawn(async move { store.put(&payload).await })
                })
                .collect();
            for task in tasks {
                assert_eq!(task.await.unwrap().unwrap(), expected);
            }
            assert_eq!(store.get(&expected).await.unwrap().unwrap(), payload);
        }

        // No temp files left behind next to the stored payloads.
        for fanout in std::fs::read_dir(dir.path()).unwrap() {
            for entry in std::fs::read_dir(fanout.unwrap().path()).unwrap() {
                let name = entry.unwrap().file_name();
                assert!(!name.to_string_lossy().contains(".tmp."), "stray {name:?}");
            }
        }
    }

    #[tokio::test]
    async fn missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsChunkStore::open(dir.path()).await.unwrap();
        let missing = NodeHash::from_raw([3u8; 20]);
        assert!(store.get(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reopen_sees_existing_payloads() {
        let dir = tempfile::tempdir().unwrap();
        let hash = {
            let store = FsChunkStore::open(dir.path()).await.unwrap();
            store.put(b"persisted").await.unwrap()
        };
        let store = FsChunkStore::open(dir.path()).await.unwrap();
        assert_eq!(store.get(&hash).await.unwrap().unwrap(), b"persisted");
    }
}
