use linkfs_store::{ChunkStore, StoreError};
use linkfs_types::{NodeHash, NodeHasher, HASH_LEN};
use tracing::{debug, info, warn};

use crate::config::ChainConfig;
use crate::error::{ChainError, ChainResult};
use crate::node::ChainNode;

/// Where a chain walk currently stands.
#[derive(Debug)]
enum FetchState {
    /// First attempt at the current node.
    Fetching,
    /// The first attempt failed; wait, then try once more.
    Retrying(StoreError),
    /// The tail has been consumed.
    Done,
    /// Both attempts at the current node failed.
    Failed(StoreError),
}

/// Walks a chain from its head hash and reassembles the file.
///
/// Each node is fetched strictly after its predecessor, since the next
/// address is only known once the previous node is in hand. A failed or
/// empty `get` is retried exactly once after `config.retry_delay`.
pub struct ChainReader<S> {
    store: S,
    config: ChainConfig,
    hasher: NodeHasher,
}

impl<S: ChunkStore> ChainReader<S> {
    pub fn new(store: S, config: ChainConfig) -> Self {
        Self {
            store,
            config,
            hasher: NodeHasher::NODE,
        }
    }

    /// Verify reads with the hasher the backing store addresses nodes by.
    pub fn with_hasher(mut self, hasher: NodeHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Fetch every node reachable from `head` and concatenate the payloads.
    ///
    /// A sentinel head is the empty chain and yields no bytes.
    #[tracing::instrument(skip(self, head), fields(head = %head.short_hex()))]
    pub async fn fetch_file(&self, head: &NodeHash) -> ChainResult<Vec<u8>> {
        let mut out = Vec::new();
        self.walk(head, |_, bytes| out.extend_from_slice(&bytes[HASH_LEN..]))
            .await?;
        info!(bytes = out.len(), "file fetched");
        Ok(out)
    }

    /// Walk the chain and describe each node instead of collecting bytes.
    pub async fn fetch_nodes(&self, head: &NodeHash) -> ChainResult<Vec<ChainNode>> {
        let mut nodes = Vec::new();
        self.walk(head, |node, _| nodes.push(node)).await?;
        Ok(nodes)
    }

    /// Walk the chain and keep each node's address and raw bytes, head first.
    pub async fn fetch_raw(&self, head: &NodeHash) -> ChainResult<Vec<(NodeHash, Vec<u8>)>> {
        let mut nodes = Vec::new();
        self.walk(head, |node, bytes| nodes.push((node.hash, bytes.to_vec())))
            .await?;
        Ok(nodes)
    }

    /// Single attempt at one node, without retry or verification.
    pub async fn fetch_node(&self, hash: &NodeHash) -> ChainResult<Vec<u8>> {
        self.get(hash)
            .await
            .map_err(|source| ChainError::StoreRead { hash: *hash, source })
    }

    async fn get(&self, hash: &NodeHash) -> Result<Vec<u8>, StoreError> {
        self.store
            .get(hash)
            .await?
            .ok_or(StoreError::NotFound(*hash))
    }

    async fn walk<F>(&self, head: &NodeHash, mut visit: F) -> ChainResult<()>
    where
        F: FnMut(ChainNode, &[u8]),
    {
        let mut current = *head;
        let mut total: u64 = 0;
        let mut state = if current.is_sentinel() {
            FetchState::Done
        } else {
            FetchState::Fetching
        };

        loop {
            state = match state {
                FetchState::Fetching => match self.get(&current).await {
                    Ok(bytes) => self.accept(&mut current, &mut total, &bytes, &mut visit)?,
                    Err(e) => {
                        warn!(hash = %current.short_hex(), error = %e, delay = ?self.config.retry_delay, "get failed, will retry");
                        FetchState::Retrying(e)
                    }
                },
                FetchState::Retrying(first) => {
                    tokio::time::sleep(self.config.retry_delay).await;
                    match self.get(&current).await {
                        Ok(bytes) => self.accept(&mut current, &mut total, &bytes, &mut visit)?,
                        Err(e) => {
                            debug!(hash = %current.short_hex(), first = %first, "retry failed");
                            FetchState::Failed(e)
                        }
                    }
                }
                FetchState::Done => return Ok(()),
                FetchState::Failed(source) => {
                    return Err(ChainError::FetchExhausted {
                        hash: current,
                        source,
                    })
                }
            };
        }
    }

    /// Consume one fetched node and decide where the walk goes next.
    ///
    /// `visit` receives the node summary and its full bytes, pointer included.
    fn accept<F>(
        &self,
        current: &mut NodeHash,
        total: &mut u64,
        bytes: &[u8],
        visit: &mut F,
    ) -> ChainResult<FetchState>
    where
        F: FnMut(ChainNode, &[u8]),
    {
        if self.config.verify_reads {
            let computed = self.hasher.hash(bytes);
            if computed != *current {
                return Err(ChainError::IntegrityMismatch {
                    expected: *current,
                    computed,
                });
            }
        }

        let node = ChainNode::parse(current, bytes)?;
        let next = node.next;
        *total += node.payload_len as u64;
        if *total > self.config.max_file_size {
            return Err(ChainError::FileTooLarge {
                size: *total,
                max: self.config.max_file_size,
            });
        }

        debug!(hash = %current.short_hex(), next = %next.short_hex(), len = node.payload_len, "fetched node");
        visit(node, bytes);

        if next.is_sentinel() {
            Ok(FetchState::Done)
        } else {
            *current = next;
            Ok(FetchState::Fetching)
        }
    }
}
