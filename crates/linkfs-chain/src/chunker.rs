//! Fixed-size chunking of in-memory buffers and whole files.

use std::path::Path;

use tracing::debug;

use crate::config::ChainConfig;
use crate::error::{ChainError, ChainResult};

/// Split `buf` front to back into slices of at most `chunk_size` bytes.
///
/// Every slice but the last is exactly `chunk_size` long. Empty input
/// produces zero chunks.
pub fn chunk_buffer(buf: &[u8], chunk_size: usize) -> ChainResult<Vec<&[u8]>> {
    if chunk_size == 0 {
        return Err(ChainError::InvalidConfig(
            "chunk_size must be greater than zero".into(),
        ));
    }
    Ok(buf.chunks(chunk_size).collect())
}

/// Read a whole regular file and split it into owned chunks.
///
/// Fails with [`ChainError::NotAFile`] for directories and other non-regular
/// paths, and with [`ChainError::FileTooLarge`] when the file is bigger than
/// `config.max_file_size`. The size check happens before any bytes are read.
pub async fn chunk_file_by_name(
    path: impl AsRef<Path>,
    config: &ChainConfig,
) -> ChainResult<Vec<Vec<u8>>> {
    let path = path.as_ref();
    let meta = tokio::fs::metadata(path).await?;
    if !meta.is_file() {
        return Err(ChainError::NotAFile(path.display().to_string()));
    }
    if meta.len() > config.max_file_size {
        return Err(ChainError::FileTooLarge {
            size: meta.len(),
            max: config.max_file_size,
        });
    }

    let data = tokio::fs::read(path).await?;
    // The file may have grown between stat and read.
    if data.len() as u64 > config.max_file_size {
        return Err(ChainError::FileTooLarge {
            size: data.len() as u64,
            max: config.max_file_size,
        });
    }

    let chunks: Vec<Vec<u8>> = chunk_buffer(&data, config.chunk_size)?
        .into_iter()
        .map(<[u8]>::to_vec)
        .collect();
    debug!(path = %path.display(), bytes = data.len(), chunks = chunks.len(), "chunked file");
    Ok(chunks)
}
