//! Durable store errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading or storing a durable snapshot.
///
/// The spec treats every failure here as fatal to the process (§4.4: "a
/// failure to persist state is a replica crash, not a recoverable error") —
/// callers are expected to log and exit rather than attempt recovery.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("i/o error on {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("failed to decode snapshot at {path}: {source}")]
    Decode { path: PathBuf, source: postcard::Error },

    #[error("failed to encode snapshot for {path}: {source}")]
    Encode { path: PathBuf, source: postcard::Error },
}
