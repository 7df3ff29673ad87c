//! Server error types.

use triplex_storage::StorageError;
use triplex_wire::WireError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur during server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Wire protocol error.
    #[error("wire protocol error: {0}")]
    Wire(#[from] WireError),

    /// Durable store error.
    #[error("durable store error: {0}")]
    Storage(#[from] StorageError),

    /// I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection closed before a full request was read.
    #[error("connection closed")]
    ConnectionClosed,

    /// Bind failed.
    #[error("failed to bind to {addr}: {source}")]
    BindFailed { addr: String, source: std::io::Error },
}
