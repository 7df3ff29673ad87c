//! Wire-level errors.

use thiserror::Error;

/// Errors that can occur while framing or transporting a request/response.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode frame: {0}")]
    Encode(postcard::Error),

    #[error("failed to decode frame: {0}")]
    Decode(postcard::Error),

    #[error("frame of {0} bytes exceeds the {1}-byte limit")]
    FrameTooLarge(u32, u32),

    #[error("call to {0} did not complete within the deadline")]
    Timeout(String),

    #[error("connection closed before a complete frame was received")]
    ConnectionClosed,
}
