//! Protocol error types.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while framing or decoding messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Message exceeds the maximum allowed size.
    #[error("message too large: {size} bytes (max: {max})")]
    MessageTooLarge { size: u32, max: u32 },

    /// JSON encoding or decoding failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error during read/write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Buffer ended before the full message arrived.
    #[error("incomplete message: expected {expected} bytes, got {received}")]
    IncompleteMessage { expected: usize, received: usize },

    /// Zero-length message received.
    #[error("empty message")]
    EmptyMessage,

    /// Operation timed out.
    #[error("timeout during {operation}")]
    Timeout { operation: String },
}
