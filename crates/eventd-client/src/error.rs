//! Client error types.

use thiserror::Error;

use eventd_protocol::{ErrorResponse, Response};

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the CLI.
#[derive(Debug, Error)]
pub enum ClientError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Protocol error (framing, encoding).
    #[error("protocol error: {0}")]
    Protocol(#[from] eventd_protocol::ProtocolError),

    /// Error from the embedded server (serve command).
    #[error("server error: {0}")]
    Server(#[from] eventd_server::ServerError),

    /// Error from the event store (serve command seeding).
    #[error("store error: {0}")]
    Store(#[from] eventd_store::StoreError),

    /// JSON rendering failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The daemon rejected the request.
    #[error("{0}")]
    Daemon(ErrorResponse),

    /// The daemon answered with a response this command cannot use.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Could not reach the daemon.
    #[error("cannot connect to daemon at {path}: {source}")]
    Connect {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl ClientError {
    /// Creates an unexpected-response error.
    pub fn unexpected(response: &Response) -> Self {
        Self::UnexpectedResponse(format!("{response:?}"))
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
