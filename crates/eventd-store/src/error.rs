//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by an event store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with the given id.
    #[error("event `{id}` not found")]
    NotFound { id: String },

    /// A stored value could not be decoded into its typed field.
    #[error("event `{id}`: cannot decode `{field}`: {message}")]
    Decode {
        id: String,
        field: String,
        message: String,
    },

    /// A seed file could not be read or parsed.
    #[error("cannot load seed data: {message}")]
    Seed { message: String },

    /// The backing store failed.
    #[error("store backend error: {message}")]
    Backend { message: String },
}

impl StoreError {
    /// Creates a not-found error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates a decode error for one field of one record.
    pub fn decode(
        id: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Decode {
            id: id.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a seed-data error.
    pub fn seed(message: impl Into<String>) -> Self {
        Self::Seed {
            message: message.into(),
        }
    }

    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
