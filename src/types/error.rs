//! Error types for listsync

use std::collections::HashMap;

/// Error from the REST API boundary
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Server answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        /// Parsed field -> message map when the body carried one
        validation: Option<HashMap<String, String>>,
    },

    /// Request sent but no response received
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Programmer error or anything else without a request/response
    #[error("{0}")]
    Unexpected(String),
}

/// Engine-level error for coordinator misuse
///
/// API failures never surface here; they are classified into toasts and
/// the operation resolves as a no-op. These variants cover calls the
/// presentation layer should have prevented.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A mutation batch is already in flight on this coordinator
    #[error("operation already in flight")]
    OperationInFlight,

    /// Confirm called with nothing staged
    #[error("nothing staged for confirmation")]
    NothingStaged,

    /// Merge confirmed with an empty name
    #[error("merge name must not be empty")]
    EmptyMergeName,

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result type for listsync operations
pub type Result<T> = std::result::Result<T, SyncError>;
