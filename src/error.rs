//! Error types for orgstream
//!
//! One crate-wide taxonomy. Nothing here is caught internally; every layer
//! hands failures straight to its caller.

use thiserror::Error;

/// Core error type for orgstream operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required key was absent (or its parent was not an object) while
    /// traversing a nested payload. Carries the exact key that was missing.
    #[error("key not found in nested payload: {0:?}")]
    KeyNotFound(String),

    /// Network-level failure: the request could not be sent, the body could
    /// not be read, or the connection dropped mid-flight.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API request failed: {status}")]
    Api { status: reqwest::StatusCode },

    /// The response decoded, but not into the shape the caller expects
    /// (non-JSON body, non-string `repos_url`, collection that is not a
    /// sequence of records).
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Backing store failure on the streaming side.
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),
}

/// Result type alias for orgstream operations
pub type Result<T> = std::result::Result<T, Error>;
