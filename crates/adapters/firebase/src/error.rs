//! Firebase adapter error types.

use plantwatch_domain::error::{PathError, PlantError};

/// Errors specific to the Firebase adapter.
#[derive(Debug, thiserror::Error)]
pub enum FirebaseError {
    /// The configured database URL does not parse.
    #[error("invalid database URL")]
    InvalidUrl(#[source] url::ParseError),

    /// The configured root prefix is not a valid store path.
    #[error("invalid root path")]
    InvalidRoot(#[source] PathError),

    /// Transport-level failure (connect, TLS, body read).
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// The database answered with a non-success status.
    #[error("database returned {status}: {body}")]
    Status { status: u16, body: String },

    /// A stream event carried a payload that does not decode.
    #[error("malformed stream event")]
    Decode(#[from] serde_json::Error),

    /// A stream event referenced a path that does not parse.
    #[error("invalid path in stream event")]
    EventPath(#[source] PathError),

    /// The server cancelled the stream, usually after a rules change.
    #[error("stream cancelled: {0}")]
    Cancelled(String),

    /// The auth token expired or was revoked mid-stream.
    #[error("stream auth revoked")]
    AuthRevoked,
}

impl FirebaseError {
    /// Convert into a [`PlantError`] for propagation across port boundaries.
    pub fn into_domain(self) -> PlantError {
        match self {
            Self::InvalidRoot(err) => PlantError::InvalidPath(err),
            other => PlantError::Store(Box::new(other)),
        }
    }
}

impl From<FirebaseError> for PlantError {
    fn from(err: FirebaseError) -> Self {
        err.into_domain()
    }
}
