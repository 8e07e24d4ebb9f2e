//! Gist-related errors.

use thiserror::Error;

/// Errors that can occur when talking to the gist API.
///
/// Raw `reqwest` failures never escape the gist module untyped; they land in
/// [`GistError::Transport`].
#[derive(Debug, Error)]
pub enum GistError {
    /// A write was attempted without a credential.
    #[error("Unauthorized: admin token required")]
    Unauthorized,

    /// The gist exists but does not contain the configured file.
    #[error("Config file '{0}' not found in gist")]
    DocumentNotFound(String),

    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("Gist request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("Gist API returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body excerpt, plus a hint for failed writes.
        message: String,
    },

    /// The response body or the document inside it could not be parsed.
    #[error("Gist response error: {0}")]
    Parse(String),

    /// The document could not be serialized for upload.
    #[error("Failed to encode document: {0}")]
    Encode(String),
}

impl GistError {
    /// Whether this is a connection-level failure rather than an API answer.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// HTTP status, when the API answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
