//! Unified error handling for admin.

use showreel_core::{DocumentError, EntryId};
use thiserror::Error;

use crate::gist::GistError;
use crate::session::SessionError;
use crate::video::VideoError;

/// Store-level error type.
///
/// Every failure of an [`AdminStore`](crate::AdminStore) operation lands in
/// one of these variants; the underlying gist, session and video errors are
/// kept as messages only.
#[derive(Debug, Error)]
pub enum AdminError {
    /// No credential, or the credential was rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The credential is valid but does not own the document.
    #[error("Permission denied: token does not own the document")]
    PermissionDenied,

    /// The document file is missing from the gist.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Network failure or non-2xx response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Entry or video lookup miss.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The operator declined a destructive action.
    #[error("Cancelled by user")]
    UserCancelled,

    /// A mutation was attempted while anonymous.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The video exists but is private or not embeddable.
    #[error("Video is private or restricted: {0}")]
    PrivacyRestricted(String),

    /// The response arrived after logout or a newer request and was dropped.
    #[error("Superseded by a newer operation")]
    Superseded,

    /// A local edit would break a document invariant.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// The session holder failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl AdminError {
    /// Banner text for the operator.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) | Self::PermissionDenied => "Invalid Access Token",
            Self::DocumentNotFound(_) => "Portfolio document not found",
            Self::Transport(_) => "Network error, please retry",
            Self::NotFound(_) => "Not found",
            Self::UserCancelled => "Cancelled",
            Self::NotAuthenticated => "Please log in first",
            Self::PrivacyRestricted(_) => "Video is private or cannot be embedded",
            Self::Superseded => "Request superseded",
            Self::InvalidDocument(_) => "Could not update the portfolio",
            Self::Session(_) => "Could not access the stored session",
        }
    }

    /// Whether this failure came from the video lookup side.
    #[must_use]
    pub const fn is_lookup_miss(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::PrivacyRestricted(_))
    }
}

impl From<GistError> for AdminError {
    fn from(err: GistError) -> Self {
        match err {
            GistError::Unauthorized => Self::Unauthorized(err.to_string()),
            GistError::DocumentNotFound(file) => Self::DocumentNotFound(file),
            GistError::Status {
                status: 401,
                ref message,
            } => Self::Unauthorized(message.clone()),
            GistError::Transport(_)
            | GistError::Status { .. }
            | GistError::Parse(_)
            | GistError::Encode(_) => Self::Transport(err.to_string()),
        }
    }
}

impl From<VideoError> for AdminError {
    fn from(err: VideoError) -> Self {
        match err {
            VideoError::NotFound(id) => Self::NotFound(format!("video {id}")),
            VideoError::InvalidReference(reference) => {
                Self::NotFound(format!("no video id in '{reference}'"))
            }
            VideoError::PrivacyRestricted(id) => Self::PrivacyRestricted(id),
            VideoError::Http(_)
            | VideoError::Api { .. }
            | VideoError::Parse(_)
            | VideoError::Config(_) => Self::Transport(err.to_string()),
        }
    }
}

impl From<DocumentError> for AdminError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::EntryNotFound(id) => Self::entry_not_found(id),
            DocumentError::IdSpaceExhausted(_) => Self::InvalidDocument(err.to_string()),
        }
    }
}

impl AdminError {
    pub(crate) fn entry_not_found(id: EntryId) -> Self {
        Self::NotFound(format!("entry {id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gist_error_mapping() {
        assert!(matches!(
            AdminError::from(GistError::Unauthorized),
            AdminError::Unauthorized(_)
        ));
        assert!(matches!(
            AdminError::from(GistError::DocumentNotFound("f.json".to_string())),
            AdminError::DocumentNotFound(f) if f == "f.json"
        ));
        assert!(matches!(
            AdminError::from(GistError::Status {
                status: 401,
                message: "Bad credentials".to_string()
            }),
            AdminError::Unauthorized(_)
        ));
        assert!(matches!(
            AdminError::from(GistError::Status {
                status: 500,
                message: "boom".to_string()
            }),
            AdminError::Transport(_)
        ));
    }

    #[test]
    fn test_video_error_mapping() {
        let err = AdminError::from(VideoError::NotFound("abc".to_string()));
        assert!(err.is_lookup_miss());
        assert_eq!(err.user_message(), "Not found");

        let err = AdminError::from(VideoError::PrivacyRestricted("abc".to_string()));
        assert!(matches!(err, AdminError::PrivacyRestricted(_)));

        let err = AdminError::from(VideoError::Parse("bad".to_string()));
        assert!(matches!(err, AdminError::Transport(_)));
    }

    #[test]
    fn test_document_error_mapping() {
        let err = AdminError::from(DocumentError::EntryNotFound(EntryId::new(9)));
        assert_eq!(err.to_string(), "Not found: entry 9");

        let err = AdminError::from(DocumentError::IdSpaceExhausted(EntryId::new(i64::MAX)));
        assert!(matches!(err, AdminError::InvalidDocument(_)));
        assert_eq!(err.user_message(), "Could not update the portfolio");
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            AdminError::PermissionDenied.user_message(),
            "Invalid Access Token"
        );
        assert_eq!(AdminError::UserCancelled.to_string(), "Cancelled by user");
    }
}
