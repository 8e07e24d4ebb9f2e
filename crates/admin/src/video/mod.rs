//! Video metadata lookups.
//!
//! Used to pre-fill an entry form from a pasted video link. Lookups never
//! touch the document; failures are reported to the caller, who keeps the
//! form as it was.
//!
//! - [`YoutubeClient`] - oEmbed title lookup plus static thumbnail URLs
//! - [`VimeoClient`] - Vimeo simple API (`/video/{id}.json`)
//! - [`ProviderRouter`] - picks the provider from the shape of the reference
//! - [`LatestRequest`] - "latest request wins" guard for lookups keyed to a
//!   changing input

mod vimeo;
mod youtube;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use showreel_core::VideoMetadata;
use thiserror::Error;

pub use vimeo::VimeoClient;
pub use youtube::{ThumbnailQuality, YoutubeClient};

use crate::config::VideoConfig;

/// Errors that can occur during a video lookup.
#[derive(Debug, Error)]
pub enum VideoError {
    /// The input is neither an id nor a recognised video URL.
    #[error("Invalid video URL or id: {0}")]
    InvalidReference(String),

    /// The provider does not know this video.
    #[error("Video not found: {0}")]
    NotFound(String),

    /// The video exists but is private or not embeddable.
    #[error("Video is private or restricted: {0}")]
    PrivacyRestricted(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with an unexpected status.
    #[error("Provider error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the provider response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A provider endpoint in the configuration is not a valid URL.
    #[error("Invalid provider endpoint: {0}")]
    Config(String),
}

/// Port for resolving a video reference to normalized metadata.
#[async_trait]
pub trait VideoLookup: Send + Sync {
    /// Resolve a raw URL or provider id.
    ///
    /// # Errors
    ///
    /// Returns [`VideoError::NotFound`] / [`VideoError::PrivacyRestricted`]
    /// for missing or private videos, other variants for bad input and
    /// transport failures.
    async fn lookup(&self, reference: &str) -> Result<VideoMetadata, VideoError>;
}

/// Supported providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoProvider {
    Youtube,
    Vimeo,
}

impl VideoProvider {
    /// Guess the provider from a reference.
    ///
    /// Numeric ids and `vimeo.com` links are Vimeo; everything else is
    /// treated as `YouTube`.
    #[must_use]
    pub fn detect(reference: &str) -> Self {
        if vimeo::extract_video_id(reference).is_some() {
            Self::Vimeo
        } else {
            Self::Youtube
        }
    }
}

/// Dispatches lookups to the provider matching the reference.
#[derive(Debug, Clone)]
pub struct ProviderRouter {
    youtube: YoutubeClient,
    vimeo: VimeoClient,
}

impl ProviderRouter {
    /// Build both provider clients from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if an endpoint is invalid or an HTTP client fails to
    /// build.
    pub fn new(config: &VideoConfig) -> Result<Self, VideoError> {
        Ok(Self {
            youtube: YoutubeClient::new(&config.youtube_oembed_url)?,
            vimeo: VimeoClient::new(&config.vimeo_api_base)?,
        })
    }

    /// Wrap in an `Arc` for injection into the admin store.
    #[must_use]
    pub fn shared(self) -> Arc<dyn VideoLookup> {
        Arc::new(self)
    }
}

#[async_trait]
impl VideoLookup for ProviderRouter {
    async fn lookup(&self, reference: &str) -> Result<VideoMetadata, VideoError> {
        match VideoProvider::detect(reference) {
            VideoProvider::Vimeo => self.vimeo.lookup(reference).await,
            VideoProvider::Youtube => self.youtube.lookup(reference).await,
        }
    }
}

/// Ticket handed out by [`LatestRequest::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// Sequence guard for lookups that follow a changing input.
///
/// Each request takes a ticket before awaiting; when the response arrives it
/// is only applied if no newer ticket was issued in the meantime.
#[derive(Debug, Default)]
pub struct LatestRequest {
    latest: AtomicU64,
}

impl LatestRequest {
    /// Create a guard with no requests issued.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
        }
    }

    /// Start a request, superseding all earlier ones.
    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the most recent request.
    #[must_use]
    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_provider() {
        assert_eq!(VideoProvider::detect("76979871"), VideoProvider::Vimeo);
        assert_eq!(
            VideoProvider::detect("https://vimeo.com/76979871"),
            VideoProvider::Vimeo
        );
        assert_eq!(VideoProvider::detect("dQw4w9WgXcQ"), VideoProvider::Youtube);
        assert_eq!(
            VideoProvider::detect("https://youtu.be/dQw4w9WgXcQ"),
            VideoProvider::Youtube
        );
    }

    #[test]
    fn test_latest_request_wins() {
        let guard = LatestRequest::new();
        let first = guard.begin();
        assert!(guard.is_latest(first));

        let second = guard.begin();
        assert!(!guard.is_latest(first));
        assert!(guard.is_latest(second));
    }

    #[test]
    fn test_video_error_display() {
        let err = VideoError::NotFound("abc".to_string());
        assert_eq!(err.to_string(), "Video not found: abc");
    }
}
