//! `YouTube` lookups.
//!
//! Thumbnails come from the static `img.youtube.com` paths; only the title
//! needs a request (oEmbed). A failed title request is not fatal unless
//! `YouTube` says the video is missing or private.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use regex::Regex;
use reqwest::StatusCode;
use serde::Deserialize;
use showreel_core::VideoMetadata;
use tracing::{debug, instrument, warn};
use url::Url;

use super::{VideoError, VideoLookup};

/// A bare video id.
static BARE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("Invalid regex"));

/// Watch, embed, `/v/`, shorts-style and `youtu.be` links.
static URL_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
    )
    .expect("Invalid regex")
});

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const THUMBNAIL_BASE: &str = "https://img.youtube.com/vi";

/// Thumbnail sizes served for every video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailQuality {
    /// 480x360, always present.
    High,
    /// 1280x720, missing for some uploads.
    MaxRes,
}

impl ThumbnailQuality {
    const fn file_name(self) -> &'static str {
        match self {
            Self::High => "hqdefault.jpg",
            Self::MaxRes => "maxresdefault.jpg",
        }
    }
}

/// Extract the canonical 11-character id from an id or a `YouTube` URL.
#[must_use]
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if BARE_ID_RE.is_match(input) {
        return Some(input.to_string());
    }

    URL_ID_RE
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Static thumbnail URL for a video id.
#[must_use]
pub fn thumbnail_url(video_id: &str, quality: ThumbnailQuality) -> String {
    format!("{THUMBNAIL_BASE}/{video_id}/{}", quality.file_name())
}

#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    title: Option<String>,
}

/// `YouTube` metadata client with an in-memory cache of resolved videos.
#[derive(Clone)]
pub struct YoutubeClient {
    inner: Arc<YoutubeClientInner>,
}

struct YoutubeClientInner {
    client: reqwest::Client,
    oembed_url: Url,
    cache: Cache<String, VideoMetadata>,
}

impl std::fmt::Debug for YoutubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoutubeClient")
            .field("oembed_url", &self.inner.oembed_url.as_str())
            .finish_non_exhaustive()
    }
}

impl YoutubeClient {
    /// Create a new client against an oEmbed endpoint.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint is not a valid URL or the HTTP client
    /// fails to build.
    pub fn new(oembed_url: &str) -> Result<Self, VideoError> {
        let oembed_url =
            Url::parse(oembed_url).map_err(|e| VideoError::Config(format!("{oembed_url}: {e}")))?;

        let cache = Cache::builder()
            .max_capacity(500)
            .time_to_live(Duration::from_secs(3600))
            .build();

        Ok(Self {
            inner: Arc::new(YoutubeClientInner {
                client: reqwest::Client::builder().build()?,
                oembed_url,
                cache,
            }),
        })
    }

    /// oEmbed request URL for a video id.
    fn oembed_request_url(&self, video_id: &str) -> Url {
        let mut url = self.inner.oembed_url.clone();
        url.query_pairs_mut()
            .append_pair("url", &format!("{WATCH_URL}{video_id}"))
            .append_pair("format", "json");
        url
    }

    /// Fetch the video title through oEmbed.
    async fn fetch_title(&self, video_id: &str) -> Result<Option<String>, VideoError> {
        let response = self
            .inner
            .client
            .get(self.oembed_request_url(video_id))
            .send()
            .await?;

        let status = response.status();
        match status {
            s if s.is_success() => {
                let body: OEmbedResponse = response
                    .json()
                    .await
                    .map_err(|e| VideoError::Parse(format!("Invalid oEmbed response: {e}")))?;
                Ok(body.title.filter(|t| !t.is_empty()))
            }
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
                Err(VideoError::NotFound(video_id.to_string()))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(VideoError::PrivacyRestricted(video_id.to_string()))
            }
            _ => Err(VideoError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[async_trait]
impl VideoLookup for YoutubeClient {
    #[instrument(skip(self))]
    async fn lookup(&self, reference: &str) -> Result<VideoMetadata, VideoError> {
        let video_id = extract_video_id(reference)
            .ok_or_else(|| VideoError::InvalidReference(reference.to_string()))?;

        if let Some(cached) = self.inner.cache.get(&video_id).await {
            debug!(video_id = %video_id, "YouTube metadata cache hit");
            return Ok(cached);
        }

        let title = match self.fetch_title(&video_id).await {
            Ok(title) => title,
            Err(e @ (VideoError::NotFound(_) | VideoError::PrivacyRestricted(_))) => return Err(e),
            Err(e) => {
                warn!(video_id = %video_id, error = %e, "Could not fetch YouTube title via oEmbed");
                None
            }
        };

        let metadata = VideoMetadata {
            thumbnail_url: thumbnail_url(&video_id, ThumbnailQuality::High),
            title: title.clone().unwrap_or_default(),
            id: video_id,
        };

        // Only fully resolved lookups are cached so a transient oEmbed failure
        // is retried next time.
        if title.is_some() {
            self.inner
                .cache
                .insert(metadata.id.clone(), metadata.clone())
                .await;
        }

        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bare_id() {
        assert_eq!(
            extract_video_id("  dQw4w9WgXcQ ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_from_urls() {
        let cases = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/v/dQw4w9WgXcQ?version=3",
            "HTTPS://WWW.YOUTUBE.COM/watch?v=dQw4w9WgXcQ",
        ];
        for case in cases {
            assert_eq!(
                extract_video_id(case).as_deref(),
                Some("dQw4w9WgXcQ"),
                "failed for {case}"
            );
        }
    }

    #[test]
    fn test_extract_rejects_garbage() {
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("not a video"), None);
        assert_eq!(extract_video_id("https://example.com/watch?v=dQw4w9WgXcQ"), None);
        assert_eq!(extract_video_id("short"), None);
    }

    #[test]
    fn test_thumbnail_urls() {
        assert_eq!(
            thumbnail_url("dQw4w9WgXcQ", ThumbnailQuality::High),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
        );
        assert_eq!(
            thumbnail_url("dQw4w9WgXcQ", ThumbnailQuality::MaxRes),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"
        );
    }

    #[test]
    fn test_oembed_request_url() {
        let client = YoutubeClient::new("https://www.youtube.com/oembed").expect("client builds");
        let url = client.oembed_request_url("dQw4w9WgXcQ");

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (
                    "url".to_string(),
                    "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string()
                ),
                ("format".to_string(), "json".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = YoutubeClient::new("not a url");
        assert!(matches!(result, Err(VideoError::Config(_))));
    }

    #[tokio::test]
    async fn test_lookup_rejects_invalid_reference_without_request() {
        let client = YoutubeClient::new("https://www.youtube.com/oembed").expect("client builds");
        let result = client.lookup("https://example.com/video").await;
        assert!(matches!(result, Err(VideoError::InvalidReference(_))));
    }
}
