//! Vimeo lookups through the public simple API.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use reqwest::StatusCode;
use serde::Deserialize;
use showreel_core::VideoMetadata;
use tracing::{debug, instrument};

use super::{VideoError, VideoLookup};

static NUMERIC_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("Invalid regex"));

static URL_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:player\.)?vimeo\.com/(?:video/|channels/[^/]+/|groups/[^/]+/videos/)?(\d+)")
        .expect("Invalid regex")
});

/// Size suffix in a Vimeo thumbnail URL, e.g. `_640.jpg`.
static THUMBNAIL_SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_\d+\.").expect("Invalid regex"));

/// Extract a numeric Vimeo id from an id or a `vimeo.com` URL.
pub(super) fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();

    if NUMERIC_ID_RE.is_match(input) {
        return Some(input.to_string());
    }

    URL_ID_RE
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Rewrite a thumbnail URL to its 1280px variant.
fn hd_thumbnail(url: &str) -> String {
    THUMBNAIL_SIZE_RE.replace(url, "_1280.").into_owned()
}

/// One element of the `/video/{id}.json` array.
#[derive(Debug, Deserialize)]
struct VimeoVideo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    thumbnail_large: Option<String>,
    #[serde(default)]
    thumbnail_medium: Option<String>,
}

impl VimeoVideo {
    fn into_metadata(self, id: String) -> VideoMetadata {
        let thumbnail_url = self
            .thumbnail_large
            .as_deref()
            .map(hd_thumbnail)
            .or(self.thumbnail_medium)
            .unwrap_or_default();

        VideoMetadata {
            id,
            title: self.title,
            thumbnail_url,
        }
    }
}

/// Vimeo metadata client.
#[derive(Clone)]
pub struct VimeoClient {
    inner: Arc<VimeoClientInner>,
}

struct VimeoClientInner {
    client: reqwest::Client,
    api_base: String,
}

impl std::fmt::Debug for VimeoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VimeoClient")
            .field("api_base", &self.inner.api_base)
            .finish_non_exhaustive()
    }
}

impl VimeoClient {
    /// Create a new client against the simple API base URL.
    ///
    /// # Errors
    ///
    /// Returns error if the base is not a valid URL or the HTTP client fails
    /// to build.
    pub fn new(api_base: &str) -> Result<Self, VideoError> {
        url::Url::parse(api_base).map_err(|e| VideoError::Config(format!("{api_base}: {e}")))?;

        Ok(Self {
            inner: Arc::new(VimeoClientInner {
                client: reqwest::Client::builder().build()?,
                api_base: api_base.trim_end_matches('/').to_string(),
            }),
        })
    }

    fn video_url(&self, video_id: &str) -> String {
        format!("{}/video/{video_id}.json", self.inner.api_base)
    }
}

#[async_trait]
impl VideoLookup for VimeoClient {
    #[instrument(skip(self))]
    async fn lookup(&self, reference: &str) -> Result<VideoMetadata, VideoError> {
        let video_id = extract_video_id(reference)
            .ok_or_else(|| VideoError::InvalidReference(reference.to_string()))?;

        let response = self
            .inner
            .client
            .get(self.video_url(&video_id))
            .send()
            .await?;

        let status = response.status();
        match status {
            s if s.is_success() => {}
            StatusCode::NOT_FOUND => return Err(VideoError::NotFound(video_id)),
            StatusCode::FORBIDDEN => return Err(VideoError::PrivacyRestricted(video_id)),
            _ => {
                return Err(VideoError::Api {
                    status: status.as_u16(),
                    message: response.text().await.unwrap_or_default(),
                });
            }
        }

        let videos: Vec<VimeoVideo> = response
            .json()
            .await
            .map_err(|e| VideoError::Parse(format!("Invalid Vimeo response: {e}")))?;

        let video = videos
            .into_iter()
            .next()
            .ok_or_else(|| VideoError::NotFound(video_id.clone()))?;

        debug!(video_id = %video_id, "Vimeo metadata resolved");

        Ok(video.into_metadata(video_id))
    }
}
