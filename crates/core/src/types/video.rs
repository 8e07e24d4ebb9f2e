//! Normalized video metadata.

use serde::{Deserialize, Serialize};

/// What a video provider lookup returns, independent of the provider.
///
/// Used to pre-fill an entry form before the entry is added or updated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    /// Canonical provider id.
    pub id: String,
    /// May be empty when the provider did not report one.
    pub title: String,
    pub thumbnail_url: String,
}
