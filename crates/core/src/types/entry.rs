//! Portfolio entries.

use serde::{Deserialize, Serialize};

use super::id::EntryId;

/// One portfolio item.
///
/// Serialized with the camelCase keys the site reads (`thumbnailUrl`,
/// `isFeatured`). The video reference is stored under `youtubeId`; documents
/// written by older admin builds used `vimeoId`, which is still accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Unique within the document.
    pub id: EntryId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// Provider-specific video id.
    #[serde(rename = "youtubeId", alias = "vimeoId", default)]
    pub video_id: String,
    #[serde(default)]
    pub thumbnail_url: String,
    /// Marks the hero entry. At most one entry in a document carries it.
    #[serde(default)]
    pub is_featured: bool,
}

/// An entry that has not been assigned an id yet.
///
/// The document assigns the id when the draft is added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "youtubeId", alias = "vimeoId", default)]
    pub video_id: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub is_featured: bool,
}

impl EntryDraft {
    /// Draft with only a title set.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Attach an id, producing a full entry.
    #[must_use]
    pub fn into_entry(self, id: EntryId) -> Entry {
        Entry {
            id,
            title: self.title,
            client: self.client,
            description: self.description,
            category: self.category,
            video_id: self.video_id,
            thumbnail_url: self.thumbnail_url,
            is_featured: self.is_featured,
        }
    }
}

impl From<Entry> for EntryDraft {
    fn from(entry: Entry) -> Self {
        Self {
            title: entry.title,
            client: entry.client,
            description: entry.description,
            category: entry.category,
            video_id: entry.video_id,
            thumbnail_url: entry.thumbnail_url,
            is_featured: entry.is_featured,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_uses_site_field_names() {
        let entry = EntryDraft {
            title: "Night Drive".to_string(),
            video_id: "dQw4w9WgXcQ".to_string(),
            thumbnail_url: "https://img.example/1.jpg".to_string(),
            is_featured: true,
            ..EntryDraft::default()
        }
        .into_entry(EntryId::new(1));

        let value = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(value["id"], 1);
        assert_eq!(value["youtubeId"], "dQw4w9WgXcQ");
        assert_eq!(value["thumbnailUrl"], "https://img.example/1.jpg");
        assert_eq!(value["isFeatured"], true);
    }

    #[test]
    fn test_entry_accepts_legacy_vimeo_key_and_missing_fields() {
        let json = r#"{ "id": 9, "title": "Old", "vimeoId": "76979871" }"#;
        let entry: Entry = serde_json::from_str(json).expect("deserialize");

        assert_eq!(entry.id, EntryId::new(9));
        assert_eq!(entry.video_id, "76979871");
        assert!(entry.client.is_empty());
        assert!(!entry.is_featured);
    }

    #[test]
    fn test_entry_without_id_is_rejected() {
        let result: Result<Entry, _> = serde_json::from_str(r#"{ "title": "No id" }"#);
        assert!(result.is_err());
    }
}
