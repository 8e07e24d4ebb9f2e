//! Gist API wire types.
//!
//! Only the fields this crate reads are modelled; everything else in the
//! GitHub payload is ignored.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET /gists/{id}` and `PATCH /gists/{id}` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct GistResponse {
    #[serde(default)]
    pub files: HashMap<String, GistFile>,
    /// Absent for anonymous gists.
    pub owner: Option<GistOwner>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub history: Vec<GistHistoryEntry>,
}

/// One file inside a gist.
#[derive(Debug, Clone, Deserialize)]
pub struct GistFile {
    pub filename: Option<String>,
    /// Missing or cut short when the file exceeds the API's inline limit.
    pub content: Option<String>,
    #[serde(default)]
    pub truncated: bool,
    pub raw_url: Option<String>,
}

/// Gist owner, compared against the token's user.
#[derive(Debug, Clone, Deserialize)]
pub struct GistOwner {
    pub id: u64,
    pub login: Option<String>,
}

/// `GET /user` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub id: u64,
    pub login: Option<String>,
}

/// One revision in the gist history, newest first.
#[derive(Debug, Clone, Deserialize)]
pub struct GistHistoryEntry {
    pub version: String,
}

/// `PATCH /gists/{id}` request body.
#[derive(Debug, Serialize)]
pub struct UpdateGistRequest<'a> {
    pub files: BTreeMap<&'a str, UpdateGistFile>,
}

/// Replacement content for one file.
#[derive(Debug, Serialize)]
pub struct UpdateGistFile {
    pub content: String,
}

impl<'a> UpdateGistRequest<'a> {
    /// Request that overwrites a single file.
    #[must_use]
    pub fn single(file_name: &'a str, content: String) -> Self {
        let mut files = BTreeMap::new();
        files.insert(file_name, UpdateGistFile { content });
        Self { files }
    }
}
