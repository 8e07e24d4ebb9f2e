//! The "about" singleton.

use serde::{Deserialize, Serialize};

/// Free-form profile text shown on the about page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutData {
    pub title: String,
    pub description: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub email: String,
    pub instagram: String,
    /// Channel link.
    pub youtube: String,
}
