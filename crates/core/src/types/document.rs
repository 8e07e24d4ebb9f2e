//! The portfolio document aggregate.
//!
//! A [`Document`] is the whole database: it is loaded in one piece and written
//! back in one piece. The mutation methods here are the only place the
//! document invariants are enforced:
//!
//! - entry ids are unique; a new entry gets `max(id) + 1`, or `1` when empty
//! - at most one entry is featured (the "hero")
//! - entry order is display order and is persisted as-is

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::about::AboutData;
use super::entry::{Entry, EntryDraft};
use super::id::EntryId;
use super::settings::GlobalSettings;

/// Errors raised by document mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// No entry with this id exists.
    #[error("entry {0} not found")]
    EntryNotFound(EntryId),

    /// The largest id in the document has no successor.
    #[error("no entry id left after {0}")]
    IdSpaceExhausted(EntryId),
}

/// The persisted aggregate.
///
/// Wire shape: `{ "projects": [...], "about"?: {...}, "global"?: {...} }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Ordered; index 0 is shown first.
    #[serde(rename = "projects", default)]
    pub entries: Vec<Entry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<AboutData>,
    #[serde(rename = "global", default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<GlobalSettings>,
}

impl Document {
    /// Look up an entry by id.
    #[must_use]
    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// The featured entry, if any.
    #[must_use]
    pub fn hero(&self) -> Option<&Entry> {
        self.entries.iter().find(|e| e.is_featured)
    }

    /// Settings, or the defaults when the document carries none.
    #[must_use]
    pub fn settings_or_default(&self) -> GlobalSettings {
        self.settings.clone().unwrap_or_default()
    }

    /// The id the next added entry will receive.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::IdSpaceExhausted`] if the largest id is
    /// `i64::MAX`.
    pub fn next_id(&self) -> Result<EntryId, DocumentError> {
        match self.entries.iter().map(|e| e.id).max() {
            None => Ok(EntryId::FIRST),
            Some(max) => max.next().ok_or(DocumentError::IdSpaceExhausted(max)),
        }
    }

    /// Add a draft at the front of the list and return the stored entry.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::IdSpaceExhausted`] if no id is left; the
    /// document is unchanged.
    pub fn add_entry(&mut self, draft: EntryDraft) -> Result<Entry, DocumentError> {
        let entry = draft.into_entry(self.next_id()?);
        if entry.is_featured {
            self.clear_featured_except(entry.id);
        }
        self.entries.insert(0, entry.clone());
        Ok(entry)
    }

    /// Replace the entry with the same id, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::EntryNotFound`] if no entry has that id.
    pub fn replace_entry(&mut self, entry: Entry) -> Result<(), DocumentError> {
        let id = entry.id;
        let featured = entry.is_featured;
        let slot = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(DocumentError::EntryNotFound(id))?;
        *slot = entry;
        if featured {
            self.clear_featured_except(id);
        }
        Ok(())
    }

    /// Remove an entry, leaving the order of the others untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::EntryNotFound`] if no entry has that id.
    pub fn remove_entry(&mut self, id: EntryId) -> Result<Entry, DocumentError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(DocumentError::EntryNotFound(id))?;
        Ok(self.entries.remove(index))
    }

    /// Replace the entry sequence wholesale.
    ///
    /// The new sequence is taken as given. Returns whether it was a
    /// permutation of the previous ids so callers can report a malformed
    /// reorder.
    pub fn reorder(&mut self, entries: Vec<Entry>) -> bool {
        let permutation = self.is_permutation(&entries);
        self.entries = entries;
        permutation
    }

    /// Whether `entries` holds exactly the current ids, each once.
    #[must_use]
    pub fn is_permutation(&self, entries: &[Entry]) -> bool {
        if entries.len() != self.entries.len() {
            return false;
        }
        let current: HashSet<EntryId> = self.entries.iter().map(|e| e.id).collect();
        let proposed: HashSet<EntryId> = entries.iter().map(|e| e.id).collect();
        proposed.len() == entries.len() && current == proposed
    }

    /// Number of featured entries. Zero or one for any document built through
    /// these methods.
    #[must_use]
    pub fn featured_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_featured).count()
    }

    fn clear_featured_except(&mut self, keep: EntryId) {
        for entry in self.entries.iter_mut().filter(|e| e.id != keep) {
            entry.is_featured = false;
        }
    }
}
