//! Core types for Showreel.
//!
//! This module provides the persisted document shape and its parts.

pub mod about;
pub mod document;
pub mod entry;
pub mod id;
pub mod settings;
pub mod video;

pub use about::AboutData;
pub use document::{Document, DocumentError};
pub use entry::{Entry, EntryDraft};
pub use id::*;
pub use settings::{AccentMode, DEFAULT_ACCENT_COLOR, GlobalSettings};
pub use video::VideoMetadata;
