//! Remote document store backed by a GitHub gist.
//!
//! This module provides:
//! - [`DocumentStore`], the port the admin store talks to
//! - [`GistClient`], the `reqwest` implementation against the gist API
//! - Wire types for the gist payloads
//!
//! # Protocol
//!
//! - `GET /gists/{id}` returns the gist with its files; the document is the
//!   JSON content of one named file
//! - `PATCH /gists/{id}` with `{ "files": { name: { "content": json } } }`
//!   overwrites that file
//! - `GET /user` resolves the token's owner, compared with the gist owner to
//!   decide whether the token may write
//!
//! The credential is passed into every call. `None` means an anonymous read
//! (public gists only) and makes writes fail with
//! [`GistError::Unauthorized`].

mod client;
mod error;
pub mod types;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use showreel_core::Document;

use crate::credential::Credential;

pub use client::GistClient;
pub use error::GistError;

/// Acknowledgement of a successful write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistAck {
    /// When the gist was last updated, as reported by the API.
    pub updated_at: Option<DateTime<Utc>>,
    /// Revision id of the write, when the API reported one.
    pub version: Option<String>,
}

/// Port for reading and writing the single portfolio document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Check that the credential's principal owns the document.
    ///
    /// Returns `Ok(false)` for any API-level failure (bad token, missing
    /// gist, unparsable body).
    ///
    /// # Errors
    ///
    /// Only connection-level faults are returned as errors.
    async fn verify_permission(&self, credential: &Credential) -> Result<bool, GistError>;

    /// Load the document. Anonymous when `credential` is `None`.
    ///
    /// # Errors
    ///
    /// [`GistError::DocumentNotFound`] when the file is missing from the gist;
    /// transport, status or parse errors otherwise.
    async fn fetch_document(&self, credential: Option<&Credential>)
    -> Result<Document, GistError>;

    /// Overwrite the document with `document`, in full.
    ///
    /// # Errors
    ///
    /// [`GistError::Unauthorized`] when `credential` is `None`; transport or
    /// status errors otherwise.
    async fn persist_document(
        &self,
        credential: Option<&Credential>,
        document: &Document,
    ) -> Result<PersistAck, GistError>;
}
