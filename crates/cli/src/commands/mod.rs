//! Command implementations.
//!
//! Every command builds the same [`Context`]: a store wired to the real gist
//! client, the file session holder and the video providers.

pub mod content;
pub mod entries;
pub mod session;
pub mod video;

use std::sync::Arc;

use secrecy::SecretString;
use showreel_admin::config::{AdminConfig, ConfigError};
use showreel_admin::gist::{GistClient, GistError, PersistAck};
use showreel_admin::session::FileSessionHolder;
use showreel_admin::video::{ProviderRouter, VideoError};
use showreel_admin::{AdminError, AdminStore};
use showreel_core::EntryId;
use thiserror::Error;

/// Errors surfaced to the operator.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Gist(#[from] GistError),

    #[error("{0}")]
    Video(#[from] VideoError),

    /// Store failures carry the banner text plus the detail.
    #[error("{}: {}", .0.user_message(), .0)]
    Admin(#[from] AdminError),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Failed to render output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not logged in, run `showreel login` first")]
    NotLoggedIn,

    #[error("No entry with id {0}")]
    UnknownEntry(EntryId),

    #[error("Reorder must list every entry id exactly once ({expected} entries)")]
    NotAPermutation { expected: usize },

    #[error("Nothing to change, pass at least one field")]
    NothingToChange,
}

/// Shared command context.
pub struct Context {
    pub store: AdminStore,
    /// Token from `SHOWREEL_TOKEN`, used by `login` when none is passed.
    pub env_token: Option<SecretString>,
}

impl Context {
    /// Wire the store from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client fails to build or a provider endpoint
    /// is invalid.
    pub fn new(config: AdminConfig) -> Result<Self, CliError> {
        let documents = GistClient::new(&config.gist)?;
        let session = FileSessionHolder::new(config.session_file);
        let videos = ProviderRouter::new(&config.video)?.shared();

        tracing::debug!(
            gist_id = documents.gist_id(),
            session_file = %session.path().display(),
            "Store wired"
        );

        Ok(Self {
            store: AdminStore::new(Arc::new(documents), Arc::new(session), videos),
            env_token: config.token,
        })
    }

    /// Restore the stored session, failing when there is none.
    ///
    /// # Errors
    ///
    /// [`CliError::NotLoggedIn`] when no credential is stored; the store
    /// error when the stored one no longer works.
    pub async fn authenticated(&self) -> Result<&AdminStore, CliError> {
        if self.store.restore_session().await? {
            Ok(&self.store)
        } else {
            Err(CliError::NotLoggedIn)
        }
    }

    /// Save the document and report the new revision.
    ///
    /// # Errors
    ///
    /// Returns the store error.
    pub async fn save(&self) -> Result<(), CliError> {
        let PersistAck {
            updated_at,
            version,
        } = self.store.save().await?;
        match (version, updated_at) {
            (Some(version), Some(at)) => println!("Saved revision {version} at {at}"),
            (Some(version), None) => println!("Saved revision {version}"),
            _ => println!("Saved"),
        }
        Ok(())
    }
}
