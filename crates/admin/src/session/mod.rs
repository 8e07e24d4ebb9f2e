//! Session holder.
//!
//! Keeps at most one credential between runs of the admin front end. The
//! holder does not track expiry: a stale credential is discovered when the
//! ownership check fails during session restore, and the store clears it.
//!
//! - [`MemorySessionHolder`] - process-local slot, for tests and embedding
//! - [`FileSessionHolder`] - single file in a session-scoped directory

mod file;
mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::credential::Credential;

pub use file::FileSessionHolder;
pub use memory::MemorySessionHolder;

/// Errors raised by session holders.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the session file failed.
    #[error("Session storage error: {0}")]
    Io(#[from] std::io::Error),

    /// The in-memory slot was poisoned by a panicking writer.
    #[error("Session slot poisoned")]
    Poisoned,
}

/// Port for persisting the operator credential across reloads.
#[async_trait]
pub trait SessionHolder: Send + Sync {
    /// Store the credential, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage cannot be written.
    async fn save(&self, credential: &Credential) -> Result<(), SessionError>;

    /// The stored credential, if any.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage cannot be read.
    async fn load(&self) -> Result<Option<Credential>, SessionError>;

    /// Forget the stored credential. Clearing an empty holder succeeds.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage cannot be modified.
    async fn clear(&self) -> Result<(), SessionError>;
}
