//! The admin store.
//!
//! Holds the in-memory document while an operator is logged in and owns the
//! login/restore/save/logout lifecycle. Entry mutations live in `entries`.
//!
//! # State machine
//!
//! ```text
//! Anonymous --login / restore_session--> Authenticated --logout--> Anonymous
//! ```
//!
//! A failed login or restore always ends in `Anonymous` with an empty
//! document. A failed save keeps both the authentication and the local edits.
//!
//! # Stale responses
//!
//! State is never locked across a network call. Every login attempt and every
//! logout bumps a generation counter; a login response that comes back after
//! the generation moved on is dropped with [`AdminError::Superseded`].
//!
//! The stored session is only written or cleared while the state write lock
//! is held, so it always agrees with the generation that wrote it.

mod entries;

#[cfg(test)]
mod fakes;

use std::sync::Arc;

use showreel_core::{Document, Entry, EntryId, VideoMetadata};
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use crate::credential::Credential;
use crate::error::AdminError;
use crate::gist::{DocumentStore, PersistAck};
use crate::session::SessionHolder;
use crate::video::{LatestRequest, VideoLookup};

const SAVE_FAILED: &str = "Failed to save changes";
const VIDEO_NOT_FOUND: &str = "Video not found";

/// Authentication state of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated,
}

impl std::fmt::Display for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => write!(f, "anonymous"),
            Self::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// Outcome of the confirmation prompt for a destructive action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }
}

/// Admin store handle. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct AdminStore {
    inner: Arc<AdminStoreInner>,
}

struct AdminStoreInner {
    documents: Arc<dyn DocumentStore>,
    session: Arc<dyn SessionHolder>,
    videos: Arc<dyn VideoLookup>,
    state: RwLock<StoreState>,
    video_requests: LatestRequest,
}

/// Everything that changes between operations.
///
/// `credential.is_some()` is the authenticated flag; there is no separate
/// boolean that could drift from it.
#[derive(Default)]
struct StoreState {
    credential: Option<Credential>,
    document: Document,
    generation: u64,
    last_error: Option<String>,
}

impl StoreState {
    const fn auth_state(&self) -> AuthState {
        if self.credential.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        }
    }

    fn reset(&mut self) {
        self.credential = None;
        self.document = Document::default();
    }

    fn require_auth(&self) -> Result<(), AdminError> {
        match self.auth_state() {
            AuthState::Authenticated => Ok(()),
            AuthState::Anonymous => Err(AdminError::NotAuthenticated),
        }
    }
}

impl std::fmt::Debug for AdminStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminStore").finish_non_exhaustive()
    }
}

impl AdminStore {
    /// Create an anonymous store over the given collaborators.
    #[must_use]
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        session: Arc<dyn SessionHolder>,
        videos: Arc<dyn VideoLookup>,
    ) -> Self {
        Self {
            inner: Arc::new(AdminStoreInner {
                documents,
                session,
                videos,
                state: RwLock::new(StoreState::default()),
                video_requests: LatestRequest::new(),
            }),
        }
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    pub async fn auth_state(&self) -> AuthState {
        self.inner.state.read().await.auth_state()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.auth_state().await == AuthState::Authenticated
    }

    /// Snapshot of the whole document.
    pub async fn document(&self) -> Document {
        self.inner.state.read().await.document.clone()
    }

    /// Entries in display order.
    pub async fn entries(&self) -> Vec<Entry> {
        self.inner.state.read().await.document.entries.clone()
    }

    pub async fn entry(&self, id: EntryId) -> Option<Entry> {
        self.inner.state.read().await.document.entry(id).cloned()
    }

    /// The featured entry, if any.
    pub async fn hero(&self) -> Option<Entry> {
        self.inner.state.read().await.document.hero().cloned()
    }

    /// Banner text of the most recent failure, cleared by the next successful
    /// login or save.
    pub async fn last_error(&self) -> Option<String> {
        self.inner.state.read().await.last_error.clone()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Verify `credential`, load the document and become authenticated.
    ///
    /// # Errors
    ///
    /// - [`AdminError::PermissionDenied`] if the token does not own the gist
    /// - [`AdminError::Superseded`] if a logout or newer login happened while
    ///   this one was in flight
    /// - any document store failure mapped through [`AdminError`]
    ///
    /// Every error except `Superseded` leaves the store anonymous with an
    /// empty document and no stored session.
    #[instrument(skip(self, credential))]
    pub async fn login(&self, credential: Credential) -> Result<(), AdminError> {
        let generation = self.begin_login().await;

        if credential.is_blank() {
            return Err(self
                .fail_login(generation, AdminError::Unauthorized("empty token".to_string()))
                .await);
        }

        match self.inner.documents.verify_permission(&credential).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(self.fail_login(generation, AdminError::PermissionDenied).await);
            }
            Err(e) => return Err(self.fail_login(generation, e.into()).await),
        }

        let document = match self
            .inner
            .documents
            .fetch_document(Some(&credential))
            .await
        {
            Ok(document) => document,
            Err(e) => return Err(self.fail_login(generation, e.into()).await),
        };

        let entries = document.entries.len();
        {
            let mut state = self.inner.state.write().await;
            if state.generation != generation {
                debug!("Login response arrived after a newer operation, discarding");
                return Err(AdminError::Superseded);
            }
            if let Err(e) = self.inner.session.save(&credential).await {
                warn!(error = %e, "Logged in, but the session could not be stored");
            }
            state.credential = Some(credential);
            state.document = document;
            state.last_error = None;
        }

        info!(entries, "Operator logged in");
        Ok(())
    }

    /// Log in with the stored credential, if there is one.
    ///
    /// Returns `Ok(false)` when no credential is stored. A stored credential
    /// that fails verification is cleared so it is not retried.
    ///
    /// # Errors
    ///
    /// Same as [`login`](Self::login), plus [`AdminError::Session`] if the
    /// holder cannot be read.
    #[instrument(skip(self))]
    pub async fn restore_session(&self) -> Result<bool, AdminError> {
        let Some(credential) = self.inner.session.load().await? else {
            debug!("No stored session");
            return Ok(false);
        };

        if credential.is_blank() {
            self.inner.session.clear().await?;
            return Ok(false);
        }

        self.login(credential).await.inspect_err(|e| {
            warn!(error = %e, "Stored session is no longer valid");
        })?;

        Ok(true)
    }

    /// Forget the credential and the document.
    ///
    /// The in-memory state is always reset; any login still in flight is
    /// invalidated.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Session`] if the stored session cannot be
    /// removed.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), AdminError> {
        {
            let mut state = self.inner.state.write().await;
            state.generation = state.generation.wrapping_add(1);
            state.reset();
            state.last_error = None;
            self.inner.session.clear().await?;
        }

        info!("Operator logged out");
        Ok(())
    }

    /// Read the published document anonymously.
    ///
    /// Used by the public site; does not touch the store state.
    ///
    /// # Errors
    ///
    /// Returns the mapped document store failure.
    #[instrument(skip(self))]
    pub async fn load_public(&self) -> Result<Document, AdminError> {
        let document = self.inner.documents.fetch_document(None).await?;
        debug!(entries = document.entries.len(), "Public document loaded");
        Ok(document)
    }

    /// Write the whole in-memory document back to the gist.
    ///
    /// Local state is never rolled back: after a failure the edits are still
    /// there and `save` can be retried without logging in again.
    ///
    /// # Errors
    ///
    /// [`AdminError::NotAuthenticated`] while anonymous, otherwise the mapped
    /// document store failure.
    #[instrument(skip(self))]
    pub async fn save(&self) -> Result<PersistAck, AdminError> {
        let (credential, document, generation) = {
            let state = self.inner.state.read().await;
            let Some(credential) = state.credential.clone() else {
                return Err(AdminError::NotAuthenticated);
            };
            (credential, state.document.clone(), state.generation)
        };

        match self
            .inner
            .documents
            .persist_document(Some(&credential), &document)
            .await
        {
            Ok(ack) => {
                self.set_error(generation, None).await;
                info!(entries = document.entries.len(), "Document saved");
                Ok(ack)
            }
            Err(e) => {
                let err = AdminError::from(e);
                error!(error = %err, "Failed to save document");
                self.set_error(generation, Some(SAVE_FAILED.to_string()))
                    .await;
                Err(err)
            }
        }
    }

    /// Resolve a video reference for the entry form.
    ///
    /// Does not read or change the document. Only the most recent lookup may
    /// report a result; older ones return [`AdminError::Superseded`].
    ///
    /// # Errors
    ///
    /// [`AdminError::NotFound`] / [`AdminError::PrivacyRestricted`] for
    /// missing or private videos, [`AdminError::Transport`] for provider
    /// failures.
    #[instrument(skip(self))]
    pub async fn fetch_video_metadata(&self, reference: &str) -> Result<VideoMetadata, AdminError> {
        let ticket = self.inner.video_requests.begin();
        let result = self.inner.videos.lookup(reference).await;

        if !self.inner.video_requests.is_latest(ticket) {
            debug!("Video lookup overtaken by a newer one, discarding");
            return Err(AdminError::Superseded);
        }

        match result {
            Ok(metadata) => Ok(metadata),
            Err(e) => {
                let err = AdminError::from(e);
                warn!(error = %err, "Video lookup failed");
                let message = if err.is_lookup_miss() {
                    VIDEO_NOT_FOUND
                } else {
                    err.user_message()
                };
                self.inner.state.write().await.last_error = Some(message.to_string());
                Err(err)
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Start a login attempt, invalidating any other attempt in flight.
    async fn begin_login(&self) -> u64 {
        let mut state = self.inner.state.write().await;
        state.generation = state.generation.wrapping_add(1);
        state.last_error = None;
        state.generation
    }

    /// Reset to anonymous after a failed login, unless the attempt is stale.
    async fn fail_login(&self, generation: u64, err: AdminError) -> AdminError {
        {
            let mut state = self.inner.state.write().await;
            if state.generation != generation {
                return AdminError::Superseded;
            }
            state.reset();
            state.last_error = Some(err.user_message().to_string());
            if let Err(e) = self.inner.session.clear().await {
                warn!(error = %e, "Could not clear stored session after failed login");
            }
        }

        warn!(error = %err, "Login failed");
        err
    }

    /// Record (or clear) the banner, unless a logout or login happened since
    /// `generation` was read.
    async fn set_error(&self, generation: u64, message: Option<String>) {
        let mut state = self.inner.state.write().await;
        if state.generation == generation {
            state.last_error = message;
        }
    }
}
