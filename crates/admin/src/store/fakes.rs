//! Hand-written fakes for the store's collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use showreel_core::{Document, EntryDraft, EntryId, VideoMetadata};
use tokio::sync::Notify;

use crate::credential::Credential;
use crate::gist::{DocumentStore, GistError, PersistAck};
use crate::session::{MemorySessionHolder, SessionError, SessionHolder};
use crate::video::{VideoError, VideoLookup};

/// Holds a fake call open until the test releases it.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

impl Gate {
    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

fn server_error() -> GistError {
    GistError::Status {
        status: 500,
        message: "boom".to_string(),
    }
}

pub struct FakeDocuments {
    owner_id: u64,
    user_id: AtomicU64,
    document: Mutex<Document>,
    fetch_fails: AtomicBool,
    persist_fails: AtomicBool,
    persisted: Mutex<Vec<Document>>,
    verify_calls: AtomicUsize,
    anonymous_fetches: AtomicUsize,
    verify_gate: Mutex<Option<Arc<Gate>>>,
}

impl FakeDocuments {
    /// A gist owned by `owner_id`, queried with a token belonging to the owner.
    pub fn owned_by(owner_id: u64) -> Self {
        Self {
            owner_id,
            user_id: AtomicU64::new(owner_id),
            document: Mutex::new(Document::default()),
            fetch_fails: AtomicBool::new(false),
            persist_fails: AtomicBool::new(false),
            persisted: Mutex::new(Vec::new()),
            verify_calls: AtomicUsize::new(0),
            anonymous_fetches: AtomicUsize::new(0),
            verify_gate: Mutex::new(None),
        }
    }

    pub fn with_user(self, user_id: u64) -> Self {
        self.set_user(user_id);
        self
    }

    /// Unfeatured entries with the given ids, in order.
    pub fn with_entries(self, ids: &[i64]) -> Self {
        let entries = ids
            .iter()
            .map(|&id| EntryDraft::titled(format!("Entry {id}")).into_entry(EntryId::new(id)))
            .collect();
        self.with_document(Document {
            entries,
            ..Document::default()
        })
    }

    pub fn with_document(self, document: Document) -> Self {
        *self.document.lock().expect("lock") = document;
        self
    }

    pub fn set_user(&self, user_id: u64) {
        self.user_id.store(user_id, Ordering::SeqCst);
    }

    pub fn fail_fetch(&self) {
        self.fetch_fails.store(true, Ordering::SeqCst);
    }

    pub fn fail_persist(&self) {
        self.persist_fails.store(true, Ordering::SeqCst);
    }

    pub fn recover_persist(&self) {
        self.persist_fails.store(false, Ordering::SeqCst);
    }

    /// Make the next ownership checks wait on the returned gate.
    pub fn gate_verify(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.verify_gate.lock().expect("lock") = Some(Arc::clone(&gate));
        gate
    }

    pub fn persisted(&self) -> Vec<Document> {
        self.persisted.lock().expect("lock").clone()
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn anonymous_fetches(&self) -> usize {
        self.anonymous_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for FakeDocuments {
    async fn verify_permission(&self, _credential: &Credential) -> Result<bool, GistError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.verify_gate.lock().expect("lock").clone();
        if let Some(gate) = gate {
            gate.pass().await;
        }

        Ok(self.user_id.load(Ordering::SeqCst) == self.owner_id)
    }

    async fn fetch_document(&self, credential: Option<&Credential>) -> Result<Document, GistError> {
        if self.fetch_fails.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        if credential.is_none() {
            self.anonymous_fetches.fetch_add(1, Ordering::SeqCst);
        }
        Ok(self.document.lock().expect("lock").clone())
    }

    async fn persist_document(
        &self,
        credential: Option<&Credential>,
        document: &Document,
    ) -> Result<PersistAck, GistError> {
        if credential.is_none() {
            return Err(GistError::Unauthorized);
        }
        if self.persist_fails.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        *self.document.lock().expect("lock") = document.clone();
        self.persisted.lock().expect("lock").push(document.clone());
        Ok(PersistAck::default())
    }
}

/// Resolves any reference containing a known video id.
#[derive(Default)]
pub struct FakeVideos {
    videos: HashMap<String, String>,
    gates: Mutex<HashMap<String, Arc<Gate>>>,
}

impl FakeVideos {
    pub fn with_video(mut self, id: &str, title: &str) -> Self {
        self.videos.insert(id.to_string(), title.to_string());
        self
    }

    /// Make lookups of `id` wait on the returned gate.
    pub fn gate(&self, id: &str) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        self.gates
            .lock()
            .expect("lock")
            .insert(id.to_string(), Arc::clone(&gate));
        gate
    }
}

#[async_trait]
impl VideoLookup for FakeVideos {
    async fn lookup(&self, reference: &str) -> Result<VideoMetadata, VideoError> {
        let Some((id, title)) = self
            .videos
            .iter()
            .find(|(id, _)| reference.contains(id.as_str()))
        else {
            return Err(VideoError::NotFound(reference.to_string()));
        };

        let gate = self.gates.lock().expect("lock").get(id).cloned();
        if let Some(gate) = gate {
            gate.pass().await;
        }

        Ok(VideoMetadata {
            id: id.clone(),
            title: title.clone(),
            thumbnail_url: format!("https://img.youtube.com/vi/{id}/hqdefault.jpg"),
        })
    }
}

/// Memory session whose next `save` waits on a gate.
#[derive(Default)]
pub struct GatedSession {
    inner: MemorySessionHolder,
    save_gate: Mutex<Option<Arc<Gate>>>,
}

impl GatedSession {
    pub fn gate_save(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.save_gate.lock().expect("lock") = Some(Arc::clone(&gate));
        gate
    }
}

#[async_trait]
impl SessionHolder for GatedSession {
    async fn save(&self, credential: &Credential) -> Result<(), SessionError> {
        let gate = self.save_gate.lock().expect("lock").take();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        self.inner.save(credential).await
    }

    async fn load(&self) -> Result<Option<Credential>, SessionError> {
        self.inner.load().await
    }

    async fn clear(&self) -> Result<(), SessionError> {
        self.inner.clear().await
    }
}
