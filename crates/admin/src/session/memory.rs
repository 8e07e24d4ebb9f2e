//! In-memory session holder.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{SessionError, SessionHolder};
use crate::credential::Credential;

/// Session holder that lives as long as the process.
#[derive(Default)]
pub struct MemorySessionHolder {
    slot: Mutex<Option<Credential>>,
}

impl MemorySessionHolder {
    /// Create an empty holder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a holder that already carries a credential.
    #[must_use]
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
        }
    }
}

impl std::fmt::Debug for MemorySessionHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySessionHolder").finish_non_exhaustive()
    }
}

#[async_trait]
impl SessionHolder for MemorySessionHolder {
    async fn save(&self, credential: &Credential) -> Result<(), SessionError> {
        let mut slot = self.slot.lock().map_err(|_| SessionError::Poisoned)?;
        *slot = Some(credential.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<Credential>, SessionError> {
        let slot = self.slot.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(slot.clone())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        let mut slot = self.slot.lock().map_err(|_| SessionError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}
