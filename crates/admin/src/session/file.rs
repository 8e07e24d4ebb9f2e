//! File-backed session holder.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{SessionError, SessionHolder};
use crate::credential::Credential;

/// Session holder that keeps the credential in a single file.
///
/// Point it at a session-scoped directory (such as `$XDG_RUNTIME_DIR`) so the
/// credential survives reruns but not a new login session. On Unix the file is
/// created readable by the owner only.
#[derive(Debug, Clone)]
pub struct FileSessionHolder {
    path: PathBuf,
}

impl FileSessionHolder {
    /// Create a holder for the given file path. Nothing is touched until the
    /// first `save`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionHolder for FileSessionHolder {
    async fn save(&self, credential: &Credential) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&self.path).await?;
        file.write_all(credential.expose().as_bytes()).await?;
        file.sync_all().await?;

        debug!(path = %self.path.display(), "Session credential stored");
        Ok(())
    }

    async fn load(&self) -> Result<Option<Credential>, SessionError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let credential = Credential::new(&contents);
                Ok((!credential.is_blank()).then_some(credential))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Session credential cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let holder = FileSessionHolder::new(dir.path().join("session"));

        assert!(holder.load().await.expect("load").is_none());
        holder.clear().await.expect("clearing a missing file succeeds");
    }

    #[tokio::test]
    async fn test_save_creates_parent_and_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let holder = FileSessionHolder::new(dir.path().join("showreel").join("session"));

        holder.save(&Credential::new("ghp_abc123")).await.expect("save");
        let loaded = holder.load().await.expect("load").expect("credential stored");
        assert_eq!(loaded.expose(), "ghp_abc123");

        holder.clear().await.expect("clear");
        assert!(holder.load().await.expect("load").is_none());
        assert!(!holder.path().exists());
    }

    #[tokio::test]
    async fn test_blank_file_loads_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session");
        std::fs::write(&path, "  \n").expect("write");

        let holder = FileSessionHolder::new(path);
        assert!(holder.load().await.expect("load").is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let holder = FileSessionHolder::new(dir.path().join("session"));
        holder.save(&Credential::new("ghp_abc123")).await.expect("save");

        let mode = std::fs::metadata(holder.path()).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
