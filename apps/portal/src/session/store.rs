//! Persistent Session Store: the token and cached identity, surviving restarts.
//!
//! Both values live in one JSON document so a single rename replaces them together.
//! No expiry is tracked here; the backend is the only judge of a token's validity.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::ClientError;
use crate::session::Identity;

/// Key-value storage for the two session keys.
/// Implementations must make `clear` remove both keys before returning.
pub trait SessionStore: Send + Sync {
    fn get_token(&self) -> Result<Option<String>, ClientError>;
    fn set_token(&self, token: &str) -> Result<(), ClientError>;
    fn get_user(&self) -> Result<Option<Identity>, ClientError>;
    fn set_user(&self, identity: &Identity) -> Result<(), ClientError>;
    /// Removes token and identity. Returns `false` when there was nothing to remove.
    fn clear(&self) -> Result<bool, ClientError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<Identity>,
}

impl StoredSession {
    fn is_empty(&self) -> bool {
        self.token.is_none() && self.user.is_none()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// File-backed store
// ────────────────────────────────────────────────────────────────────────────

/// Stores the session as `{"token": .., "user": ..}` in a single file.
pub struct FileSessionStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read(&self) -> Result<StoredSession, ClientError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoredSession::default()),
            Err(e) => return Err(ClientError::Storage(e)),
        };

        match serde_json::from_str(&raw) {
            Ok(stored) => Ok(stored),
            Err(e) => {
                warn!(
                    "Ignoring unreadable session file {}: {e}",
                    self.path.display()
                );
                Ok(StoredSession::default())
            }
        }
    }

    fn write(&self, stored: &StoredSession) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = open_private(&tmp)?;
            file.write_all(&serde_json::to_vec_pretty(stored)?)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;

        debug!("Session file written to {}", self.path.display());
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut StoredSession)) -> Result<(), ClientError> {
        let _guard = self.lock.lock();
        let mut stored = self.read()?;
        apply(&mut stored);
        self.write(&stored)
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::File::create(path)
}

impl SessionStore for FileSessionStore {
    fn get_token(&self) -> Result<Option<String>, ClientError> {
        let _guard = self.lock.lock();
        Ok(self.read()?.token)
    }

    fn set_token(&self, token: &str) -> Result<(), ClientError> {
        self.update(|s| s.token = Some(token.to_string()))
    }

    fn get_user(&self) -> Result<Option<Identity>, ClientError> {
        let _guard = self.lock.lock();
        Ok(self.read()?.user)
    }

    fn set_user(&self, identity: &Identity) -> Result<(), ClientError> {
        self.update(|s| s.user = Some(identity.clone()))
    }

    fn clear(&self) -> Result<bool, ClientError> {
        let _guard = self.lock.lock();
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Session file {} removed", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ClientError::Storage(e)),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory store
// ────────────────────────────────────────────────────────────────────────────

/// Process-local store. Used by tests and by `--ephemeral` runs.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<StoredSession>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store, as if a previous run had logged in.
    #[cfg(test)]
    pub fn with_session(token: &str, identity: Identity) -> Self {
        Self {
            inner: Mutex::new(StoredSession {
                token: Some(token.to_string()),
                user: Some(identity),
            }),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get_token(&self) -> Result<Option<String>, ClientError> {
        Ok(self.inner.lock().token.clone())
    }

    fn set_token(&self, token: &str) -> Result<(), ClientError> {
        self.inner.lock().token = Some(token.to_string());
        Ok(())
    }

    fn get_user(&self) -> Result<Option<Identity>, ClientError> {
        Ok(self.inner.lock().user.clone())
    }

    fn set_user(&self, identity: &Identity) -> Result<(), ClientError> {
        self.inner.lock().user = Some(identity.clone());
        Ok(())
    }

    fn clear(&self) -> Result<bool, ClientError> {
        let mut inner = self.inner.lock();
        let had_session = !inner.is_empty();
        *inner = StoredSession::default();
        Ok(had_session)
    }
}
