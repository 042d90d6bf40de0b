//! Authentication state shared by the API client and the UI.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Holds the bearer token and user for the current login.
///
/// Cloning shares the same underlying state, so the client and the app
/// always see the same session.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
    path: Option<PathBuf>,
}

impl SessionStore {
    /// A store that never touches disk.
    pub fn in_memory(session: Option<Session>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
            path: None,
        }
    }

    /// Loads a persisted session if one exists. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Self> {
        let session = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read session from {}", path.display()))?;
            let session: Session = toml::from_str(&content)
                .with_context(|| format!("Failed to parse session from {}", path.display()))?;
            debug!(user = %session.user.username, "restored session");
            Some(session)
        } else {
            None
        };
        Ok(Self {
            inner: Arc::new(RwLock::new(session)),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn login(&self, session: Session) -> Result<()> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
            let content =
                toml::to_string_pretty(&session).context("Failed to serialize session")?;
            write_private(path, &content)
                .with_context(|| format!("Failed to write session to {}", path.display()))?;
        }
        info!(user = %session.user.username, "logged in");
        *self.inner.write() = Some(session);
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        if let Some(path) = &self.path
            && path.exists()
        {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove session {}", path.display()))?;
        }
        *self.inner.write() = None;
        info!("logged out");
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.inner.read().as_ref().map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.inner.read().as_ref().map(|s| s.user.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner.read().is_some()
    }
}

/// Writes `content` readable by the owner only, since it holds the token.
#[cfg(unix)]
fn write_private(path: &Path, content: &str) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(content.as_bytes())
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, content)
}
