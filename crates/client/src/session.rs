//! Login session and its on-disk store.
//!
//! A [`Session`] is handed to every page model explicitly. Only the CLI
//! touches [`SessionStore`], once at startup and once after login/logout.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use meteor_shop_core::{AuthToken, CustomerId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bearer token plus the customer it authenticates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: AuthToken,
    pub customer_id: CustomerId,
}

impl Session {
    #[must_use]
    pub const fn new(token: AuthToken, customer_id: CustomerId) -> Self {
        Self { token, customer_id }
    }
}

/// Errors reading or writing the session file.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Session file error ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file is corrupt ({path}): {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// JSON file holding the current [`Session`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session; `None` when nobody is logged in.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| SessionStoreError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Persist a session, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        let json = serde_json::to_string_pretty(session).map_err(|source| {
            SessionStoreError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, json).map_err(|source| self.io_error(source))
    }

    /// Forget the stored session. Succeeds if there was none.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), SessionStoreError> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(self.io_error(e)),
            _ => Ok(()),
        }
    }

    fn io_error(&self, source: std::io::Error) -> SessionStoreError {
        SessionStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
