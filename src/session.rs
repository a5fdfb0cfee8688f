//! Operator session: one opaque bearer credential.
//!
//! The token is obtained once at login and presented on every authenticated
//! request. It is threaded through transport calls as an explicit [`Session`]
//! value — never read from ambient global state — so tests can inject one and
//! multiple sessions could coexist.
//!
//! Key properties:
//! - Absence of a token is a valid state (the backend rejects the call)
//! - No expiry or refresh logic; the store only persists and clears
//! - Persistence survives process restarts via a JSON file in the app dir

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::config;

// ═══════════════════════════════════════════════════════════
// Session — one bearer token
// ═══════════════════════════════════════════════════════════

/// A single authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    access_token: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    /// The raw token, as sent in `Authorization: Bearer <token>`.
    pub fn bearer(&self) -> &str {
        &self.access_token
    }
}

// ═══════════════════════════════════════════════════════════
// SessionStore — persisted credential
// ═══════════════════════════════════════════════════════════

/// Persists the operator session under a well-known file so it survives
/// restarts, mirroring the browser-local storage the console replaces.
pub struct SessionStore {
    path: PathBuf,
    current: Mutex<Option<Session>>,
}

/// Errors from session persistence.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session file I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Session file encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl SessionStore {
    /// Open a store backed by `path`, loading any persisted session.
    ///
    /// A missing file means no session; a malformed file is logged and
    /// treated the same way rather than blocking startup.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = load_session(&path);
        Self {
            path,
            current: Mutex::new(current),
        }
    }

    /// Open the store at the default per-user location.
    pub fn at_default_location() -> Self {
        Self::open(config::session_file())
    }

    /// The session currently held, if any.
    pub fn current(&self) -> Option<Session> {
        self.current.lock().ok()?.clone()
    }

    /// Whether a token is present. Gate for the dashboard route.
    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    /// Persist a new session, replacing any previous one.
    pub fn save(&self, session: Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let encoded = serde_json::to_string_pretty(&session)?;
        fs::write(&self.path, encoded)?;
        if let Ok(mut current) = self.current.lock() {
            *current = Some(session);
        }
        tracing::info!("Session saved");
        Ok(())
    }

    /// Drop the session from memory and disk.
    pub fn clear(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
        tracing::info!("Session cleared");
        Ok(())
    }
}

fn load_session(path: &Path) -> Option<Session> {
    let raw = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed session file");
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
