// SPDX-License-Identifier: MPL-2.0
//! Persistent session tokens.
//!
//! The service issues an access/refresh token pair on login. Storage sits
//! behind the [`SessionStore`] trait so the HTTP client never touches global
//! state directly and tests can substitute an in-memory store.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const SESSION_FILE: &str = "session.toml";

/// Access/refresh token pair as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Storage seam for the session token pair.
pub trait SessionStore: Send + Sync {
    /// Current access token, if a session exists.
    fn access(&self) -> Option<String>;

    /// Current refresh token, if a session exists.
    fn refresh(&self) -> Option<String>;

    /// Replaces the stored session.
    fn store(&self, tokens: TokenPair) -> Result<()>;

    /// Forgets the session (logout).
    fn clear(&self) -> Result<()>;
}

/// Session store persisting to `session.toml` under the data directory.
pub struct FileSessionStore {
    path: PathBuf,
    cached: Mutex<Option<TokenPair>>,
}

impl FileSessionStore {
    /// Opens the store rooted at `data_dir`, loading any persisted session.
    ///
    /// An unreadable or unparsable session file is treated as no session;
    /// the next `store` overwrites it.
    pub fn open(data_dir: &Path) -> Self {
        let path = data_dir.join(SESSION_FILE);
        let cached = match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<TokenPair>(&content) {
                Ok(tokens) => Some(tokens),
                Err(err) => {
                    log::warn!("ignoring malformed session file {}: {}", path.display(), err);
                    None
                }
            },
            Err(_) => None,
        };

        Self {
            path,
            cached: Mutex::new(cached),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn access(&self) -> Option<String> {
        self.cached
            .lock()
            .unwrap()
            .as_ref()
            .map(|tokens| tokens.access.clone())
    }

    fn refresh(&self) -> Option<String> {
        self.cached
            .lock()
            .unwrap()
            .as_ref()
            .map(|tokens| tokens.refresh.clone())
    }

    fn store(&self, tokens: TokenPair) -> Result<()> {
        // Cache before touching the disk so the session survives the process
        // even when persistence fails.
        *self.cached.lock().unwrap() = Some(tokens.clone());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&tokens)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.cached.lock().unwrap() = None;
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-memory session store for tests.
#[derive(Default)]
pub struct MemorySessionStore {
    tokens: Mutex<Option<TokenPair>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn access(&self) -> Option<String> {
        self.tokens
            .lock()
            .unwrap()
            .as_ref()
            .map(|tokens| tokens.access.clone())
    }

    fn refresh(&self) -> Option<String> {
        self.tokens
            .lock()
            .unwrap()
            .as_ref()
            .map(|tokens| tokens.refresh.clone())
    }

    fn store(&self, tokens: TokenPair) -> Result<()> {
        *self.tokens.lock().unwrap() = Some(tokens);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.tokens.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_tokens() -> TokenPair {
        TokenPair {
            access: "access-token".to_string(),
            refresh: "refresh-token".to_string(),
        }
    }

    #[test]
    fn file_store_round_trips_tokens() {
        let dir = tempdir().expect("failed to create temp dir");
        let store = FileSessionStore::open(dir.path());

        assert!(store.access().is_none());

        store.store(sample_tokens()).expect("failed to store tokens");
        assert_eq!(store.access().as_deref(), Some("access-token"));
        assert_eq!(store.refresh().as_deref(), Some("refresh-token"));

        // A fresh store over the same directory sees the persisted session.
        let reopened = FileSessionStore::open(dir.path());
        assert_eq!(reopened.access().as_deref(), Some("access-token"));
    }

    #[test]
    fn clear_removes_tokens_and_file() {
        let dir = tempdir().expect("failed to create temp dir");
        let store = FileSessionStore::open(dir.path());
        store.store(sample_tokens()).expect("failed to store tokens");

        store.clear().expect("failed to clear session");

        assert!(store.access().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn malformed_session_file_is_ignored() {
        let dir = tempdir().expect("failed to create temp dir");
        fs::write(dir.path().join(SESSION_FILE), "not really toml = =").unwrap();

        let store = FileSessionStore::open(dir.path());
        assert!(store.access().is_none());
    }

    #[test]
    fn memory_store_round_trips_tokens() {
        let store = MemorySessionStore::new();
        assert!(store.access().is_none());

        store.store(sample_tokens()).expect("failed to store tokens");
        assert_eq!(store.access().as_deref(), Some("access-token"));

        store.clear().expect("failed to clear session");
        assert!(store.refresh().is_none());
    }
}
