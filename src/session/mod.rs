//! Session and credential handling
//!
//! The session predicate is simple: a non-empty stored token means logged
//! in. Storage sits behind [`CredentialStore`], so the shell uses a
//! file-backed store while tests inject an in-memory one, and nothing else
//! in the crate touches ambient storage directly.

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::utils::paths::AppPaths;

/// Key under which the auth token is stored
pub const TOKEN_KEY: &str = "token";

/// Persistent key/value credential storage
pub trait CredentialStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn clear_all(&mut self) -> Result<()>;
}

/// File-backed store persisted as a JSON object under the config directory
pub struct FileCredentialStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileCredentialStore {
    pub fn open_default() -> Result<Self> {
        Self::open(AppPaths::credentials_file()?)
    }

    pub fn open(path: PathBuf) -> Result<Self> {
        let values = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            HashMap::new()
        };
        Ok(Self { path, values })
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn clear_all(&mut self) -> Result<()> {
        self.values.clear();
        self.persist()
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryCredentialStore {
    values: HashMap<String, String>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear_all(&mut self) -> Result<()> {
        self.values.clear();
        Ok(())
    }
}

/// Session state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A login succeeded and issued this token
    CredentialsSet { token: String },
    LoggedOut,
}

/// The session context handed down to the views that need it
pub struct SessionContext {
    store: Box<dyn CredentialStore>,
    authenticated: bool,
}

impl SessionContext {
    pub fn new(store: Box<dyn CredentialStore>) -> Self {
        let authenticated = store
            .get(TOKEN_KEY)
            .map(|t| !t.is_empty())
            .unwrap_or(false);
        Self {
            store,
            authenticated,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.authenticated
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY)
    }

    /// Apply a session transition. Setting credentials clears every prior
    /// stored value before the new token lands, and only then is the
    /// session marked authenticated.
    pub fn apply(&mut self, event: SessionEvent) -> Result<()> {
        match event {
            SessionEvent::CredentialsSet { token } => {
                if token.is_empty() {
                    return Ok(());
                }
                self.store.clear_all()?;
                self.store.set(TOKEN_KEY, &token)?;
                self.authenticated = true;
                info!(target: "session", "Session authenticated");
            }
            SessionEvent::LoggedOut => {
                self.store.clear_all()?;
                self.authenticated = false;
                info!(target: "session", "Session cleared");
            }
        }
        Ok(())
    }
}
