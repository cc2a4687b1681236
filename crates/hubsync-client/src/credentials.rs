//! Local credential store holding sessions obtained earlier.
//!
//! The store is a TOML file keyed by host:
//!
//! ```toml
//! [hosts."hub.docker.com"]
//! token = "..."
//! refresh_token = "..."
//! ```

use crate::auth::Session;
use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Contents of the credentials file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    hosts: HashMap<String, StoredSession>,
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl std::fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StoredSession { .. }")
    }
}

/// File-backed store of sessions per host.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store backed by a specific file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<config dir>/hubsync/credentials.toml`.
    pub fn default_location() -> Result<Self> {
        let dir = dirs::config_dir().ok_or_else(|| {
            ClientError::CredentialStore("could not determine config directory".into())
        })?;
        Ok(Self::new(dir.join("hubsync").join("credentials.toml")))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up the session stored for `host`.
    pub fn session(&self, host: &str) -> Result<Session> {
        let file = self.load()?;
        let stored = file.hosts.get(host).ok_or_else(|| {
            ClientError::CredentialStore(format!(
                "no session stored for {host} in {}",
                self.path.display()
            ))
        })?;

        if stored.token.is_empty() {
            return Err(ClientError::CredentialStore(format!(
                "stored session for {host} has an empty token"
            )));
        }

        debug!(host, path = %self.path.display(), "Loaded stored session");
        Ok(Session::new(stored.token.clone(), stored.refresh_token.clone()))
    }

    /// Persist a session for `host`, keeping other hosts untouched.
    pub fn save(&self, host: &str, session: &Session) -> Result<()> {
        use secrecy::ExposeSecret;

        let mut file = if self.path.exists() {
            self.load()?
        } else {
            StoreFile::default()
        };

        file.hosts.insert(
            host.to_string(),
            StoredSession {
                token: session.token().expose_secret().clone(),
                refresh_token: session.refresh_token().map(|t| t.expose_secret().clone()),
            },
        );

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(&file)
            .map_err(|e| ClientError::CredentialStore(format!("failed to serialize: {e}")))?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    fn load(&self) -> Result<StoreFile> {
        let contents = std::fs::read_to_string(&self.path)?;
        toml::from_str(&contents).map_err(|e| {
            ClientError::CredentialStore(format!("failed to parse {}: {e}", self.path.display()))
        })
    }
}
