//! Connector configuration.

use crate::error::{ConnectorError, Result};
use hubsync_client::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use secrecy::SecretString;
use std::path::PathBuf;

/// Where the connector gets its API session from.
#[derive(Debug)]
pub enum SessionSource<'a> {
    /// Exchange a password or personal access token through login.
    Login { secret: &'a SecretString },
    /// Reuse a session saved in a credentials file.
    Stored { path: &'a PathBuf },
}

/// Configuration for the Docker Hub connector.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// Docker Hub account name.
    pub username: String,
    /// Account password.
    pub password: Option<SecretString>,
    /// Personal access token, used in place of the password.
    pub access_token: Option<SecretString>,
    /// Credentials file holding a saved session.
    pub credentials_file: Option<PathBuf>,
    /// Organizations to sync; empty syncs every organization of the account.
    pub orgs: Vec<String>,
    /// API base URL.
    pub base_url: String,
    /// Records requested per API page.
    pub page_size: u32,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: None,
            access_token: None,
            credentials_file: None,
            orgs: Vec::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ConnectorConfig {
    /// Check the configuration before any network access.
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(ConnectorError::InvalidConfig("username is required".into()));
        }
        if self.password.is_some() && self.access_token.is_some() {
            return Err(ConnectorError::InvalidConfig(
                "password and access token are mutually exclusive".into(),
            ));
        }
        if self.password.is_none() && self.access_token.is_none() && self.credentials_file.is_none()
        {
            return Err(ConnectorError::InvalidConfig(
                "one of password, access token or credentials file is required".into(),
            ));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConnectorError::InvalidConfig(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if let Some(org) = self.orgs.iter().find(|org| org.trim().is_empty()) {
            return Err(ConnectorError::InvalidConfig(format!(
                "empty organization name in allow-list: {org:?}"
            )));
        }
        Ok(())
    }

    /// Session source; a login secret takes precedence over a stored session.
    pub fn session_source(&self) -> Result<SessionSource<'_>> {
        if let Some(secret) = self.password.as_ref().or(self.access_token.as_ref()) {
            return Ok(SessionSource::Login { secret });
        }
        self.credentials_file
            .as_ref()
            .map(|path| SessionSource::Stored { path })
            .ok_or_else(|| ConnectorError::InvalidConfig("no session source configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> Option<SecretString> {
        Some(SecretString::new(s.to_string()))
    }

    fn config() -> ConnectorConfig {
        ConnectorConfig {
            username: "alice".into(),
            password: secret("hunter2"),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());

        let token_only = ConnectorConfig {
            password: None,
            access_token: secret("dckr_pat_x"),
            ..config()
        };
        assert!(token_only.validate().is_ok());
        assert!(matches!(
            token_only.session_source().unwrap(),
            SessionSource::Login { .. }
        ));
    }

    #[test]
    fn test_secrets_are_mutually_exclusive() {
        let both = ConnectorConfig {
            access_token: secret("dckr_pat_x"),
            ..config()
        };
        assert!(matches!(both.validate(), Err(ConnectorError::InvalidConfig(_))));
    }

    #[test]
    fn test_session_source_required() {
        let none = ConnectorConfig {
            password: None,
            ..config()
        };
        assert!(none.validate().is_err());

        let stored = ConnectorConfig {
            credentials_file: Some(PathBuf::from("/tmp/credentials.toml")),
            ..none
        };
        assert!(stored.validate().is_ok());
        assert!(matches!(
            stored.session_source().unwrap(),
            SessionSource::Stored { .. }
        ));
    }

    #[test]
    fn test_rejects_bad_fields() {
        let nameless = ConnectorConfig {
            username: " ".into(),
            ..config()
        };
        assert!(nameless.validate().is_err());

        let big_pages = ConnectorConfig {
            page_size: MAX_PAGE_SIZE + 1,
            ..config()
        };
        assert!(big_pages.validate().is_err());

        let blank_org = ConnectorConfig {
            orgs: vec!["acme".into(), "".into()],
            ..config()
        };
        assert!(blank_org.validate().is_err());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("hunter2"));
    }
}
