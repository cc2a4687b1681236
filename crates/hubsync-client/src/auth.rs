//! Login exchange and the bearer session it produces.

use crate::error::{ClientError, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use url::Url;

/// Username plus a password or personal access token.
///
/// Both kinds of secret go through the same login exchange.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub secret: SecretString,
}

impl Credentials {
    /// Create credentials from a username and secret.
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: SecretString::new(secret.into()),
        }
    }
}

/// An authenticated session.
///
/// Built once and shared read-only for the lifetime of a client. The refresh
/// token is kept for callers that persist sessions; the client never uses it.
#[derive(Debug, Clone)]
pub struct Session {
    token: SecretString,
    refresh_token: Option<SecretString>,
}

impl Session {
    /// Wrap an existing token pair.
    pub fn new(token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            token: SecretString::new(token.into()),
            refresh_token: refresh_token.map(SecretString::new),
        }
    }

    /// Value for the `Authorization` header.
    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }

    /// The access token.
    pub fn token(&self) -> &SecretString {
        &self.token
    }

    /// The refresh token, if the login returned one.
    pub fn refresh_token(&self) -> Option<&SecretString> {
        self.refresh_token.as_ref()
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Exchange credentials for a session at `{base_url}/v2/users/login/`.
#[instrument(skip(http, credentials), fields(username = %credentials.username))]
pub async fn login(http: &reqwest::Client, base_url: &Url, credentials: &Credentials) -> Result<Session> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidConfig(format!("base URL cannot be a base: {base_url}")))?
        .pop_if_empty()
        .extend(["v2", "users", "login", ""]);

    let response = http
        .post(url)
        .json(&LoginRequest {
            username: &credentials.username,
            password: credentials.secret.expose_secret(),
        })
        .send()
        .await
        .map_err(|e| ClientError::AuthenticationFailed(format!("login request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::AuthenticationFailed(format!(
            "login rejected with status {status}"
        )));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| ClientError::AuthenticationFailed(format!("failed to read login response: {e}")))?;
    let login: LoginResponse = serde_json::from_slice(&body)
        .map_err(|e| ClientError::AuthenticationFailed(format!("failed to parse login response: {e}")))?;

    if login.token.is_empty() {
        return Err(ClientError::AuthenticationFailed("login returned an empty token".into()));
    }

    info!("Logged in to Docker Hub");
    Ok(Session::new(login.token, login.refresh_token))
}
