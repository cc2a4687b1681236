//! Authenticated Docker Hub API client.

use crate::auth::{self, Credentials, Session};
use crate::error::{ClientError, Result};
use crate::models::{
    CurrentUser, ListResponse, Organization, Repository, RepositoryPermission, Team, User,
};
use crate::pagination::{Page, PageCursor, PageRequest};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Public Docker Hub API.
pub const DEFAULT_BASE_URL: &str = "https://hub.docker.com";

/// The endpoints this client reads.
#[derive(Debug, Clone, Copy)]
enum Endpoint<'a> {
    CurrentUser,
    Organizations,
    Organization { org: &'a str },
    Members { org: &'a str },
    Teams { org: &'a str },
    Team { org: &'a str, team: &'a str },
    TeamMembers { org: &'a str, team: &'a str },
    Repositories { org: &'a str },
    RepositoryTeams { org: &'a str, repo: &'a str },
}

impl<'a> Endpoint<'a> {
    /// Path segments below the base URL. The trailing empty segment keeps the
    /// slash the API redirects to.
    fn segments(&self) -> Vec<&'a str> {
        match *self {
            Endpoint::CurrentUser => vec!["v2", "user", ""],
            Endpoint::Organizations => vec!["v2", "user", "orgs", ""],
            Endpoint::Organization { org } => vec!["v2", "orgs", org, ""],
            Endpoint::Members { org } => vec!["v2", "orgs", org, "members", ""],
            Endpoint::Teams { org } => vec!["v2", "orgs", org, "groups", ""],
            Endpoint::Team { org, team } => vec!["v2", "orgs", org, "groups", team, ""],
            Endpoint::TeamMembers { org, team } => {
                vec!["v2", "orgs", org, "groups", team, "members", ""]
            }
            Endpoint::Repositories { org } => vec!["v2", "repositories", org, ""],
            Endpoint::RepositoryTeams { org, repo } => {
                vec!["v2", "repositories", org, repo, "groups", ""]
            }
        }
    }
}

impl fmt::Display for Endpoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GET /{}", self.segments().join("/"))
    }
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, `https://hub.docker.com` unless testing.
    pub base_url: String,
    /// Per-request timeout applied by the transport.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("hubsync/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Configuration for a specific API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Host of the base URL, the key sessions are stored under.
    pub fn host(&self) -> Result<String> {
        let url = self.parsed_base_url()?;
        url.host_str().map(str::to_string).ok_or_else(|| {
            ClientError::InvalidConfig(format!("base URL has no host: {}", self.base_url))
        })
    }

    fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidConfig(format!("invalid base URL {}: {e}", self.base_url)))?;
        if url.cannot_be_a_base() {
            return Err(ClientError::InvalidConfig(format!(
                "base URL cannot be a base: {}",
                self.base_url
            )));
        }
        Ok(url)
    }

    fn http_client(&self) -> Result<Client> {
        Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(self.timeout)
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("failed to build HTTP client: {e}")))
    }
}

/// Read-only Docker Hub client.
///
/// The session is fixed at construction, so a client can be shared across
/// tasks freely; cloning is cheap.
#[derive(Clone)]
pub struct HubClient {
    http: Client,
    base_url: Url,
    session: Arc<Session>,
}

impl fmt::Debug for HubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HubClient {
    /// Create a client around an existing session.
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self> {
        Ok(Self {
            http: config.http_client()?,
            base_url: config.parsed_base_url()?,
            session: Arc::new(session),
        })
    }

    /// Log in with `credentials` and create a client for the resulting session.
    pub async fn login(config: &ClientConfig, credentials: &Credentials) -> Result<Self> {
        let http = config.http_client()?;
        let base_url = config.parsed_base_url()?;
        let session = auth::login(&http, &base_url, credentials).await?;

        Ok(Self {
            http,
            base_url,
            session: Arc::new(session),
        })
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Host the session belongs to, used as credential store key.
    pub fn host(&self) -> &str {
        self.base_url.host_str().unwrap_or_default()
    }

    /// The session this client authenticates with.
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, endpoint: Endpoint<'_>, query: &[(&'static str, String)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidConfig(format!("base URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(endpoint.segments());

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Make a GET request and decode the JSON body.
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint<'_>,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        let url = self.url(endpoint, query)?;
        debug!(%endpoint, url = %url, "Sending request");

        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .header("Authorization", self.session.bearer())
            .send()
            .await
            .map_err(|source| ClientError::Network {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        debug!(%endpoint, status = status.as_u16(), "Received response");

        if status.as_u16() >= 300 {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await.map_err(|source| ClientError::Network {
            endpoint: endpoint.to_string(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|source| ClientError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    /// Fetch one page of a list endpoint.
    async fn get_page<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint<'_>,
        request: &PageRequest<T>,
    ) -> Result<Page<T>> {
        let response: ListResponse<T> = self.get(endpoint, &request.query_pairs()).await?;
        let next = PageCursor::from_next_link(response.next.as_deref())?;

        debug!(
            %endpoint,
            items = response.results.len(),
            next_page = next.map(|c| c.page()),
            "Fetched page"
        );

        Ok(Page {
            items: response.results,
            count: response.count,
            next,
        })
    }

    /// Get the authenticated account.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<CurrentUser> {
        self.get(Endpoint::CurrentUser, &[]).await
    }

    /// List organizations the authenticated account belongs to.
    #[instrument(skip(self))]
    pub async fn list_organizations(
        &self,
        request: &PageRequest<Organization>,
    ) -> Result<Page<Organization>> {
        self.get_page(Endpoint::Organizations, request).await
    }

    /// Get a single organization by slug.
    #[instrument(skip(self))]
    pub async fn get_organization(&self, org: &str) -> Result<Organization> {
        self.get(Endpoint::Organization { org }, &[]).await
    }

    /// List members of an organization.
    #[instrument(skip(self))]
    pub async fn list_users(&self, org: &str, request: &PageRequest<User>) -> Result<Page<User>> {
        self.get_page(Endpoint::Members { org }, request).await
    }

    /// List teams of an organization.
    #[instrument(skip(self))]
    pub async fn list_teams(&self, org: &str, request: &PageRequest<Team>) -> Result<Page<Team>> {
        self.get_page(Endpoint::Teams { org }, request).await
    }

    /// Get a team by name.
    #[instrument(skip(self))]
    pub async fn get_team(&self, org: &str, team: &str) -> Result<Team> {
        self.get(Endpoint::Team { org, team }, &[]).await
    }

    /// List members of a team.
    #[instrument(skip(self))]
    pub async fn list_team_members(
        &self,
        org: &str,
        team: &str,
        request: &PageRequest<User>,
    ) -> Result<Page<User>> {
        self.get_page(Endpoint::TeamMembers { org, team }, request)
            .await
    }

    /// List repositories of an organization.
    #[instrument(skip(self))]
    pub async fn list_repositories(
        &self,
        org: &str,
        request: &PageRequest<Repository>,
    ) -> Result<Page<Repository>> {
        self.get_page(Endpoint::Repositories { org }, request).await
    }

    /// List team permissions on a repository.
    #[instrument(skip(self))]
    pub async fn list_repository_permissions(
        &self,
        org: &str,
        repo: &str,
        request: &PageRequest<RepositoryPermission>,
    ) -> Result<Page<RepositoryPermission>> {
        self.get_page(Endpoint::RepositoryTeams { org, repo }, request)
            .await
    }
}
