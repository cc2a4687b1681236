//! The Docker Hub connector: session setup, validation and the syncer registry.

use crate::config::{ConnectorConfig, SessionSource};
use crate::error::{ConnectorError, Result};
use crate::organization::OrganizationSyncer;
use crate::repository::RepositorySyncer;
use crate::syncer::ResourceSyncer;
use crate::team::TeamSyncer;
use crate::user::UserSyncer;
use hubsync_client::{ClientConfig, CredentialStore, Credentials, HubClient, PageRequest};
use secrecy::ExposeSecret;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// Static description of the connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub display_name: String,
    pub description: String,
}

/// Connector over one Docker Hub account.
#[derive(Debug, Clone)]
pub struct HubConnector {
    client: Arc<HubClient>,
    orgs: Vec<String>,
    page_size: u32,
}

impl HubConnector {
    /// Validate `config`, establish a session and check that it works.
    pub async fn new(config: ConnectorConfig) -> Result<Self> {
        config.validate()?;

        let client_config = ClientConfig::default().with_base_url(&config.base_url);
        let client = match config.session_source()? {
            SessionSource::Login { secret } => {
                let credentials =
                    Credentials::new(&config.username, secret.expose_secret().clone());
                HubClient::login(&client_config, &credentials)
                    .await
                    .map_err(ConnectorError::Authentication)?
            }
            SessionSource::Stored { path } => {
                let host = client_config
                    .host()
                    .map_err(|e| ConnectorError::InvalidConfig(e.to_string()))?;
                let session = CredentialStore::new(path)
                    .session(&host)
                    .map_err(ConnectorError::Authentication)?;
                HubClient::new(&client_config, session)
                    .map_err(|e| ConnectorError::InvalidConfig(e.to_string()))?
            }
        };

        let connector = Self::with_client(client, config.orgs, config.page_size);
        connector.validate().await?;
        info!(host = connector.client.host(), "Connector ready");
        Ok(connector)
    }

    /// Wrap an already authenticated client.
    pub fn with_client(client: HubClient, orgs: Vec<String>, page_size: u32) -> Self {
        Self {
            client: Arc::new(client),
            orgs,
            page_size,
        }
    }

    /// The underlying API client.
    pub fn client(&self) -> &HubClient {
        &self.client
    }

    pub fn metadata(&self) -> Metadata {
        Metadata {
            display_name: "Docker Hub".to_string(),
            description: "Syncs Docker Hub organizations with their members, teams and repository access"
                .to_string(),
        }
    }

    /// Confirm the session works with one lightweight read.
    #[instrument(skip(self))]
    pub async fn validate(&self) -> Result<()> {
        self.client
            .list_organizations(&PageRequest::first(1))
            .await
            .map_err(ConnectorError::Authentication)?;
        Ok(())
    }

    /// One syncer per resource type, roots first.
    pub fn resource_syncers(&self) -> Vec<Arc<dyn ResourceSyncer>> {
        vec![
            Arc::new(OrganizationSyncer::new(
                self.client.clone(),
                self.orgs.clone(),
                self.page_size,
            )),
            Arc::new(UserSyncer::new(self.client.clone(), self.page_size)),
            Arc::new(TeamSyncer::new(self.client.clone(), self.page_size)),
            Arc::new(RepositorySyncer::new(self.client.clone(), self.page_size)),
        ]
    }

    /// Syncer for a resource type id.
    pub fn syncer(&self, resource_type_id: &str) -> Option<Arc<dyn ResourceSyncer>> {
        self.resource_syncers()
            .into_iter()
            .find(|s| s.resource_type().id == resource_type_id)
    }
}
