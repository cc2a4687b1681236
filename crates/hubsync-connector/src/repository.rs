//! Repository synchronizer.
//!
//! Repositories carry three permission entitlements, each grantable to a
//! team. Permission records only name the team, so every grant page resolves
//! team names to durable ids before emitting expandable grants.

use crate::error::{ConnectorError, Result};
use crate::mapper::{new_grant, repository_entitlement, team_member_expansion, title_case};
use crate::model::{
    Entitlement, Grant, ListPage, Profile, RepositoryProfile, Resource, ResourceId, ResourceType,
    REPOSITORY, RESOURCE_TYPE_REPOSITORY, TEAM,
};
use crate::pagination::{page_request, PageBag, PageScope};
use crate::syncer::ResourceSyncer;
use async_trait::async_trait;
use hubsync_client::{HubClient, Permission, Repository, Team};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Lists organization repositories and the teams holding access to them.
#[derive(Debug)]
pub struct RepositorySyncer {
    client: Arc<HubClient>,
    page_size: u32,
}

impl RepositorySyncer {
    pub fn new(client: Arc<HubClient>, page_size: u32) -> Self {
        Self { client, page_size }
    }

    /// Resolve a team name to the team, fetching each name at most once per page.
    async fn resolve_team<'a>(
        &self,
        org: &str,
        name: &str,
        memo: &'a mut HashMap<String, Team>,
    ) -> Result<&'a Team> {
        if !memo.contains_key(name) {
            let team = self
                .client
                .get_team(org, name)
                .await
                .map_err(|e| ConnectorError::api(format!("get team {name} of {org}"), e))?;
            memo.insert(name.to_string(), team);
        }
        memo.get(name)
            .ok_or_else(|| ConnectorError::MissingContext(format!("team {name} not resolved")))
    }
}

/// Create a connector resource for a Docker Hub repository.
pub(crate) fn repository_resource(repo: &Repository, parent_id: &ResourceId) -> Resource {
    Resource {
        id: ResourceId::new(REPOSITORY, &repo.name),
        display_name: title_case(&repo.name),
        description: (!repo.description.is_empty()).then(|| repo.description.clone()),
        parent_id: Some(parent_id.clone()),
        profile: Profile::Repository(RepositoryProfile {
            namespace: repo.namespace.clone(),
            name: repo.name.clone(),
        }),
        child_resource_types: Vec::new(),
    }
}

fn repository_profile(resource: &Resource) -> Result<&RepositoryProfile> {
    match &resource.profile {
        Profile::Repository(profile) => Ok(profile),
        _ => Err(ConnectorError::MissingContext(format!(
            "{} has no repository profile",
            resource.id
        ))),
    }
}

#[async_trait]
impl ResourceSyncer for RepositorySyncer {
    fn resource_type(&self) -> &'static ResourceType {
        &RESOURCE_TYPE_REPOSITORY
    }

    #[instrument(skip(self))]
    async fn list(&self, parent: Option<&ResourceId>, token: &str) -> Result<ListPage<Resource>> {
        let Some(parent) = parent else {
            return Ok(ListPage::empty());
        };

        let (bag, page) = PageBag::parse(token, PageScope::children(REPOSITORY, parent))?;
        let request = page_request(page.as_deref(), self.page_size)?;

        let org = &parent.resource;
        let repos = self
            .client
            .list_repositories(org, &request)
            .await
            .map_err(|e| {
                ConnectorError::api(format!("list repositories of organization {org}"), e)
            })?;

        let next = bag.next_token(repos.next.map(|c| c.marker()).as_deref())?;
        debug!(org = %org, count = repos.items.len(), "Listed repositories");

        Ok(ListPage {
            items: repos
                .items
                .iter()
                .map(|r| repository_resource(r, parent))
                .collect(),
            next_token: next,
        })
    }

    async fn entitlements(&self, resource: &Resource, _token: &str) -> Result<ListPage<Entitlement>> {
        let entitlements = Permission::ALL
            .iter()
            .map(|permission| repository_entitlement(resource, *permission))
            .collect();
        Ok(ListPage::last(entitlements))
    }

    #[instrument(skip(self, resource), fields(repository = %resource.id))]
    async fn grants(&self, resource: &Resource, token: &str) -> Result<ListPage<Grant>> {
        let profile = repository_profile(resource)?;
        let org = resource
            .parent_slug()
            .unwrap_or(profile.namespace.as_str())
            .to_string();

        let (bag, page) = PageBag::parse(
            token,
            PageScope::resource(REPOSITORY, format!("{org}/{}", profile.name)),
        )?;
        let request = page_request(page.as_deref(), self.page_size)?;

        let permissions = self
            .client
            .list_repository_permissions(&org, &profile.name, &request)
            .await
            .map_err(|e| {
                ConnectorError::api(format!("list team permissions of {}", profile.name), e)
            })?;

        let mut memo = HashMap::new();
        let mut grants = Vec::with_capacity(permissions.items.len());
        for record in &permissions.items {
            let team = self.resolve_team(&org, &record.team_name, &mut memo).await?;
            grants.push(new_grant(
                resource,
                record.permission.as_str(),
                ResourceId::new(TEAM, team.id.to_string()),
                Some(team_member_expansion(team.id)),
            ));
        }

        let next = bag.next_token(permissions.next.map(|c| c.marker()).as_deref())?;
        debug!(
            count = grants.len(),
            lookups = memo.len(),
            "Listed repository grants"
        );

        Ok(ListPage {
            items: grants,
            next_token: next,
        })
    }
}
