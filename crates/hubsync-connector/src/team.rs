//! Team synchronizer: one membership entitlement per team, one grant per member.

use crate::error::{ConnectorError, Result};
use crate::mapper::{new_grant, team_membership_entitlement, TEAM_MEMBERSHIP};
use crate::model::{
    Entitlement, Grant, ListPage, Profile, Resource, ResourceId, ResourceType, TeamProfile,
    RESOURCE_TYPE_TEAM, TEAM, USER,
};
use crate::pagination::{page_request, PageBag, PageScope};
use crate::syncer::ResourceSyncer;
use async_trait::async_trait;
use hubsync_client::{HubClient, Team};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Lists organization teams and their members.
#[derive(Debug)]
pub struct TeamSyncer {
    client: Arc<HubClient>,
    page_size: u32,
}

impl TeamSyncer {
    pub fn new(client: Arc<HubClient>, page_size: u32) -> Self {
        Self { client, page_size }
    }
}

/// Create a connector resource for a Docker Hub team.
pub(crate) fn team_resource(team: &Team, parent_id: &ResourceId) -> Resource {
    Resource {
        id: ResourceId::new(TEAM, team.id.to_string()),
        display_name: team.name.clone(),
        description: (!team.description.is_empty()).then(|| team.description.clone()),
        parent_id: Some(parent_id.clone()),
        profile: Profile::Team(TeamProfile {
            team_id: team.id,
            team_name: team.name.clone(),
        }),
        child_resource_types: Vec::new(),
    }
}

#[async_trait]
impl ResourceSyncer for TeamSyncer {
    fn resource_type(&self) -> &'static ResourceType {
        &RESOURCE_TYPE_TEAM
    }

    #[instrument(skip(self))]
    async fn list(&self, parent: Option<&ResourceId>, token: &str) -> Result<ListPage<Resource>> {
        let Some(parent) = parent else {
            return Ok(ListPage::empty());
        };

        let (bag, page) = PageBag::parse(token, PageScope::children(TEAM, parent))?;
        let request = page_request(page.as_deref(), self.page_size)?;

        let org = &parent.resource;
        let teams = self
            .client
            .list_teams(org, &request)
            .await
            .map_err(|e| ConnectorError::api(format!("list teams of organization {org}"), e))?;

        let next = bag.next_token(teams.next.map(|c| c.marker()).as_deref())?;
        debug!(org = %org, count = teams.items.len(), "Listed teams");

        Ok(ListPage {
            items: teams.items.iter().map(|t| team_resource(t, parent)).collect(),
            next_token: next,
        })
    }

    async fn entitlements(&self, resource: &Resource, _token: &str) -> Result<ListPage<Entitlement>> {
        Ok(ListPage::last(vec![team_membership_entitlement(resource)]))
    }

    #[instrument(skip(self, resource), fields(team = %resource.id))]
    async fn grants(&self, resource: &Resource, token: &str) -> Result<ListPage<Grant>> {
        let profile = resource.team_profile().ok_or_else(|| {
            ConnectorError::MissingContext(format!("{} has no team profile", resource.id))
        })?;
        let org = resource.parent_slug().ok_or_else(|| {
            ConnectorError::MissingContext(format!("{} has no parent organization", resource.id))
        })?;

        let (bag, page) = PageBag::parse(token, PageScope::resource(TEAM, &resource.id.resource))?;
        let request = page_request(page.as_deref(), self.page_size)?;

        let members = self
            .client
            .list_team_members(org, &profile.team_name, &request)
            .await
            .map_err(|e| {
                ConnectorError::api(format!("list members of team {}", profile.team_name), e)
            })?;

        let next = bag.next_token(members.next.map(|c| c.marker()).as_deref())?;
        debug!(count = members.items.len(), "Listed team members");

        let grants = members
            .items
            .iter()
            .map(|member| {
                new_grant(
                    resource,
                    TEAM_MEMBERSHIP,
                    ResourceId::new(USER, &member.id),
                    None,
                )
            })
            .collect();

        Ok(ListPage {
            items: grants,
            next_token: next,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ORGANIZATION;
    use hubsync_client::{ClientConfig, Session};

    fn syncer() -> TeamSyncer {
        let client = HubClient::new(
            &ClientConfig::default().with_base_url("http://127.0.0.1:9"),
            Session::new("token", None),
        )
        .unwrap();
        TeamSyncer::new(Arc::new(client), 50)
    }

    fn infra() -> Resource {
        let team = Team {
            id: 7,
            name: "infra".into(),
            description: String::new(),
        };
        team_resource(&team, &ResourceId::new(ORGANIZATION, "acme"))
    }

    #[test]
    fn test_team_resource() {
        let resource = infra();
        assert_eq!(resource.id, ResourceId::new(TEAM, "7"));
        assert_eq!(resource.parent_slug(), Some("acme"));
        assert!(resource.description.is_none());
        assert_eq!(resource.team_profile().unwrap().team_name, "infra");
    }

    #[tokio::test]
    async fn test_list_without_parent_is_empty() {
        let page = syncer().list(None, "").await.unwrap();
        assert!(page.items.is_empty());
        assert!(!page.has_next_page());
    }

    #[tokio::test]
    async fn test_single_membership_entitlement() {
        let page = syncer().entitlements(&infra(), "").await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "team:7:member");
        assert_eq!(page.next_token, "");
    }

    #[tokio::test]
    async fn test_grants_require_team_profile() {
        let mut resource = infra();
        resource.profile = Profile::Repository(crate::model::RepositoryProfile {
            namespace: "acme".into(),
            name: "web".into(),
        });
        let err = syncer().grants(&resource, "").await.unwrap_err();
        assert!(matches!(err, ConnectorError::MissingContext(_)));

        let mut orphan = infra();
        orphan.parent_id = None;
        let err = syncer().grants(&orphan, "").await.unwrap_err();
        assert!(matches!(err, ConnectorError::MissingContext(_)));
    }
}
