//! Organization synchronizer, the root of the resource hierarchy.

use crate::error::{ConnectorError, Result};
use crate::model::{
    Entitlement, Grant, ListPage, OrganizationProfile, Profile, Resource, ResourceId,
    ResourceType, ORGANIZATION, REPOSITORY, RESOURCE_TYPE_ORGANIZATION, TEAM, USER,
};
use crate::pagination::{page_request, PageBag, PageScope};
use crate::syncer::ResourceSyncer;
use async_trait::async_trait;
use hubsync_client::{HubClient, Organization};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Lists the organizations visible to the authenticated account.
#[derive(Debug)]
pub struct OrganizationSyncer {
    client: Arc<HubClient>,
    /// Allow-list of organization slugs; empty means every organization.
    orgs: Vec<String>,
    page_size: u32,
}

impl OrganizationSyncer {
    pub fn new(client: Arc<HubClient>, orgs: Vec<String>, page_size: u32) -> Self {
        Self {
            client,
            orgs,
            page_size,
        }
    }

    /// Resolve each allow-listed organization; the whole list is one page.
    async fn list_allowed(&self) -> Result<ListPage<Resource>> {
        let mut rv = Vec::with_capacity(self.orgs.len());
        for slug in &self.orgs {
            let org = self
                .client
                .get_organization(slug)
                .await
                .map_err(|e| ConnectorError::api(format!("get organization {slug}"), e))?;
            rv.push(organization_resource(&org));
        }
        Ok(ListPage::last(rv))
    }
}

/// Create a connector resource for a Docker Hub organization.
pub(crate) fn organization_resource(org: &Organization) -> Resource {
    Resource {
        id: ResourceId::new(ORGANIZATION, &org.name),
        display_name: org.name.clone(),
        description: None,
        parent_id: None,
        profile: Profile::Organization(OrganizationProfile {
            org_id: org.id.clone(),
            org_name: org.name.clone(),
        }),
        child_resource_types: vec![USER.to_string(), TEAM.to_string(), REPOSITORY.to_string()],
    }
}

#[async_trait]
impl ResourceSyncer for OrganizationSyncer {
    fn resource_type(&self) -> &'static ResourceType {
        &RESOURCE_TYPE_ORGANIZATION
    }

    #[instrument(skip(self))]
    async fn list(&self, _parent: Option<&ResourceId>, token: &str) -> Result<ListPage<Resource>> {
        let (bag, page) = PageBag::parse(token, PageScope::resource_type(ORGANIZATION))?;

        if !self.orgs.is_empty() {
            return self.list_allowed().await;
        }

        let request = page_request(page.as_deref(), self.page_size)?;
        let orgs = self
            .client
            .list_organizations(&request)
            .await
            .map_err(|e| ConnectorError::api("list organizations", e))?;

        let next = bag.next_token(orgs.next.map(|c| c.marker()).as_deref())?;
        debug!(count = orgs.items.len(), more = !next.is_empty(), "Listed organizations");

        Ok(ListPage {
            items: orgs.items.iter().map(organization_resource).collect(),
            next_token: next,
        })
    }

    /// Organizations are containers; nothing is granted on them.
    async fn entitlements(&self, _resource: &Resource, _token: &str) -> Result<ListPage<Entitlement>> {
        Ok(ListPage::empty())
    }

    async fn grants(&self, _resource: &Resource, _token: &str) -> Result<ListPage<Grant>> {
        Ok(ListPage::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_resource() {
        let org = Organization {
            id: "o1".into(),
            name: "acme".into(),
        };
        let resource = organization_resource(&org);

        assert_eq!(resource.id, ResourceId::new(ORGANIZATION, "acme"));
        assert!(resource.parent_id.is_none());
        assert_eq!(resource.child_resource_types, vec!["user", "team", "repository"]);
    }
}
