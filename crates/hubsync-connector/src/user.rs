//! User synchronizer. Users are principals only.

use crate::error::{ConnectorError, Result};
use crate::mapper::split_full_name;
use crate::model::{
    Entitlement, Grant, ListPage, Profile, Resource, ResourceId, ResourceType, UserProfile,
    UserStatus, RESOURCE_TYPE_USER, USER,
};
use crate::pagination::{page_request, PageBag, PageScope};
use crate::syncer::ResourceSyncer;
use async_trait::async_trait;
use hubsync_client::{HubClient, User};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Lists organization members.
#[derive(Debug)]
pub struct UserSyncer {
    client: Arc<HubClient>,
    page_size: u32,
}

impl UserSyncer {
    pub fn new(client: Arc<HubClient>, page_size: u32) -> Self {
        Self { client, page_size }
    }
}

/// Create a connector resource for a Docker Hub user.
pub(crate) fn user_resource(user: &User, parent_id: &ResourceId) -> Resource {
    let (first_name, last_name) = split_full_name(&user.full_name);

    Resource {
        id: ResourceId::new(USER, &user.id),
        display_name: user.username.clone(),
        description: None,
        parent_id: Some(parent_id.clone()),
        profile: Profile::User(UserProfile {
            user_id: user.id.clone(),
            login: user.username.clone(),
            first_name,
            last_name,
            email: non_empty(&user.email),
            role: non_empty(&user.role),
            status: UserStatus::Enabled,
        }),
        child_resource_types: Vec::new(),
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

#[async_trait]
impl ResourceSyncer for UserSyncer {
    fn resource_type(&self) -> &'static ResourceType {
        &RESOURCE_TYPE_USER
    }

    #[instrument(skip(self))]
    async fn list(&self, parent: Option<&ResourceId>, token: &str) -> Result<ListPage<Resource>> {
        let Some(parent) = parent else {
            return Ok(ListPage::empty());
        };

        let (bag, page) = PageBag::parse(token, PageScope::children(USER, parent))?;
        let request = page_request(page.as_deref(), self.page_size)?;

        let org = &parent.resource;
        let users = self
            .client
            .list_users(org, &request)
            .await
            .map_err(|e| ConnectorError::api(format!("list users of organization {org}"), e))?;

        let next = bag.next_token(users.next.map(|c| c.marker()).as_deref())?;
        debug!(org = %org, count = users.items.len(), "Listed users");

        Ok(ListPage {
            items: users.items.iter().map(|u| user_resource(u, parent)).collect(),
            next_token: next,
        })
    }

    async fn entitlements(&self, _resource: &Resource, _token: &str) -> Result<ListPage<Entitlement>> {
        Ok(ListPage::empty())
    }

    async fn grants(&self, _resource: &Resource, _token: &str) -> Result<ListPage<Grant>> {
        Ok(ListPage::empty())
    }
}
