//! The contract every resource synchronizer implements.

use crate::error::Result;
use crate::model::{Entitlement, Grant, ListPage, Resource, ResourceId, ResourceType};
use async_trait::async_trait;

/// Lists one kind of resource and what can be, and is, granted on it.
///
/// Every call is a pure function of its arguments: no state survives between
/// calls except what the caller keeps in the returned token.
#[async_trait]
pub trait ResourceSyncer: Send + Sync {
    /// The resource type this syncer produces.
    fn resource_type(&self) -> &'static ResourceType;

    /// One page of resources under `parent`.
    ///
    /// Child types return an empty final page when `parent` is `None`.
    async fn list(&self, parent: Option<&ResourceId>, token: &str) -> Result<ListPage<Resource>>;

    /// Grantable capabilities of `resource`.
    async fn entitlements(&self, resource: &Resource, token: &str) -> Result<ListPage<Entitlement>>;

    /// One page of grants on `resource`.
    async fn grants(&self, resource: &Resource, token: &str) -> Result<ListPage<Grant>>;
}
