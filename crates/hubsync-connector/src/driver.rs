//! Reference sync driver.
//!
//! Walks the resource graph the way a host platform does: list every type
//! without a parent, then list child types under each resource found, and
//! page every call until its token comes back empty.

use crate::error::{ConnectorError, Result};
use crate::model::{Entitlement, Grant, ListPage, Resource, ResourceId};
use crate::syncer::ResourceSyncer;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Everything a full sync produced, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSnapshot {
    pub resources: Vec<Resource>,
    pub entitlements: Vec<Entitlement>,
    pub grants: Vec<Grant>,
}

/// Drives a set of syncers to completion.
pub struct SyncDriver {
    syncers: Vec<Arc<dyn ResourceSyncer>>,
}

impl SyncDriver {
    pub fn new(syncers: Vec<Arc<dyn ResourceSyncer>>) -> Self {
        Self { syncers }
    }

    /// Run a full sync.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<SyncSnapshot> {
        let by_type: HashMap<&str, &Arc<dyn ResourceSyncer>> = self
            .syncers
            .iter()
            .map(|s| (s.resource_type().id, s))
            .collect();

        let mut snapshot = SyncSnapshot::default();
        let mut pending: VecDeque<(&str, Option<ResourceId>)> = self
            .syncers
            .iter()
            .map(|s| (s.resource_type().id, None))
            .collect();

        while let Some((type_id, parent)) = pending.pop_front() {
            let syncer = by_type.get(type_id).ok_or_else(|| {
                ConnectorError::MissingContext(format!("no syncer for resource type {type_id}"))
            })?;

            let resources = drain(|token| {
                let parent = parent.clone();
                async move { syncer.list(parent.as_ref(), &token).await }
            })
            .await?;
            debug!(
                resource_type = type_id,
                parent = ?parent,
                count = resources.len(),
                "Listed resources"
            );

            for resource in resources {
                let target = &resource;
                let entitlements =
                    drain(|token| async move { syncer.entitlements(target, &token).await }).await?;
                let grants =
                    drain(|token| async move { syncer.grants(target, &token).await }).await?;

                snapshot.entitlements.extend(entitlements);
                snapshot.grants.extend(grants);
                for child in &resource.child_resource_types {
                    if let Some((child_type, _)) = by_type.get_key_value(child.as_str()) {
                        pending.push_back((*child_type, Some(resource.id.clone())));
                    }
                }
                snapshot.resources.push(resource);
            }
        }

        info!(
            resources = snapshot.resources.len(),
            entitlements = snapshot.entitlements.len(),
            grants = snapshot.grants.len(),
            "Sync complete"
        );
        Ok(snapshot)
    }
}

/// Call `fetch` with successive tokens until it returns an empty one.
async fn drain<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<ListPage<T>>>,
{
    let mut items = Vec::new();
    let mut token = String::new();
    loop {
        let page = fetch(token.clone()).await?;
        let more = page.has_next_page();
        items.extend(page.items);
        if !more {
            return Ok(items);
        }
        if page.next_token == token {
            return Err(ConnectorError::InvalidPageToken(
                "pagination did not advance".into(),
            ));
        }
        token = page.next_token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_drain_follows_tokens() {
        let pages = vec![
            ListPage {
                items: vec![1, 2],
                next_token: "a".into(),
            },
            ListPage {
                items: vec![3],
                next_token: "b".into(),
            },
            ListPage::last(vec![4]),
        ];
        let mut calls = Vec::new();
        let mut iter = pages.into_iter();

        let items = drain(|token| {
            calls.push(token);
            let page = iter.next().unwrap();
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3, 4]);
        assert_eq!(calls, vec!["", "a", "b"]);
    }

    #[tokio::test]
    async fn test_drain_rejects_stuck_token() {
        let err = drain(|_| async {
            Ok(ListPage::<u8> {
                items: vec![],
                next_token: "same".into(),
            })
        })
        .await
        .unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidPageToken(_)));
    }
}
