//! # Hubsync Connector
//!
//! Mirrors a Docker Hub account into a normalized resource, entitlement and
//! grant model for identity governance platforms.
//!
//! ## Resource graph
//!
//! ```text
//! org ─┬─ user
//!      ├─ team        (entitlement: member, granted to users)
//!      └─ repository  (entitlements: read, write, admin, granted to teams)
//! ```
//!
//! Repository grants are expandable: a team holding `write` on a repository
//! implies the same access for every member of that team.
//!
//! ## Pagination
//!
//! Every call takes and returns an opaque token. An empty token starts an
//! enumeration; an empty returned token ends it. A token is bound to the
//! resource type and the parent or resource it was issued for; replaying it
//! anywhere else fails with [`ConnectorError::InvalidPageToken`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hubsync_connector::{ConnectorConfig, HubConnector, SyncDriver};
//! use secrecy::SecretString;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let connector = HubConnector::new(ConnectorConfig {
//!         username: "alice".into(),
//!         access_token: Some(SecretString::new("dckr_pat_xxx".into())),
//!         orgs: vec!["acme".into()],
//!         ..Default::default()
//!     })
//!     .await?;
//!
//!     let snapshot = SyncDriver::new(connector.resource_syncers()).run().await?;
//!     println!("{} grants", snapshot.grants.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod connector;
pub mod driver;
pub mod error;
pub mod mapper;
pub mod model;
pub mod organization;
pub mod pagination;
pub mod repository;
pub mod syncer;
pub mod team;
pub mod user;

pub use config::{ConnectorConfig, SessionSource};
pub use connector::{HubConnector, Metadata};
pub use driver::{SyncDriver, SyncSnapshot};
pub use error::{ConnectorError, Result};
pub use model::*;
pub use organization::OrganizationSyncer;
pub use pagination::{PageBag, PageScope, PageState};
pub use repository::RepositorySyncer;
pub use syncer::ResourceSyncer;
pub use team::TeamSyncer;
pub use user::UserSyncer;
