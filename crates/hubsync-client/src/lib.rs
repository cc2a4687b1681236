//! # Hubsync Docker Hub Client
//!
//! Typed, read-only access to the Docker Hub endpoints needed to mirror an
//! organization's structure: organizations, members, teams, team members,
//! repositories and repository team permissions.
//!
//! ## Features
//!
//! - **Typed cursors**: list calls return a [`PageCursor`] bound to the record
//!   type, built from the `page` parameter of the API's `next` link
//! - **Fixed sessions**: a bearer token obtained once through [`login`] or
//!   loaded from a [`CredentialStore`]; the client never re-authenticates
//! - **Fail fast**: any status of 300 or above, or an undecodable body, fails
//!   the call; retries are left to the transport
//!
//! ## Example
//!
//! ```rust,ignore
//! use hubsync_client::{ClientConfig, Credentials, HubClient, PageRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::default();
//!     let client = HubClient::login(&config, &Credentials::new("alice", "dckr_pat_xxx")).await?;
//!
//!     let mut request = PageRequest::first(50);
//!     loop {
//!         let page = client.list_teams("acme", &request).await?;
//!         for team in &page.items {
//!             println!("{} ({})", team.name, team.id);
//!         }
//!         match page.next {
//!             Some(cursor) => request = PageRequest::resume(Some(cursor), 50),
//!             None => break,
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod credentials;
pub mod error;
pub mod models;
pub mod pagination;

pub use auth::{login, Credentials, Session};
pub use client::{ClientConfig, HubClient, DEFAULT_BASE_URL};
pub use credentials::CredentialStore;
pub use error::{ClientError, Result};
pub use models::*;
pub use pagination::{Page, PageCursor, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
