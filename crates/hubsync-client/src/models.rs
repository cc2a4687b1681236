//! Docker Hub API record types.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Envelope shared by every list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    /// Total number of records across all pages.
    #[serde(default)]
    pub count: u64,
    /// Absolute URL of the next page, if any.
    #[serde(default)]
    pub next: Option<String>,
    /// Records on this page.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// The authenticated account.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
}

/// An organization the current user belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Organization {
    pub id: String,
    #[serde(rename = "orgname")]
    pub name: String,
}

/// An organization member, also returned for team members.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

/// A team ("group" in the API) within an organization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Team {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A repository owned by an organization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Repository {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub description: String,
}

impl Repository {
    /// External identifier, `namespace/name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// Access level a team holds on a repository.
///
/// Levels are ordered: Read < Write < Admin. Decoding ignores case; a level
/// outside these three is a decode error, since no entitlement exists for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Pull images.
    Read,
    /// Pull and push images.
    Write,
    /// Full control including repository settings.
    Admin,
}

impl Permission {
    /// Every level, lowest first.
    pub const ALL: [Permission; 3] = [Permission::Read, Permission::Write, Permission::Admin];

    /// Keyword used by the API and as entitlement slug.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Admin => "admin",
        }
    }

    /// Human label used in permission policy text.
    pub fn label(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "read and write",
            Permission::Admin => "admin",
        }
    }

    /// Parse from string, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "read" => Some(Permission::Read),
            "write" => Some(Permission::Write),
            "admin" => Some(Permission::Admin),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Permission::parse(&s)
            .ok_or_else(|| de::Error::unknown_variant(&s, &["read", "write", "admin"]))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A team's access to one repository.
///
/// `team_id` is absent from most responses, so callers resolve the team by name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RepositoryPermission {
    #[serde(rename = "group_id", default)]
    pub team_id: Option<u64>,
    #[serde(rename = "group_name")]
    pub team_name: String,
    pub permission: Permission,
}
