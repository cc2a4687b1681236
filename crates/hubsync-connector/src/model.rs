//! Resource, entitlement and grant shapes handed to the governance platform.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource type id for organizations.
pub const ORGANIZATION: &str = "org";
/// Resource type id for users.
pub const USER: &str = "user";
/// Resource type id for teams.
pub const TEAM: &str = "team";
/// Resource type id for repositories.
pub const REPOSITORY: &str = "repository";

/// Shape a resource type conforms to on the platform side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceTrait {
    User,
    Group,
}

/// Description of a kind of resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceType {
    pub id: &'static str,
    pub display_name: &'static str,
    pub traits: &'static [ResourceTrait],
}

/// The four resource types this connector syncs.
pub static RESOURCE_TYPE_ORGANIZATION: ResourceType = ResourceType {
    id: ORGANIZATION,
    display_name: "Organization",
    traits: &[],
};

pub static RESOURCE_TYPE_USER: ResourceType = ResourceType {
    id: USER,
    display_name: "User",
    traits: &[ResourceTrait::User],
};

pub static RESOURCE_TYPE_TEAM: ResourceType = ResourceType {
    id: TEAM,
    display_name: "Team",
    traits: &[ResourceTrait::Group],
};

pub static RESOURCE_TYPE_REPOSITORY: ResourceType = ResourceType {
    id: REPOSITORY,
    display_name: "Repository",
    traits: &[],
};

/// Globally unique reference to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    pub resource_type: String,
    pub resource: String,
}

impl ResourceId {
    pub fn new(resource_type: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource: resource.into(),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.resource)
    }
}

/// Typed profile carried by each resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Profile {
    Organization(OrganizationProfile),
    User(UserProfile),
    Team(TeamProfile),
    Repository(RepositoryProfile),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationProfile {
    pub org_id: String,
    pub org_name: String,
}

/// Account status reported for users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Enabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub login: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: UserStatus,
}

/// Team identity; `team_name` drives member listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamProfile {
    pub team_id: u64,
    pub team_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryProfile {
    pub namespace: String,
    pub name: String,
}

/// A synced resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ResourceId>,
    pub profile: Profile,
    /// Resource types listed beneath this resource.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_resource_types: Vec<String>,
}

impl Resource {
    /// Team profile, if this is a team.
    pub fn team_profile(&self) -> Option<&TeamProfile> {
        match &self.profile {
            Profile::Team(profile) => Some(profile),
            _ => None,
        }
    }

    /// Slug of the parent resource, used as the organization for API paths.
    pub fn parent_slug(&self) -> Option<&str> {
        self.parent_id.as_ref().map(|p| p.resource.as_str())
    }
}

/// How an entitlement is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementPurpose {
    /// Membership-style assignment.
    Assignment,
    /// Access level on the resource.
    Permission,
}

/// A grantable capability attached to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    pub id: String,
    pub resource: ResourceId,
    pub slug: String,
    pub display_name: String,
    pub description: String,
    pub purpose: EntitlementPurpose,
    pub grantable_to: Vec<String>,
}

/// Instruction to resolve a grant transitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantExpandable {
    /// Entitlements whose holders inherit the grant.
    pub entitlement_ids: Vec<String>,
    /// Expand one hop only.
    pub shallow: bool,
    /// Only principals of these types inherit.
    pub resource_type_ids: Vec<String>,
}

/// An entitlement held by a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub id: String,
    pub entitlement_id: String,
    pub resource: ResourceId,
    pub principal: ResourceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expandable: Option<GrantExpandable>,
}

/// One page of results plus the token for the next page.
///
/// An empty `next_token` means the enumeration is complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub next_token: String,
}

impl<T> ListPage<T> {
    /// A final page with no items.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_token: String::new(),
        }
    }

    /// A final page.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: String::new(),
        }
    }

    /// Check if there are more pages.
    pub fn has_next_page(&self) -> bool {
        !self.next_token.is_empty()
    }
}
