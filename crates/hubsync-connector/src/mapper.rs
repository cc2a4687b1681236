//! Pure mapping from Docker Hub records to entitlements and grants.

use crate::model::{
    Entitlement, EntitlementPurpose, Grant, GrantExpandable, Resource, ResourceId, TEAM, USER,
};
use hubsync_client::Permission;

/// Slug of the team membership entitlement.
pub const TEAM_MEMBERSHIP: &str = "member";

/// Entitlement id, `"{type}:{resource}:{slug}"`.
pub fn entitlement_id(resource: &ResourceId, slug: &str) -> String {
    format!("{}:{}:{slug}", resource.resource_type, resource.resource)
}

/// Grant id, `"{entitlement id}:{principal type}:{principal id}"`.
pub fn grant_id(entitlement_id: &str, principal: &ResourceId) -> String {
    format!(
        "{entitlement_id}:{}:{}",
        principal.resource_type, principal.resource
    )
}

/// Permission entitlement on a repository, grantable to teams.
pub fn repository_entitlement(repository: &Resource, permission: Permission) -> Entitlement {
    let slug = permission.as_str();
    Entitlement {
        id: entitlement_id(&repository.id, slug),
        resource: repository.id.clone(),
        slug: slug.to_string(),
        display_name: format!("{} Repository {slug}", repository.display_name),
        description: format!(
            "{} access to {} repository in Docker Hub",
            title_case(permission.label()),
            repository.display_name
        ),
        purpose: EntitlementPurpose::Permission,
        grantable_to: vec![TEAM.to_string()],
    }
}

/// Membership entitlement of a team, grantable to users.
pub fn team_membership_entitlement(team: &Resource) -> Entitlement {
    Entitlement {
        id: entitlement_id(&team.id, TEAM_MEMBERSHIP),
        resource: team.id.clone(),
        slug: TEAM_MEMBERSHIP.to_string(),
        display_name: format!("{} Team {TEAM_MEMBERSHIP}", team.display_name),
        description: format!("Access to {} team in Docker Hub", team.display_name),
        purpose: EntitlementPurpose::Assignment,
        grantable_to: vec![USER.to_string()],
    }
}

/// Grant of `slug` on `resource` to `principal`.
pub fn new_grant(
    resource: &Resource,
    slug: &str,
    principal: ResourceId,
    expandable: Option<GrantExpandable>,
) -> Grant {
    let entitlement_id = entitlement_id(&resource.id, slug);
    Grant {
        id: grant_id(&entitlement_id, &principal),
        entitlement_id,
        resource: resource.id.clone(),
        principal,
        expandable,
    }
}

/// Expansion of a team grant to the team's members, one hop, users only.
pub fn team_member_expansion(team_id: u64) -> GrantExpandable {
    GrantExpandable {
        entitlement_ids: vec![entitlement_id(
            &ResourceId::new(TEAM, team_id.to_string()),
            TEAM_MEMBERSHIP,
        )],
        shallow: true,
        resource_type_ids: vec![USER.to_string()],
    }
}

/// Upper-case the first letter of every word and lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            at_word_start = false;
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Split a full name into first name and the rest.
pub fn split_full_name(full_name: &str) -> (String, String) {
    let mut parts = full_name.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.next().unwrap_or_default().trim().to_string();
    (first, last)
}
