//! Opaque continuation tokens for nested enumerations.
//!
//! A token is a stack of page states, one per enclosing enumeration, encoded
//! as URL-safe base64 over JSON. The top of the stack is the enumeration in
//! progress. Callers store and replay tokens; they never look inside.

use crate::error::{ConnectorError, Result};
use crate::model::ResourceId;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hubsync_client::{PageCursor, PageRequest};
use serde::{Deserialize, Serialize};

/// Which enumeration a page state belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageScope {
    /// Resource type being enumerated.
    pub resource_type_id: String,
    /// Resource the enumeration is under, when it has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

impl PageScope {
    /// Scope for listing a resource type.
    pub fn resource_type(resource_type_id: impl Into<String>) -> Self {
        Self {
            resource_type_id: resource_type_id.into(),
            resource_id: None,
        }
    }

    /// Scope for listing a resource type beneath `parent`.
    ///
    /// Child listings of different parents hit different endpoints, so their
    /// tokens must not be interchangeable.
    pub fn children(resource_type_id: impl Into<String>, parent: &ResourceId) -> Self {
        Self::resource(resource_type_id, parent.to_string())
    }

    /// Scope for enumerating under a specific resource.
    pub fn resource(resource_type_id: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            resource_type_id: resource_type_id.into(),
            resource_id: Some(resource_id.into()),
        }
    }
}

/// Last-seen page marker of one enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    #[serde(flatten)]
    pub scope: PageScope,
    /// `None` means the first page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
}

/// Stack of page states carried through a continuation token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBag {
    states: Vec<PageState>,
}

impl PageBag {
    /// Decode `token` for the enumeration described by `scope`.
    ///
    /// An empty token starts a fresh stack at the first page. A non-empty
    /// token must decode and its top state must belong to `scope`; anything
    /// else is an error, never a silent restart.
    pub fn parse(token: &str, scope: PageScope) -> Result<(Self, Option<String>)> {
        if token.is_empty() {
            let mut bag = Self::default();
            bag.push(scope);
            return Ok((bag, None));
        }

        let bag = Self::unmarshal(token)?;
        let current = bag
            .current()
            .ok_or_else(|| ConnectorError::InvalidPageToken("token has no page state".into()))?;

        if current.scope != scope {
            return Err(ConnectorError::InvalidPageToken(format!(
                "token belongs to {}{}, expected {}{}",
                current.scope.resource_type_id,
                describe(&current.scope.resource_id),
                scope.resource_type_id,
                describe(&scope.resource_id),
            )));
        }

        let page = current.page.clone();
        Ok((bag, page))
    }

    /// Begin a nested enumeration at its first page.
    pub fn push(&mut self, scope: PageScope) {
        self.states.push(PageState { scope, page: None });
    }

    /// Drop the enumeration in progress.
    pub fn pop(&mut self) -> Option<PageState> {
        self.states.pop()
    }

    /// Enumeration in progress.
    pub fn current(&self) -> Option<&PageState> {
        self.states.last()
    }

    /// Number of nested enumerations.
    pub fn depth(&self) -> usize {
        self.states.len()
    }

    /// Record where the current enumeration continues and encode the token.
    ///
    /// With no next page the current enumeration is finished: it is popped,
    /// and the token resumes the enclosing one, or is empty when none is left.
    pub fn next_token(mut self, next_page: Option<&str>) -> Result<String> {
        match next_page.filter(|page| !page.is_empty()) {
            Some(page) => match self.states.last_mut() {
                Some(state) => state.page = Some(page.to_string()),
                None => {
                    return Err(ConnectorError::InvalidPageToken(
                        "no enumeration in progress".into(),
                    ))
                }
            },
            None => {
                self.pop();
            }
        }

        self.marshal()
    }

    fn marshal(&self) -> Result<String> {
        if self.states.is_empty() {
            return Ok(String::new());
        }
        let json = serde_json::to_vec(self)
            .map_err(|e| ConnectorError::Serialization(e.to_string()))?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    fn unmarshal(token: &str) -> Result<Self> {
        let json = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| ConnectorError::InvalidPageToken(format!("not base64: {e}")))?;
        serde_json::from_slice(&json)
            .map_err(|e| ConnectorError::InvalidPageToken(format!("malformed state: {e}")))
    }
}

/// Client page request resuming at a page marker taken from a token.
pub(crate) fn page_request<T>(page: Option<&str>, size: u32) -> Result<PageRequest<T>> {
    let cursor = page
        .map(PageCursor::from_marker)
        .transpose()
        .map_err(|e| ConnectorError::InvalidPageToken(e.to_string()))?;
    Ok(PageRequest::resume(cursor, size))
}

fn describe(resource_id: &Option<String>) -> String {
    resource_id
        .as_ref()
        .map(|id| format!(" {id}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_token_starts_at_first_page() {
        let (bag, page) = PageBag::parse("", PageScope::resource_type("team")).unwrap();
        assert_eq!(page, None);
        assert_eq!(bag.depth(), 1);
    }

    #[test]
    fn test_exhausted_enumeration_yields_empty_token() {
        let (bag, _) = PageBag::parse("", PageScope::resource_type("team")).unwrap();
        assert_eq!(bag.clone().next_token(None).unwrap(), "");
        assert_eq!(bag.next_token(Some("")).unwrap(), "");
    }

    #[test]
    fn test_next_token_round_trip() {
        let scope = PageScope::resource("team", "7");
        let (bag, _) = PageBag::parse("", scope.clone()).unwrap();
        let token = bag.next_token(Some("3")).unwrap();
        assert!(!token.is_empty());

        let (bag, page) = PageBag::parse(&token, scope).unwrap();
        assert_eq!(page.as_deref(), Some("3"));
        assert_eq!(bag.depth(), 1);
    }

    #[test]
    fn test_nested_enumeration_resumes_parent() {
        let (mut bag, _) = PageBag::parse("", PageScope::resource_type("team")).unwrap();
        let outer = bag.clone().next_token(Some("2")).unwrap();
        let (mut outer_bag, _) = PageBag::parse(&outer, PageScope::resource_type("team")).unwrap();

        outer_bag.push(PageScope::resource("team", "7"));
        let inner = outer_bag.next_token(Some("5")).unwrap();
        let (inner_bag, page) = PageBag::parse(&inner, PageScope::resource("team", "7")).unwrap();
        assert_eq!(page.as_deref(), Some("5"));
        assert_eq!(inner_bag.depth(), 2);

        // Inner listing finished: token now resumes the outer one at page 2.
        let resumed = inner_bag.next_token(None).unwrap();
        let (_, page) = PageBag::parse(&resumed, PageScope::resource_type("team")).unwrap();
        assert_eq!(page.as_deref(), Some("2"));

        bag.pop();
        assert_eq!(bag.depth(), 0);
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        for token in ["%%%", "bm90IGpzb24", "e30"] {
            let err = PageBag::parse(token, PageScope::resource_type("user")).unwrap_err();
            assert!(matches!(err, ConnectorError::InvalidPageToken(_)), "{token}");
        }
    }

    #[test]
    fn test_token_from_another_scope_is_rejected() {
        let (bag, _) = PageBag::parse("", PageScope::resource("team", "7")).unwrap();
        let token = bag.next_token(Some("2")).unwrap();

        assert!(PageBag::parse(&token, PageScope::resource_type("repository")).is_err());
        assert!(PageBag::parse(&token, PageScope::resource("team", "8")).is_err());
    }

    #[test]
    fn test_child_scopes_are_tied_to_their_parent() {
        let acme = ResourceId::new("org", "acme");
        let globex = ResourceId::new("org", "globex");
        let (bag, _) = PageBag::parse("", PageScope::children("team", &acme)).unwrap();
        let token = bag.next_token(Some("2")).unwrap();

        assert!(PageBag::parse(&token, PageScope::children("team", &acme)).is_ok());
        assert!(matches!(
            PageBag::parse(&token, PageScope::children("team", &globex)),
            Err(ConnectorError::InvalidPageToken(_))
        ));
        assert!(PageBag::parse(&token, PageScope::resource_type("team")).is_err());
    }

    #[test]
    fn test_page_request_from_marker() {
        let request = page_request::<hubsync_client::User>(Some("4"), 25).unwrap();
        assert_eq!(request.cursor().map(|c| c.page()), Some(4));
        assert_eq!(request.size(), 25);

        assert!(page_request::<hubsync_client::User>(None, 25)
            .unwrap()
            .cursor()
            .is_none());
        assert!(matches!(
            page_request::<hubsync_client::User>(Some("next"), 25),
            Err(ConnectorError::InvalidPageToken(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_page_marker_round_trips(marker in "[0-9a-zA-Z_-]{1,24}", resource in "[a-z0-9]{1,12}") {
            let scope = PageScope::resource("repository", resource);
            let (bag, _) = PageBag::parse("", scope.clone()).unwrap();
            let token = bag.next_token(Some(&marker)).unwrap();
            let (_, page) = PageBag::parse(&token, scope).unwrap();
            prop_assert_eq!(page, Some(marker));
        }
    }
}
