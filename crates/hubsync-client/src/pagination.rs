//! Page-number pagination driven by the API's `next` links.

use crate::error::{ClientError, Result};
use std::fmt;
use std::marker::PhantomData;
use url::Url;

/// Default number of records requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Maximum page size the API accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Position of the next page of one list endpoint.
///
/// The type parameter is the record type being paged, so a cursor obtained
/// from listing team members cannot be handed to a repository listing.
pub struct PageCursor<T> {
    page: u32,
    _records: PhantomData<fn() -> T>,
}

impl<T> PageCursor<T> {
    /// Cursor pointing at a 1-indexed page.
    pub fn new(page: u32) -> Result<Self> {
        if page == 0 {
            return Err(ClientError::InvalidCursor("page numbers start at 1".into()));
        }
        Ok(Self {
            page,
            _records: PhantomData,
        })
    }

    /// Page number this cursor resumes at.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// String form stored inside continuation tokens.
    pub fn marker(&self) -> String {
        self.page.to_string()
    }

    /// Inverse of [`PageCursor::marker`].
    pub fn from_marker(marker: &str) -> Result<Self> {
        let page = marker
            .parse::<u32>()
            .map_err(|_| ClientError::InvalidCursor(marker.to_string()))?;
        Self::new(page)
    }

    /// Build a cursor from the `next` field of a list response.
    ///
    /// Only the `page` query parameter is kept; the rest of the URL is dropped.
    /// Returns `None` when there is no next page.
    pub fn from_next_link(next: Option<&str>) -> Result<Option<Self>> {
        let link = match next {
            Some(link) if !link.trim().is_empty() => link,
            _ => return Ok(None),
        };

        let url = Url::parse(link).map_err(|e| ClientError::InvalidNextLink(format!("{link}: {e}")))?;
        let page = url
            .query_pairs()
            .find(|(key, _)| key == "page")
            .map(|(_, value)| value.into_owned())
            .ok_or_else(|| ClientError::InvalidNextLink(format!("{link}: missing page parameter")))?;

        page.parse::<u32>()
            .ok()
            .and_then(|page| Self::new(page).ok())
            .map(Some)
            .ok_or_else(|| ClientError::InvalidNextLink(format!("{link}: invalid page '{page}'")))
    }
}

impl<T> Clone for PageCursor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PageCursor<T> {}

impl<T> PartialEq for PageCursor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.page == other.page
    }
}

impl<T> Eq for PageCursor<T> {}

impl<T> fmt::Debug for PageCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageCursor").field("page", &self.page).finish()
    }
}

/// Page parameters for one list call.
pub struct PageRequest<T> {
    size: u32,
    cursor: Option<PageCursor<T>>,
}

impl<T> PageRequest<T> {
    /// Request the first page.
    pub fn first(size: u32) -> Self {
        Self::resume(None, size)
    }

    /// Request the page a cursor points at, or the first page without one.
    pub fn resume(cursor: Option<PageCursor<T>>, size: u32) -> Self {
        Self {
            size: size.clamp(1, MAX_PAGE_SIZE),
            cursor,
        }
    }

    /// Records per page, already clamped.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Cursor being resumed, `None` for the first page.
    pub fn cursor(&self) -> Option<PageCursor<T>> {
        self.cursor
    }

    /// Query parameters to append to the endpoint URL.
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page_size", self.size.to_string())];
        if let Some(cursor) = self.cursor {
            pairs.push(("page", cursor.page.to_string()));
        }
        pairs
    }
}

impl<T> fmt::Debug for PageRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageRequest")
            .field("size", &self.size)
            .field("cursor", &self.cursor)
            .finish()
    }
}

/// One page of records plus the cursor of the following page.
#[derive(Debug)]
pub struct Page<T> {
    /// Records in upstream order.
    pub items: Vec<T>,
    /// Total reported by the API.
    pub count: u64,
    /// `None` once the listing is exhausted.
    pub next: Option<PageCursor<T>>,
}
