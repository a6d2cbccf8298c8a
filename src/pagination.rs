//! Pagination types for posture management API responses.
//!
//! Every list endpoint pages with `offset`/`limit` query parameters and
//! answers with a collection envelope holding `first`/`last`/`previous`/`next`
//! links. The `next` link is normalized into an integer offset; see
//! [`PageLink::offset`].

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::{PostureClient, ACCOUNT_ID_PARAM};
use crate::error::{PostureError, Result};

/// Query parameter carrying the page offset.
pub const OFFSET_PARAM: &str = "offset";
/// Query parameter carrying the page size.
pub const LIMIT_PARAM: &str = "limit";
/// Alternate name some endpoints use for the offset in their links.
const START_PARAM: &str = "start";

/// A page of results from a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Offset of the next page; `None` when this is the last page.
    pub next_offset: Option<u64>,
    /// Offset of this page as reported by the server.
    pub offset: Option<u64>,
    /// Page size as reported by the server.
    pub limit: Option<u32>,
    /// Total number of items across all pages (if known).
    pub total_count: Option<u64>,
}

impl<T> Page<T> {
    /// Create a page from items and the continuation offset.
    #[must_use]
    pub fn new(items: Vec<T>, next_offset: Option<u64>) -> Self {
        Self {
            items,
            next_offset,
            offset: None,
            limit: None,
            total_count: None,
        }
    }

    /// Whether the server reported more results after this page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next_offset.is_some()
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_offset: self.next_offset,
            offset: self.offset,
            limit: self.limit,
            total_count: self.total_count,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Parameters of a single list call.
///
/// `offset` of `None` starts from the beginning. `limit`, when set, must be
/// positive. Filters are passed through as query parameters unchanged.
///
/// # Example
///
/// ```
/// use postureapi::PageRequest;
///
/// let request = PageRequest::new()
///     .with_limit(25)
///     .with_filter("name", "prod");
/// assert_eq!(request.offset, None);
/// assert_eq!(request.limit, Some(25));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Where the page starts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    /// Maximum number of items on the page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Endpoint-specific filter parameters.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, String>,
}

impl PageRequest {
    /// A request for the first page with server-default size.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the offset.
    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the page size.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Add a filter parameter.
    #[must_use]
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// The same request positioned at another offset.
    #[must_use]
    pub fn at_offset(&self, offset: u64) -> Self {
        Self {
            offset: Some(offset),
            ..self.clone()
        }
    }

    /// Query parameters for this request.
    ///
    /// # Errors
    ///
    /// Returns [`PostureError::InvalidRequest`] when `limit` is zero or a
    /// filter shadows the `offset`, `limit` or `account_id` parameters.
    pub fn query_pairs(&self) -> Result<Vec<(String, String)>> {
        if self.limit == Some(0) {
            return Err(PostureError::InvalidRequest(
                "page limit must be positive".to_string(),
            ));
        }

        let mut pairs = Vec::with_capacity(self.filters.len() + 2);
        for (key, value) in &self.filters {
            if key == OFFSET_PARAM || key == LIMIT_PARAM {
                return Err(PostureError::InvalidRequest(format!(
                    "'{key}' is a pagination parameter, not a filter"
                )));
            }
            if key == ACCOUNT_ID_PARAM {
                return Err(PostureError::InvalidRequest(format!(
                    "'{key}' is set through ClientConfig::with_account_id, not a filter"
                )));
            }
            pairs.push((key.clone(), value.clone()));
        }
        if let Some(offset) = self.offset {
            pairs.push((OFFSET_PARAM.to_string(), offset.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push((LIMIT_PARAM.to_string(), limit.to_string()));
        }
        Ok(pairs)
    }
}

/// A link object in a collection envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    /// URL of the linked page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Continuation token, used by some endpoints instead of an href offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
}

impl PageLink {
    /// Link pointing at `href`.
    pub fn from_href(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            start: None,
        }
    }

    /// Offset of the linked page.
    ///
    /// A `start` token wins over the href. Otherwise the href's `offset`
    /// query parameter is used, falling back to `start`. Relative hrefs are
    /// accepted.
    ///
    /// # Errors
    ///
    /// Returns [`PostureError::InvalidCursor`] when no offset can be found
    /// or it is not an unsigned integer.
    pub fn offset(&self) -> Result<u64> {
        if let Some(start) = &self.start {
            return parse_offset(start, start);
        }

        let href = self.href.as_deref().ok_or_else(|| PostureError::InvalidCursor {
            cursor: String::new(),
            reason: "link has neither href nor start".to_string(),
        })?;

        let url = parse_href(href)?;
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let value = [OFFSET_PARAM, START_PARAM].iter().find_map(|name| {
            pairs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        });

        match value {
            Some(value) => parse_offset(href, value),
            None => Err(PostureError::InvalidCursor {
                cursor: href.to_string(),
                reason: "href has no offset parameter".to_string(),
            }),
        }
    }
}

fn parse_href(href: &str) -> Result<Url> {
    match Url::parse(href) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            // Only the query matters, so any base will do.
            let base = Url::parse("http://localhost/")?;
            base.join(href).map_err(|e| PostureError::InvalidCursor {
                cursor: href.to_string(),
                reason: e.to_string(),
            })
        }
        Err(e) => Err(PostureError::InvalidCursor {
            cursor: href.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn parse_offset(cursor: &str, value: &str) -> Result<u64> {
    value.parse().map_err(|_| PostureError::InvalidCursor {
        cursor: cursor.to_string(),
        reason: format!("'{value}' is not an unsigned integer offset"),
    })
}

/// Pagination metadata shared by every list response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Collection {
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<PageLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<PageLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<PageLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
}

impl Collection {
    /// Combine this metadata with the decoded items into a [`Page`].
    ///
    /// # Errors
    ///
    /// Returns [`PostureError::InvalidCursor`] when the `next` link is
    /// present but does not hold a valid offset.
    pub fn into_page<T>(self, items: Vec<T>) -> Result<Page<T>> {
        let next_offset = self.next.as_ref().map(PageLink::offset).transpose()?;
        Ok(Page {
            items,
            next_offset,
            offset: self.offset,
            limit: self.limit,
            total_count: self.total_count,
        })
    }
}

/// Issue a GET for one page of a collection and decode the envelope.
pub(crate) async fn fetch_collection<R: DeserializeOwned>(
    client: &PostureClient,
    path: &str,
    request: &PageRequest,
) -> Result<R> {
    let query = request.query_pairs()?;
    let response = client.get_with_query(path, &query).await?;
    PostureClient::decode(response).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_has_more() {
        let page: Page<i32> = Page::new(vec![1, 2], Some(2));
        assert!(page.has_more());

        let page: Page<i32> = Page::new(vec![3], None);
        assert!(!page.has_more());
    }

    #[test]
    fn test_page_map() {
        let page = Page::new(vec![1, 2, 3], Some(3));
        let mapped = page.map(|x| x * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.next_offset, Some(3));
    }

    #[test]
    fn test_query_pairs_order_and_content() {
        let request = PageRequest::new()
            .with_offset(10)
            .with_limit(5)
            .with_filter("scope_id", "s1")
            .with_filter("profile_id", "p1");

        let pairs = request.query_pairs().unwrap();
        assert_eq!(
            pairs,
            vec![
                ("profile_id".to_string(), "p1".to_string()),
                ("scope_id".to_string(), "s1".to_string()),
                ("offset".to_string(), "10".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_rejects_zero_limit() {
        let err = PageRequest::new().with_limit(0).query_pairs().unwrap_err();
        assert!(matches!(err, PostureError::InvalidRequest(_)));
    }

    #[test]
    fn test_query_pairs_rejects_shadowing_filter() {
        let err = PageRequest::new()
            .with_filter("offset", "3")
            .query_pairs()
            .unwrap_err();
        assert!(matches!(err, PostureError::InvalidRequest(_)));
    }

    #[test]
    fn test_query_pairs_rejects_account_id_filter() {
        let err = PageRequest::new()
            .with_filter("account_id", "other")
            .query_pairs()
            .unwrap_err();
        assert!(matches!(err, PostureError::InvalidRequest(_)));
    }

    #[test]
    fn test_at_offset_preserves_other_fields() {
        let request = PageRequest::new().with_limit(7).with_filter("name", "x");
        let next = request.at_offset(14);
        assert_eq!(next.offset, Some(14));
        assert_eq!(next.limit, Some(7));
        assert_eq!(next.filters, request.filters);
    }

    #[test]
    fn test_page_request_serializes_like_query() {
        let request = PageRequest::new().with_offset(4).with_limit(2);
        let serialized = serde_qs::to_string(&request).unwrap();
        assert_eq!(serialized, "offset=4&limit=2");
    }

    #[test]
    fn test_link_offset_from_absolute_href() {
        let link = PageLink::from_href(
            "https://example.com/posture/v2/credentials?account_id=a&offset=50&limit=50",
        );
        assert_eq!(link.offset().unwrap(), 50);
    }

    #[test]
    fn test_link_offset_from_relative_href() {
        let link = PageLink::from_href("/posture/v2/scopes?limit=1&offset=2");
        assert_eq!(link.offset().unwrap(), 2);
    }

    #[test]
    fn test_link_offset_from_start_param_in_href() {
        let link = PageLink::from_href("/posture/v2/scans/validations/summaries?start=30");
        assert_eq!(link.offset().unwrap(), 30);
    }

    #[test]
    fn test_link_start_token_wins() {
        let link = PageLink {
            href: Some("/x?offset=10".to_string()),
            start: Some("20".to_string()),
        };
        assert_eq!(link.offset().unwrap(), 20);
    }

    #[test]
    fn test_link_non_numeric_offset_is_decode_error() {
        let link = PageLink::from_href("/posture/v2/credentials?offset=abc");
        let err = link.offset().unwrap_err();
        assert!(err.is_decode());
        assert!(matches!(err, PostureError::InvalidCursor { .. }));
    }

    #[test]
    fn test_link_without_offset_is_decode_error() {
        let link = PageLink::from_href("https://example.com/posture/v2/credentials?limit=5");
        assert!(link.offset().unwrap_err().is_decode());

        let empty = PageLink::default();
        assert!(empty.offset().unwrap_err().is_decode());
    }

    #[test]
    fn test_collection_into_page() {
        let collection: Collection = serde_json::from_value(serde_json::json!({
            "offset": 0,
            "limit": 2,
            "total_count": 5,
            "first": { "href": "/posture/v2/scopes?offset=0&limit=2" },
            "next": { "href": "/posture/v2/scopes?offset=2&limit=2" }
        }))
        .unwrap();

        let page = collection.into_page(vec!["a", "b"]).unwrap();
        assert_eq!(page.next_offset, Some(2));
        assert_eq!(page.total_count, Some(5));
        assert_eq!(page.limit, Some(2));
    }

    #[test]
    fn test_collection_without_next_is_last_page() {
        let collection: Collection = serde_json::from_value(serde_json::json!({
            "offset": 4,
            "limit": 2,
            "total_count": 5
        }))
        .unwrap();

        let page = collection.into_page(vec!["e"]).unwrap();
        assert!(!page.has_more());
    }
}
