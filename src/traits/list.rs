//! List trait for fetching collections of entities.

use async_trait::async_trait;

use crate::client::PostureClient;
use crate::error::Result;
use crate::pagination::{Page, PageRequest};
use crate::paginator::Paginator;

/// List entities with offset pagination.
///
/// Implementors only provide [`fetch_page`](List::fetch_page); draining is
/// shared through [`Paginator`].
///
/// # Example
///
/// ```ignore
/// use postureapi::{PostureClient, Scope, List, PageRequest};
///
/// let client = PostureClient::from_env()?;
///
/// // Fetch a single page
/// let page = Scope::fetch_page(&client, &PageRequest::new().with_limit(50)).await?;
///
/// // Fetch all pages
/// let all_scopes = Scope::list_all(&client, PageRequest::new()).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send + 'static {
    /// Fetch the single page described by `request`.
    ///
    /// `offset`, `limit` and the filters are sent as query parameters and
    /// the response's `next` link becomes [`Page::next_offset`].
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request fails and a decode error if
    /// the body or its continuation link cannot be parsed.
    async fn fetch_page(client: &PostureClient, request: &PageRequest) -> Result<Page<Self>>;

    /// Iterate over pages starting at `request`.
    fn paginate(client: &PostureClient, request: PageRequest) -> Paginator<'_, Self> {
        Paginator::new(client, request)
    }

    /// List all entities from `request` onwards (fetches all pages).
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails. No partial result is
    /// returned.
    async fn list_all(client: &PostureClient, request: PageRequest) -> Result<Vec<Self>> {
        Self::paginate(client, request).collect_all().await
    }
}
