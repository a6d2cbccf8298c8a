//! Sequential page-by-page iteration over a list endpoint.

use std::marker::PhantomData;

use futures::{stream, Stream, TryStreamExt};

use crate::client::PostureClient;
use crate::error::{PostureError, Result};
use crate::pagination::{Page, PageRequest};
use crate::traits::List;

/// Drives repeated calls of [`List::fetch_page`].
///
/// Each request is the previous one with `offset` replaced by the previous
/// page's `next_offset`; limit and filters never change. Iteration ends when
/// a page has no `next_offset` or no items. Pages are fetched one at a time,
/// each only after the previous one has been returned.
///
/// Any error ends the iteration. A paginator cannot be restarted; build a
/// new one from [`resume_offset`](Self::resume_offset) to continue after a
/// failure.
///
/// # Example
///
/// ```no_run
/// use futures::TryStreamExt;
/// use postureapi::{Credential, List, PageRequest, PostureClient};
///
/// # async fn example() -> postureapi::Result<()> {
/// let client = PostureClient::from_env()?;
/// let mut pages = Credential::paginate(&client, PageRequest::new().with_limit(50));
///
/// while let Some(page) = pages.next_page().await? {
///     for credential in &page {
///         println!("{}", credential.name);
///     }
/// }
///
/// // Or as a stream of items
/// let names: Vec<String> = Credential::paginate(&client, PageRequest::new())
///     .items()
///     .map_ok(|c| c.name)
///     .try_collect()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Paginator<'a, T> {
    client: &'a PostureClient,
    request: PageRequest,
    exhausted: bool,
    failed: bool,
    _item: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for Paginator<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("request", &self.request)
            .field("exhausted", &self.exhausted)
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}

impl<'a, T: List> Paginator<'a, T> {
    /// Start paginating from `request`.
    pub fn new(client: &'a PostureClient, request: PageRequest) -> Self {
        Self {
            client,
            request,
            exhausted: false,
            failed: false,
            _item: PhantomData,
        }
    }

    /// The request the next fetch will send.
    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    /// Whether iteration has ended, successfully or not.
    pub fn is_done(&self) -> bool {
        self.exhausted || self.failed
    }

    /// Offset to restart from, or `None` once every page has been fetched.
    ///
    /// After a failure this is the offset of the page that failed, which is
    /// the `next_offset` of the last page fetched successfully.
    pub fn resume_offset(&self) -> Option<u64> {
        if self.exhausted {
            None
        } else {
            Some(self.request.offset.unwrap_or(0))
        }
    }

    /// Fetch the next page.
    ///
    /// Returns `Ok(None)` once iteration has ended.
    ///
    /// # Errors
    ///
    /// Propagates transport and decode errors from the fetch unchanged, and
    /// fails with [`PostureError::InvalidCursor`] when the server's
    /// continuation does not move past the current offset.
    pub async fn next_page(&mut self) -> Result<Option<Page<T>>> {
        if self.is_done() {
            return Ok(None);
        }

        let page = match T::fetch_page(self.client, &self.request).await {
            Ok(page) => page,
            Err(e) => {
                self.failed = true;
                return Err(e);
            }
        };

        tracing::debug!(
            offset = ?self.request.offset,
            items = page.len(),
            next_offset = ?page.next_offset,
            "fetched page"
        );

        match page.next_offset {
            Some(next) if !page.is_empty() => {
                let current = self.request.offset.unwrap_or(0);
                if next <= current {
                    self.failed = true;
                    return Err(PostureError::InvalidCursor {
                        cursor: next.to_string(),
                        reason: format!("next offset does not advance past {current}"),
                    });
                }
                self.request.offset = Some(next);
            }
            _ => self.exhausted = true,
        }

        Ok(Some(page))
    }

    /// Turn this paginator into a stream of pages.
    pub fn pages(self) -> impl Stream<Item = Result<Page<T>>> + Send + 'a {
        stream::try_unfold(self, |mut paginator| async move {
            let page = paginator.next_page().await?;
            Ok::<_, PostureError>(page.map(|page| (page, paginator)))
        })
    }

    /// Turn this paginator into a stream of items across all pages.
    pub fn items(self) -> impl Stream<Item = Result<T>> + Send + 'a {
        self.pages()
            .map_ok(|page| stream::iter(page.items.into_iter().map(Ok::<T, PostureError>)))
            .try_flatten()
    }

    /// Fetch every remaining page and collect the items.
    ///
    /// # Errors
    ///
    /// Fails on the first failing page; items already fetched are discarded.
    pub async fn collect_all(self) -> Result<Vec<T>> {
        self.items().try_collect().await
    }
}
