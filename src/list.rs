//! Paginated list controller
//!
//! Owns the incremental-loading state of one rendered list: the items shown so
//! far, the current page, the total page count and an optional page-fetch
//! function. Advancing fetches `page + 1` and appends its items in fetch order.
//!
//! Advancing is split in two so the fetch can run on another task while the
//! list stays owned by its view:
//!
//! ```ignore
//! if let Some(request) = list.begin_advance() {
//!     let result = request.run().await;   // anywhere, e.g. a spawned task
//!     list.complete(result)?;             // back on the owning side
//! }
//! ```
//!
//! [`PaginatedList::advance`] does both in place.

use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

use crate::models::Paginated;

/// Boxed future returned by a page-fetch function
pub type PageFuture<T> = BoxFuture<'static, anyhow::Result<Vec<T>>>;

/// Maps a page number to the items on that page
pub type PageFn<T> = Arc<dyn Fn(u32) -> PageFuture<T> + Send + Sync>;

/// Wrap an async closure as a [`PageFn`]
pub fn page_fn<T, F, Fut>(f: F) -> PageFn<T>
where
    F: Fn(u32) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Vec<T>>> + Send + 'static,
{
    Arc::new(move |page| f(page).boxed())
}

// =============================================================================
// Status
// =============================================================================

/// Lifecycle of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStatus {
    /// More pages exist and nothing is in flight
    Idle,
    /// A page fetch is in flight
    Loading,
    /// The last page has been loaded
    Exhausted,
}

/// What to render under the last item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Footer {
    LoadMore,
    Loading,
    NoMoreResults,
    NoResultsFound,
}

impl Footer {
    pub fn label(&self) -> &'static str {
        match self {
            Footer::LoadMore => "Load More",
            Footer::Loading => "Loading...",
            Footer::NoMoreResults => "No more results",
            Footer::NoResultsFound => "No results found",
        }
    }
}

impl fmt::Display for Footer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of an advance that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// `count` items from `page` were appended
    Appended { page: u32, count: usize },
    /// Already loading, or no pages left
    Ignored,
    /// The list was reset while the page was in flight; the items were dropped
    Stale,
}

/// A page fetch was rejected. The list is back to `Idle` on the same page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to load page {page}: {message}")]
pub struct PageError {
    pub page: u32,
    pub message: String,
}

// =============================================================================
// Requests
// =============================================================================

/// A page fetch handed out by [`PaginatedList::begin_advance`]
pub struct PageRequest<T> {
    pub page: u32,
    epoch: u64,
    fetch: Option<PageFn<T>>,
}

impl<T> PageRequest<T> {
    /// Run the fetch. Without a fetch function the page is empty.
    pub async fn run(self) -> PageResult<T> {
        let items = match &self.fetch {
            Some(fetch) => fetch(self.page).await,
            None => Ok(Vec::new()),
        };
        PageResult {
            page: self.page,
            epoch: self.epoch,
            items,
        }
    }
}

impl<T> fmt::Debug for PageRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageRequest")
            .field("page", &self.page)
            .field("epoch", &self.epoch)
            .field("has_fetch", &self.fetch.is_some())
            .finish()
    }
}

/// Result of running a [`PageRequest`], fed back through [`PaginatedList::complete`]
#[derive(Debug)]
pub struct PageResult<T> {
    pub page: u32,
    epoch: u64,
    pub items: anyhow::Result<Vec<T>>,
}

/// Everything needed to (re)seed a list: page 1 and how to get the rest
pub struct ListSeed<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
    pub fetch: Option<PageFn<T>>,
}

impl<T> ListSeed<T> {
    pub fn new(items: Vec<T>, total_pages: u32, fetch: Option<PageFn<T>>) -> Self {
        Self {
            items,
            total_pages,
            fetch,
        }
    }

    /// Seed from a first-page envelope
    pub fn from_page(page: Paginated<T>, fetch: Option<PageFn<T>>) -> Self {
        Self::new(page.results, page.total_pages, fetch)
    }

    /// A single-page seed that never fetches
    pub fn fixed(items: Vec<T>) -> Self {
        Self::new(items, 1, None)
    }
}

impl<T> fmt::Debug for ListSeed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListSeed")
            .field("items", &self.items.len())
            .field("total_pages", &self.total_pages)
            .field("has_fetch", &self.fetch.is_some())
            .finish()
    }
}

// =============================================================================
// Controller
// =============================================================================

pub struct PaginatedList<T> {
    items: Vec<T>,
    page: u32,
    total_pages: u32,
    status: ListStatus,
    fetch: Option<PageFn<T>>,
    epoch: u64,
    last_error: Option<PageError>,
}

impl<T> PaginatedList<T> {
    /// Seed with page 1. Starts `Idle` if more pages exist, else `Exhausted`.
    pub fn new(items: Vec<T>, total_pages: u32, fetch: Option<PageFn<T>>) -> Self {
        Self {
            items,
            page: 1,
            total_pages,
            status: settled(1, total_pages),
            fetch,
            epoch: 0,
            last_error: None,
        }
    }

    pub fn from_seed(seed: ListSeed<T>) -> Self {
        Self::new(seed.items, seed.total_pages, seed.fetch)
    }

    /// No items, one page: renders "No results found"
    pub fn empty() -> Self {
        Self::new(Vec::new(), 1, None)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn status(&self) -> ListStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == ListStatus::Loading
    }

    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn last_error(&self) -> Option<&PageError> {
        self.last_error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    pub fn footer(&self) -> Footer {
        if self.status == ListStatus::Loading {
            Footer::Loading
        } else if self.has_more() {
            Footer::LoadMore
        } else if self.items.is_empty() {
            Footer::NoResultsFound
        } else {
            Footer::NoMoreResults
        }
    }

    /// Start loading the next page. `None` while a fetch is in flight or when
    /// every page is loaded.
    pub fn begin_advance(&mut self) -> Option<PageRequest<T>> {
        if self.status == ListStatus::Loading || !self.has_more() {
            tracing::debug!(
                page = self.page,
                total_pages = self.total_pages,
                status = ?self.status,
                "advance ignored"
            );
            return None;
        }

        self.status = ListStatus::Loading;
        self.last_error = None;
        Some(PageRequest {
            page: self.page + 1,
            epoch: self.epoch,
            fetch: self.fetch.clone(),
        })
    }

    /// Apply a finished fetch
    pub fn complete(&mut self, result: PageResult<T>) -> Result<Advance, PageError> {
        if result.epoch != self.epoch || self.status != ListStatus::Loading {
            tracing::debug!(page = result.page, "dropping page fetched before reset");
            return Ok(Advance::Stale);
        }

        match result.items {
            Ok(mut items) => {
                let count = items.len();
                self.items.append(&mut items);
                self.page = result.page;
                self.status = settled(self.page, self.total_pages);
                Ok(Advance::Appended {
                    page: result.page,
                    count,
                })
            }
            Err(e) => {
                let error = PageError {
                    page: result.page,
                    message: format!("{:#}", e),
                };
                tracing::warn!(page = result.page, error = %error.message, "page fetch failed");
                self.status = ListStatus::Idle;
                self.last_error = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Fetch and append the next page in place
    pub async fn advance(&mut self) -> Result<Advance, PageError> {
        match self.begin_advance() {
            Some(request) => {
                let result = request.run().await;
                self.complete(result)
            }
            None => Ok(Advance::Ignored),
        }
    }

    /// Scroll trigger: the element just past the last item. When it falls
    /// inside the viewport `[first_visible, first_visible + rows)` the next
    /// page is requested.
    pub fn trigger_in_view(
        &mut self,
        first_visible: usize,
        rows: usize,
    ) -> Option<PageRequest<T>> {
        let trigger = self.items.len();
        if rows > 0 && trigger >= first_visible && trigger < first_visible + rows {
            self.begin_advance()
        } else {
            None
        }
    }

    /// Replace everything with a new page 1. Never starts a fetch; anything
    /// still in flight is dropped when it completes.
    pub fn reset(&mut self, items: Vec<T>, total_pages: u32, fetch: Option<PageFn<T>>) {
        self.items = items;
        self.page = 1;
        self.total_pages = total_pages;
        self.status = settled(1, total_pages);
        self.fetch = fetch;
        self.epoch += 1;
        self.last_error = None;
    }

    pub fn reseed(&mut self, seed: ListSeed<T>) {
        self.reset(seed.items, seed.total_pages, seed.fetch);
    }
}

impl<T> Default for PaginatedList<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> fmt::Debug for PaginatedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginatedList")
            .field("items", &self.items.len())
            .field("page", &self.page)
            .field("total_pages", &self.total_pages)
            .field("status", &self.status)
            .field("epoch", &self.epoch)
            .field("last_error", &self.last_error)
            .finish()
    }
}

fn settled(page: u32, total_pages: u32) -> ListStatus {
    if page < total_pages {
        ListStatus::Idle
    } else {
        ListStatus::Exhausted
    }
}
