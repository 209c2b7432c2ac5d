//! Lazy iteration over paged listing endpoints.
//!
//! A [`Pager`] owns a parameter implementing [`Paginated`] and a [`PageFetch`] that turns
//! that parameter into one [`Page`]. Items are pulled one at a time with [`Pager::next()`];
//! a page is requested only when the previously fetched one has been drained, so at most
//! one request is ever in flight and dropping the pager leaves nothing behind.

use crate::client::CteraError::Protocol;
use anyhow::Result;
use futures::Stream;
use futures::stream;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::VecDeque;
use std::future::Future;
use std::marker::PhantomData;

/// One page of a listing as returned by the server
#[derive(Deserialize, Debug)]
pub struct Page<T> {
    /// Whether another page exists past this one
    #[serde(rename = "hasMore", default)]
    pub has_more: bool,
    /// Entities of this page. Query endpoints name the field `objects`,
    /// resource listings name it `items`.
    #[serde(alias = "objects", default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(has_more: bool, items: Vec<T>) -> Self {
        Self { has_more, items }
    }
}

/// A request parameter carrying an offset that advances one page at a time
pub trait Paginated {
    /// Offset of the next page to request
    fn offset(&self) -> u64;

    /// Moves the offset forward by the configured page size
    fn advance(&mut self);
}

/// Fetches a single page for the given parameter
pub trait PageFetch {
    type Param: Paginated;
    type Item;

    fn fetch(
        &mut self,
        param: &Self::Param,
    ) -> impl Future<Output = Result<Page<Self::Item>>>;
}

/// [`PageFetch`] backed by a closure, see [`from_fn`]
pub struct FromFn<F, P, T> {
    f: F,
    _marker: PhantomData<fn(P) -> T>,
}

/// Wraps a closure receiving a snapshot of the parameter into a [`PageFetch`]
pub fn from_fn<F, Fut, P, T>(f: F) -> FromFn<F, P, T>
where
    F: FnMut(P) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
    P: Paginated + Clone,
{
    FromFn {
        f,
        _marker: PhantomData,
    }
}

impl<F, Fut, P, T> PageFetch for FromFn<F, P, T>
where
    F: FnMut(P) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
    P: Paginated + Clone,
{
    type Param = P;
    type Item = T;

    fn fetch(&mut self, param: &P) -> impl Future<Output = Result<Page<T>>> {
        (self.f)(param.clone())
    }
}

/// Observable lifecycle of a [`Pager`]. `Exhausted` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    /// Nothing fetched yet
    Idle,
    /// At least one page fetched, items may remain
    Buffering,
    /// Last page drained
    Exhausted,
    /// A fetch failed or the server broke the paging contract
    Failed,
}

/// Single-pass lazy sequence over every item of a paged listing
pub struct Pager<F: PageFetch> {
    fetcher: F,
    param: F::Param,
    buffer: VecDeque<F::Item>,
    has_more: bool,
    state: PagerState,
    fetches: usize,
}

impl<F: PageFetch> Pager<F> {
    pub fn new(fetcher: F, param: F::Param) -> Self {
        Self {
            fetcher,
            param,
            buffer: VecDeque::new(),
            has_more: true,
            state: PagerState::Idle,
            fetches: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> PagerState {
        self.state
    }

    /// Current parameter; its offset points at the next page to request
    #[must_use]
    pub fn param(&self) -> &F::Param {
        &self.param
    }

    /// Number of pages requested so far
    #[must_use]
    pub fn fetches(&self) -> usize {
        self.fetches
    }

    /// Returns the next item, fetching a page first when the buffer is drained.
    ///
    /// Returns `Ok(None)` once the listing is exhausted, and keeps doing so without
    /// contacting the server again.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The page fetch fails; the error is returned as is and the pager stops
    /// - The server reports more pages but returns two empty pages in a row
    pub async fn next(&mut self) -> Result<Option<F::Item>> {
        let mut empty_pages = 0u32;
        loop {
            match self.state {
                PagerState::Exhausted | PagerState::Failed => return Ok(None),
                PagerState::Buffering => {
                    if let Some(item) = self.buffer.pop_front() {
                        return Ok(Some(item));
                    }
                    if !self.has_more {
                        debug!("Listing exhausted after {} pages", self.fetches);
                        self.state = PagerState::Exhausted;
                        return Ok(None);
                    }
                }
                PagerState::Idle => {}
            }

            let page = match self.fetcher.fetch(&self.param).await {
                Ok(page) => page,
                Err(error) => {
                    self.state = PagerState::Failed;
                    return Err(error);
                }
            };
            self.fetches += 1;
            self.param.advance();
            self.has_more = page.has_more;

            if page.has_more && page.items.is_empty() {
                empty_pages += 1;
                if empty_pages > 1 {
                    self.state = PagerState::Failed;
                    return Err(Protocol(format!(
                        "server reported more results but returned {empty_pages} empty pages in a row"
                    ))
                    .into());
                }
                warn!(
                    "Empty page with more results pending. next start: {}",
                    self.param.offset()
                );
            }

            self.buffer.extend(page.items);
            self.state = PagerState::Buffering;
        }
    }

    /// Drains the pager into a vector
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`Self::next()`]
    pub async fn collect_all(mut self) -> Result<Vec<F::Item>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Adapts the pager into a [`Stream`] that ends after the first error
    pub fn into_stream(self) -> impl Stream<Item = Result<F::Item>> {
        stream::try_unfold(self, |mut pager| async move {
            let item = pager.next().await?;
            Ok::<_, anyhow::Error>(item.map(|item| (item, pager)))
        })
    }
}
