//! Async iterator for cursor-based query pagination.

use std::num::NonZeroU32;

use uuid::Uuid;

use crate::error::Error;
use crate::model::Key;
use crate::model::ZeroTime;
use crate::response::FetchResult;
use crate::FiapClient;

use super::builder::QueryBuilder;
use super::decode_page;
use super::validate;
use super::Page;
use super::QueryRequest;
use super::DEFAULT_ACCEPTABLE_SIZE;
use super::QUERY_OPERATION;

/// Async iterator that yields pages of query results.
///
/// Follows the server's cursor until it comes back empty. Requests are issued
/// one at a time and never retried. After an error, or after the last page,
/// `next()` returns `None`.
///
/// Inputs are validated on the first call to `next()`; a validation failure
/// is yielded before any request is made.
///
/// # Example
///
/// ```ignore
/// let mut pages = client.query(keys).into_async_iter();
///
/// while let Some(page) = pages.next().await {
///     let page = page?;
///     println!("page {} has more: {}", page.number(), page.has_more());
/// }
/// ```
pub struct QueryPages<'a> {
    /// Reference to the client for making requests.
    client: &'a FiapClient,
    /// Keys sent with every request.
    keys: Vec<Key>,
    acceptable_size: u32,
    zero_time: ZeroTime,
    max_pages: Option<usize>,
    /// Starting cursor as given by the caller, checked on the first call.
    start_cursor: Option<String>,
    /// Cursor from the last response.
    cursor: Option<Uuid>,
    /// Number of requests made so far.
    pages_fetched: usize,
    validated: bool,
    /// Whether we've exhausted all pages.
    done: bool,
}

impl<'a> QueryPages<'a> {
    /// Creates a new async iterator from a query builder.
    pub(crate) fn new(builder: QueryBuilder<'a>) -> Self {
        let client = builder.client();
        let acceptable_size = builder.acceptable_size_value();
        let zero_time = builder.zero_time_value();
        let max_pages = builder.max_pages_value();
        let (keys, start_cursor) = builder.into_parts();

        Self {
            client,
            keys,
            acceptable_size,
            zero_time,
            max_pages,
            start_cursor,
            cursor: None,
            pages_fetched: 0,
            validated: false,
            done: false,
        }
    }

    /// Fetches the next page of results.
    ///
    /// Returns `None` when all pages have been consumed.
    pub async fn next(&mut self) -> Option<Result<Page, Error>> {
        if self.done {
            return None;
        }

        if !self.validated {
            match validate(
                self.client.url(),
                &self.keys,
                self.start_cursor.as_deref(),
                self.acceptable_size,
            ) {
                Ok(cursor) => {
                    self.cursor = cursor;
                    self.validated = true;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }
        }

        if let Some(limit) = self.max_pages {
            if self.pages_fetched >= limit {
                self.done = true;
                return Some(Err(Error::PageLimit { limit }));
            }
        }

        match self.fetch_page().await {
            Ok(page) => {
                self.cursor = page.cursor();
                if !page.has_more() {
                    self.done = true;
                }
                Some(Ok(page))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }

    /// Fetches every remaining page and merges them into one result.
    ///
    /// Anything merged before a failing page is discarded.
    pub async fn collect(mut self) -> Result<FetchResult, Error> {
        let mut result = FetchResult::default();
        while let Some(page) = self.next().await {
            result.merge(page?);
        }
        log::debug!(
            "fetched {} pages: {} points, {} point-sets",
            result.pages(),
            result.points.len(),
            result.point_sets.len()
        );
        Ok(result)
    }

    /// Returns `true` once the last page has been yielded or an error occurred.
    pub fn is_done(&self) -> bool {
        self.done
    }

    async fn fetch_page(&mut self) -> Result<Page, Error> {
        let acceptable_size = NonZeroU32::new(self.acceptable_size).unwrap_or(DEFAULT_ACCEPTABLE_SIZE);
        let request = QueryRequest::new(acceptable_size, self.cursor, self.keys.clone())
            .with_zero_time(self.zero_time);

        self.pages_fetched += 1;
        log::debug!(
            "query page {} ({} keys, acceptableSize={}, cursor={:?}, request={})",
            self.pages_fetched,
            request.keys.len(),
            request.acceptable_size,
            request.cursor,
            request.id
        );

        let tree = self
            .client
            .transport()
            .call(self.client.url(), QUERY_OPERATION, &request)
            .await?;
        let page = decode_page(tree, QUERY_OPERATION)?;

        Ok(page.with_number(self.pages_fetched))
    }
}
