//! Query builder.

use uuid::Uuid;

use crate::error::Error;
use crate::error::ValidationError;
use crate::model::Key;
use crate::model::ZeroTime;
use crate::response::FetchResult;
use crate::FiapClient;

use super::pages::QueryPages;
use super::validate;
use super::Page;

/// Builder for a paginated FIAP query.
///
/// Use [`FiapClient::query`] to create a query builder. Settings left unset
/// fall back to the client's defaults.
///
/// # Example
///
/// ```ignore
/// let result = client
///     .query([Key::new("http://example.org/point/1").latest()])
///     .acceptable_size(500)
///     .fetch()
///     .await?;
///
/// for (id, values) in &result.points {
///     println!("{}: {} values", id, values.len());
/// }
/// ```
pub struct QueryBuilder<'a> {
    client: &'a FiapClient,
    keys: Vec<Key>,
    acceptable_size: Option<u32>,
    cursor: Option<String>,
    zero_time: Option<ZeroTime>,
    max_pages: Option<usize>,
}

impl<'a> QueryBuilder<'a> {
    /// Creates a new query builder for the given keys.
    pub(crate) fn new(client: &'a FiapClient, keys: Vec<Key>) -> Self {
        Self {
            client,
            keys,
            acceptable_size: None,
            cursor: None,
            zero_time: None,
            max_pages: None,
        }
    }

    /// Adds another key.
    pub fn key(mut self, key: Key) -> Self {
        self.keys.push(key);
        self
    }

    /// Adds several keys, keeping their order.
    pub fn keys(mut self, keys: impl IntoIterator<Item = Key>) -> Self {
        self.keys.extend(keys);
        self
    }

    /// Sets the maximum number of values per page.
    ///
    /// Must be at least 1. Defaults to the client's setting (1000 unless changed).
    pub fn acceptable_size(mut self, size: u32) -> Self {
        self.acceptable_size = Some(size);
        self
    }

    /// Resumes from a cursor returned by an earlier page.
    ///
    /// An empty string means "start from the first page".
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Sets how epoch timestamps in the keys are written.
    pub fn zero_time(mut self, zero_time: ZeroTime) -> Self {
        self.zero_time = Some(zero_time);
        self
    }

    /// Stops with [`Error::PageLimit`] if more than `max` pages would be needed.
    pub fn max_pages(mut self, max: usize) -> Self {
        self.max_pages = Some(max);
        self
    }

    /// Checks the inputs without making any request.
    ///
    /// Returns the parsed starting cursor on success.
    pub fn validate(&self) -> Result<Option<Uuid>, ValidationError> {
        validate(
            self.client.url(),
            &self.keys,
            self.cursor.as_deref(),
            self.acceptable_size_value(),
        )
    }

    pub(crate) fn client(&self) -> &'a FiapClient {
        self.client
    }

    pub(crate) fn acceptable_size_value(&self) -> u32 {
        self.acceptable_size
            .unwrap_or_else(|| self.client.acceptable_size())
    }

    pub(crate) fn zero_time_value(&self) -> ZeroTime {
        self.zero_time.unwrap_or_else(|| self.client.zero_time())
    }

    pub(crate) fn max_pages_value(&self) -> Option<usize> {
        self.max_pages.or_else(|| self.client.max_pages())
    }

    pub(crate) fn into_parts(self) -> (Vec<Key>, Option<String>) {
        (self.keys, self.cursor)
    }

    /// Executes the query and returns the first page only.
    ///
    /// Use [`Page::cursor`] to continue, or `fetch()` to get everything.
    pub async fn execute(self) -> Result<Page, Error> {
        let mut pages = self.into_async_iter();
        match pages.next().await {
            Some(result) => result,
            None => Ok(Page::default()),
        }
    }

    /// Fetches every page and merges them into one result.
    ///
    /// All-or-nothing: if any page fails, the pages merged so far are dropped
    /// and the error is returned.
    pub async fn fetch(self) -> Result<FetchResult, Error> {
        self.into_async_iter().collect().await
    }

    /// Converts this query builder into an async iterator over pages.
    pub fn into_async_iter(self) -> QueryPages<'a> {
        QueryPages::new(self)
    }
}
