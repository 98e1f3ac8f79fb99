//! Main FiapClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::api::SoapTransport;
use crate::api::Transport;
use crate::api::query::DEFAULT_ACCEPTABLE_SIZE;
use crate::api::query::QueryBuilder;
use crate::error::Error;
use crate::model::Key;
use crate::model::ZeroTime;
use crate::response::FetchResult;

/// The client for querying a FIAP storage service.
///
/// This client is cheap to clone (uses `Arc` internally). Each fetch owns
/// its own accumulators, so concurrent fetches through clones of one client
/// never share state.
///
/// # Example
///
/// ```ignore
/// use fiap_lib::FiapClient;
/// use fiap_lib::model::Key;
///
/// let client = FiapClient::builder()
///     .url("http://fiap.example.org/axis2/services/FIAPStorage")
///     .build()?;
///
/// let result = client.fetch([Key::new("http://example.org/point/1")]).await?;
/// ```
#[derive(Clone)]
pub struct FiapClient {
    inner: Arc<FiapClientInner>,
}

struct FiapClientInner {
    url: String,
    transport: Arc<dyn Transport>,
    acceptable_size: u32,
    zero_time: ZeroTime,
    max_pages: Option<usize>,
}

impl FiapClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> FiapClientBuilder<Missing> {
        FiapClientBuilder::new()
    }

    /// Starts a query for the given keys.
    pub fn query(&self, keys: impl IntoIterator<Item = Key>) -> QueryBuilder<'_> {
        QueryBuilder::new(self, keys.into_iter().collect())
    }

    /// Fetches every page for the given keys with the client's defaults.
    ///
    /// Shorthand for `client.query(keys).fetch()`.
    pub async fn fetch(&self, keys: impl IntoIterator<Item = Key>) -> Result<FetchResult, Error> {
        self.query(keys).fetch().await
    }

    /// Returns the endpoint URL.
    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// Returns the default acceptable size for queries.
    pub fn acceptable_size(&self) -> u32 {
        self.inner.acceptable_size
    }

    /// Returns the default zero-timestamp policy for queries.
    pub fn zero_time(&self) -> ZeroTime {
        self.inner.zero_time
    }

    /// Returns the default page cap for queries, if any.
    pub fn max_pages(&self) -> Option<usize> {
        self.inner.max_pages
    }

    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }
}

impl std::fmt::Debug for FiapClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FiapClient")
            .field("url", &self.inner.url)
            .field("acceptable_size", &self.inner.acceptable_size)
            .field("zero_time", &self.inner.zero_time)
            .field("max_pages", &self.inner.max_pages)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`FiapClient`].
///
/// Uses the typestate pattern to ensure the URL is set at compile time. The
/// URL itself is checked when a query runs, together with the other inputs.
///
/// # Required Fields
///
/// - `url` - The FIAP storage endpoint
///
/// # Example
///
/// ```ignore
/// let client = FiapClient::builder()
///     .url("http://fiap.example.org/axis2/services/FIAPStorage")
///     .acceptable_size(500)
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub struct FiapClientBuilder<Url> {
    url: Url,
    transport: Option<Arc<dyn Transport>>,
    acceptable_size: u32,
    zero_time: ZeroTime,
    max_pages: Option<usize>,
    trace_xml: bool,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl FiapClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            transport: None,
            acceptable_size: DEFAULT_ACCEPTABLE_SIZE.get(),
            zero_time: ZeroTime::default(),
            max_pages: None,
            trace_xml: false,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the FIAP storage endpoint URL.
    pub fn url(self, url: impl Into<String>) -> FiapClientBuilder<Set<String>> {
        FiapClientBuilder {
            url: Set(url.into()),
            transport: self.transport,
            acceptable_size: self.acceptable_size,
            zero_time: self.zero_time,
            max_pages: self.max_pages,
            trace_xml: self.trace_xml,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for FiapClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> FiapClientBuilder<U> {
    /// Sets a custom transport.
    ///
    /// If not set, a [`SoapTransport`] is built from the HTTP settings below.
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Sets the default maximum number of values per page.
    ///
    /// Defaults to 1000.
    pub fn acceptable_size(mut self, size: u32) -> Self {
        self.acceptable_size = size;
        self
    }

    /// Sets the default zero-timestamp policy.
    ///
    /// Defaults to [`ZeroTime::Emit`].
    pub fn zero_time(mut self, zero_time: ZeroTime) -> Self {
        self.zero_time = zero_time;
        self
    }

    /// Sets the default page cap. Unbounded if not set.
    pub fn max_pages(mut self, max: usize) -> Self {
        self.max_pages = Some(max);
        self
    }

    /// Logs every request and response document at trace level.
    pub fn trace_xml(mut self, enabled: bool) -> Self {
        self.trace_xml = enabled;
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl FiapClientBuilder<Set<String>> {
    /// Builds the [`FiapClient`].
    ///
    /// This method is only available once `url` has been set. It fails only
    /// if the default HTTP client cannot be created.
    pub fn build(self) -> Result<FiapClient, reqwest::Error> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let http_client = match self.http_client {
                    Some(client) => client,
                    None => {
                        let mut builder = Client::builder();
                        if let Some(timeout) = self.connect_timeout {
                            builder = builder.connect_timeout(timeout);
                        }
                        builder.build()?
                    }
                };
                let transport = SoapTransport::new(http_client)
                    .timeout(self.timeout)
                    .trace_xml(self.trace_xml);
                Arc::new(transport) as Arc<dyn Transport>
            }
        };

        Ok(FiapClient {
            inner: Arc::new(FiapClientInner {
                url: self.url.0,
                transport,
                acceptable_size: self.acceptable_size,
                zero_time: self.zero_time,
                max_pages: self.max_pages,
            }),
        })
    }
}
