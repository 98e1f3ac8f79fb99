//! Remote call adapter

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;

use crate::api::query::QueryRequest;
use crate::api::query::parse_response;
use crate::api::query::request_envelope;
use crate::api::query::wire;
use crate::api::query::xml::FIAP_SOAP_NS;
use crate::error::Error;
use crate::error::TransportError;

/// Performs one request/response exchange with a FIAP server.
///
/// Implementations must not retry: any error returned here ends the fetch.
///
/// # Example
///
/// ```ignore
/// struct Canned(wire::Transport);
///
/// #[async_trait]
/// impl Transport for Canned {
///     async fn call(&self, _: &str, _: &str, _: &QueryRequest) -> Result<wire::Transport, Error> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` as `operation` to `endpoint` and returns the decoded response tree.
    async fn call(
        &self,
        endpoint: &str,
        operation: &str,
        request: &QueryRequest,
    ) -> Result<wire::Transport, Error>;
}

/// SOAP 1.1 over HTTP.
///
/// Posts the request envelope with a `SOAPAction` of
/// `http://soap.fiap.org/{operation}` and parses the `{operation}RS` reply.
#[derive(Debug, Clone)]
pub struct SoapTransport {
    http_client: Client,
    timeout: Option<Duration>,
    trace_xml: bool,
}

impl SoapTransport {
    /// Creates a transport using the given HTTP client.
    pub fn new(http_client: Client) -> Self {
        Self {
            http_client,
            timeout: None,
            trace_xml: false,
        }
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Logs request and response documents at trace level.
    pub fn trace_xml(mut self, trace_xml: bool) -> Self {
        self.trace_xml = trace_xml;
        self
    }

    fn headers(operation: &str) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/xml; charset=utf-8"),
        );
        let action = format!("\"{}{}\"", FIAP_SOAP_NS, operation);
        let value = HeaderValue::from_str(&action).map_err(|_| TransportError::InvalidHeader {
            name: "SOAPAction",
            value: action.clone(),
        })?;
        headers.insert("SOAPAction", value);
        Ok(headers)
    }
}

impl Default for SoapTransport {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

#[async_trait]
impl Transport for SoapTransport {
    async fn call(
        &self,
        endpoint: &str,
        operation: &str,
        request: &QueryRequest,
    ) -> Result<wire::Transport, Error> {
        let headers = Self::headers(operation)?;
        let envelope = request_envelope(operation, request);
        if self.trace_xml {
            log::trace!("{} request to {}: {}", operation, endpoint, envelope);
        }

        let mut builder = self
            .http_client
            .post(endpoint)
            .headers(headers)
            .body(envelope);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| match self.timeout {
            Some(timeout) if e.is_timeout() => TransportError::Timeout(timeout),
            _ => TransportError::Network(e),
        })?;

        let status = response.status();
        let body = response.text().await.map_err(TransportError::from)?;
        if self.trace_xml {
            log::trace!("{} response ({}) from {}: {}", operation, status, endpoint, body);
        }

        if status.is_success() {
            return parse_response(&body, operation);
        }

        // SOAP 1.1 servers report faults with HTTP 500 and a Fault body.
        if status.is_server_error() {
            if let Err(e @ Error::Transport(TransportError::Fault { .. })) =
                parse_response(&body, operation)
            {
                return Err(e);
            }
        }

        let message = if body.is_empty() {
            status.canonical_reason().unwrap_or("no response body").to_string()
        } else {
            body
        };
        Err(TransportError::http(status.as_u16(), endpoint, message).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soap_headers() {
        let headers = SoapTransport::headers("query").unwrap();
        assert_eq!(headers["SOAPAction"], "\"http://soap.fiap.org/query\"");
        assert_eq!(headers[CONTENT_TYPE], "text/xml; charset=utf-8");
    }

    #[test]
    fn test_invalid_soap_action_is_error() {
        let err = SoapTransport::headers("query\nX-Injected: 1").unwrap_err();
        assert!(matches!(
            err,
            TransportError::InvalidHeader { name: "SOAPAction", .. }
        ));
    }

    #[tokio::test]
    async fn test_invalid_operation_fails_before_sending() {
        let request = QueryRequest::new(
            crate::api::query::DEFAULT_ACCEPTABLE_SIZE,
            None,
            vec![crate::model::Key::new("A")],
        );
        let err = SoapTransport::default()
            .call("http://127.0.0.1:9/fiap", "bad\roperation", &request)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Transport(TransportError::InvalidHeader { .. })
        ));
    }
}
