//! Transport error types

use std::time::Duration;

/// Errors raised while exchanging a request with the remote FIAP service.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Non-success HTTP response.
    #[error("HTTP {status} from {endpoint}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// The endpoint that answered.
        endpoint: String,
        /// Response body, or a short description when it was empty.
        message: String,
    },

    /// Network error during the exchange.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// A request header could not be built from the given value.
    #[error("Invalid {name} header value: {value:?}")]
    InvalidHeader {
        /// Header name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The service answered with a SOAP fault instead of a response.
    #[error("SOAP fault during '{operation}' [{code}]: {message}")]
    Fault {
        /// The operation that was called.
        operation: String,
        /// The `faultcode` element text.
        code: String,
        /// The `faultstring` element text.
        message: String,
    },
}

impl TransportError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Creates a new SOAP fault error.
    pub fn fault(
        operation: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Fault {
            operation: operation.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a SOAP fault.
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault { .. })
    }
}
