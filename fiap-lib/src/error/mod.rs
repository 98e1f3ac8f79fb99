//! Error types

mod protocol;
mod server;
mod transport;
mod validation;

pub use protocol::*;
pub use server::*;
pub use transport::*;
pub use validation::*;

/// Any failure of a query or fetch.
///
/// A fetch is all-or-nothing: whichever of these ends it, the pages merged so
/// far are discarded.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad input, detected before any network call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The remote call failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response did not have the expected shape.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The server answered with an `<error>` header.
    #[error(transparent)]
    Server(#[from] ServerError),

    /// The configured page cap was reached while the server still had a cursor.
    #[error("Pagination stopped after {limit} pages; server still returned a cursor")]
    PageLimit {
        /// The configured maximum number of pages.
        limit: usize,
    },
}

impl Error {
    /// Returns `true` if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns `true` if this is a transport error.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if this is a protocol error.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }

    /// Returns the server-reported error, if that is what this is.
    pub fn server_error(&self) -> Option<&ServerError> {
        match self {
            Self::Server(e) => Some(e),
            _ => None,
        }
    }
}
