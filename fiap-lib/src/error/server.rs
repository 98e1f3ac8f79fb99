//! Errors reported by the FIAP server in the response header

/// An `<error>` element returned in place of `<OK/>` in the response header.
///
/// The server signals policy-level failures this way, for example an unknown
/// point identifier or a query it refuses to answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("server reported error during '{operation}' [{kind}]: {message}")]
pub struct ServerError {
    /// The operation that was called.
    pub operation: String,
    /// The `type` attribute (e.g. `POINT_NOT_FOUND`).
    pub kind: String,
    /// The element text.
    pub message: String,
}

impl ServerError {
    /// Creates a new server error.
    pub fn new(
        operation: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation: operation.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Checks if the server used the given error type.
    pub fn has_kind(&self, kind: &str) -> bool {
        self.kind.eq_ignore_ascii_case(kind)
    }
}
