//! Protocol error types

/// Errors raised when a response does not have the expected FIAP shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// A required element of the response envelope is absent.
    #[error("Response is missing the <{element}> element")]
    MissingElement {
        /// Local name of the missing element.
        element: &'static str,
    },

    /// A required attribute is absent.
    #[error("<{element}> element is missing its '{attribute}' attribute")]
    MissingAttribute {
        /// Local name of the element.
        element: String,
        /// Name of the missing attribute.
        attribute: &'static str,
    },

    /// The response is not well-formed XML.
    #[error("Malformed XML response: {0}")]
    Xml(String),

    /// A `<value>` element has no `time` attribute.
    #[error("Value of point '{point}' has no time attribute")]
    MissingTime {
        /// The point the value belongs to.
        point: String,
    },

    /// A `<value>` element has a `time` attribute that is not RFC 3339.
    #[error("Value of point '{point}' has invalid time '{time}'")]
    InvalidTime {
        /// The point the value belongs to.
        point: String,
        /// The offending attribute text.
        time: String,
    },

    /// The echoed cursor is not a UUID.
    #[error("Response cursor '{0}' is not a UUID")]
    InvalidCursor(String),
}

impl ProtocolError {
    /// Creates a new missing element error.
    pub fn missing(element: &'static str) -> Self {
        Self::MissingElement { element }
    }

    /// Creates a new XML error.
    pub fn xml(message: impl ToString) -> Self {
        Self::Xml(message.to_string())
    }
}
