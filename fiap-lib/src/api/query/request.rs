//! The FIAP query request.

use std::num::NonZeroU32;

use uuid::Uuid;

use crate::model::Key;
use crate::model::ZeroTime;

/// Values returned per call when the caller does not choose a size.
pub const DEFAULT_ACCEPTABLE_SIZE: NonZeroU32 = NonZeroU32::new(1000).unwrap();

/// Name of the FIAP query operation (`queryRQ` / `queryRS`).
pub const QUERY_OPERATION: &str = "query";

/// The only query type this client issues.
pub const QUERY_TYPE: &str = "storage";

/// One `<query>` sent to the server.
///
/// Built fresh for every remote call. The `id` is random each time and only
/// correlates a request with its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Request identifier.
    pub id: Uuid,
    /// Maximum number of values the server may return in this call.
    pub acceptable_size: NonZeroU32,
    /// Continuation token from the previous page, if any.
    pub cursor: Option<Uuid>,
    /// Keys to look up, in order.
    pub keys: Vec<Key>,
    /// How epoch timestamps in `keys` are written.
    pub zero_time: ZeroTime,
}

impl QueryRequest {
    /// Creates a request with a freshly generated identifier.
    pub fn new(acceptable_size: NonZeroU32, cursor: Option<Uuid>, keys: Vec<Key>) -> Self {
        Self {
            id: Uuid::new_v4(),
            acceptable_size,
            cursor,
            keys,
            zero_time: ZeroTime::default(),
        }
    }

    /// Sets the zero-timestamp policy.
    pub fn with_zero_time(mut self, zero_time: ZeroTime) -> Self {
        self.zero_time = zero_time;
        self
    }

    /// Returns the query type attribute.
    pub fn query_type(&self) -> &'static str {
        QUERY_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_request_ids_are_unique() {
        let keys = vec![Key::new("A")];
        let a = QueryRequest::new(DEFAULT_ACCEPTABLE_SIZE, None, keys.clone());
        let b = QueryRequest::new(DEFAULT_ACCEPTABLE_SIZE, None, keys);
        assert_ne!(a.id, b.id);
        assert_eq!(a.acceptable_size.get(), 1000);
        assert_eq!(a.query_type(), "storage");
        assert_eq!(a.zero_time, ZeroTime::Emit);
    }
}
