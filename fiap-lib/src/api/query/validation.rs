//! Input validation for queries.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::model::Key;

static URL_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)https?://").expect("Invalid regex pattern"));

static CANONICAL_UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("Invalid regex pattern")
});

/// Returns `true` if `s` is a UUID in its canonical 8-4-4-4-12 hexadecimal form.
///
/// # Example
///
/// ```
/// use fiap_lib::api::query::is_canonical_uuid;
///
/// assert!(is_canonical_uuid("6f3e3c64-9a43-4d2b-8d53-2b7c1f0a4e11"));
/// assert!(!is_canonical_uuid("6f3e3c649a434d2b8d532b7c1f0a4e11"));
/// ```
pub fn is_canonical_uuid(s: &str) -> bool {
    CANONICAL_UUID.is_match(s)
}

/// Checks everything a query needs before the network is touched.
///
/// Every check runs, and every failure is recorded, so the returned error
/// names all problems at once. On success, returns the parsed starting cursor
/// (`None` when `cursor` was absent or empty).
///
/// # Example
///
/// ```
/// use fiap_lib::api::query::validate;
/// use fiap_lib::model::Key;
///
/// let err = validate("", &[Key::new("")], Some("not-a-uuid"), 1000).unwrap_err();
/// assert!(err.has_field("url"));
/// assert!(err.has_field("keys[0].id"));
/// assert!(err.has_field("cursor"));
/// ```
pub fn validate(
    url: &str,
    keys: &[Key],
    cursor: Option<&str>,
    acceptable_size: u32,
) -> Result<Option<Uuid>, ValidationError> {
    let mut errors = ValidationError::new();

    if url.is_empty() {
        errors.push("url", "must not be empty");
    } else if !URL_SCHEME.is_match(url) {
        errors.push("url", format!("'{}' must start with http:// or https://", url));
    } else if let Err(e) = Url::parse(url) {
        errors.push("url", format!("'{}' is not a valid URL: {}", url, e));
    }

    if keys.is_empty() {
        errors.push("keys", "at least one key is required");
    }
    for (i, key) in keys.iter().enumerate() {
        if key.id.is_empty() {
            errors.push(format!("keys[{}].id", i), "must not be empty");
        }
    }

    if acceptable_size == 0 {
        errors.push("acceptable_size", "must be at least 1");
    }

    let mut start = None;
    match cursor {
        None | Some("") => {}
        Some(c) if is_canonical_uuid(c) => start = Uuid::parse_str(c).ok(),
        Some(c) => errors.push(
            "cursor",
            format!("'{}' is not a UUID (xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx)", c),
        ),
    }

    errors.into_result(start)
}
