//! FIAP request XML generation.

use crate::model::Key;
use crate::model::ZeroTime;

use super::QueryRequest;

/// SOAP 1.1 envelope namespace.
pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Namespace of the FIAP SOAP operations (`queryRQ`, `queryRS`).
pub const FIAP_SOAP_NS: &str = "http://soap.fiap.org/";

/// Namespace of the FIAP data model (`transport` and everything below it).
pub const FIAP_DATA_NS: &str = "http://gutp.jp/fiap/2009/11/";

/// Escapes a string for use in XML attribute values.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Converts a `Key` to a `<key>` element.
///
/// Unset comparisons and `Select::None` are omitted entirely rather than
/// written as empty attributes.
pub fn key_to_xml(key: &Key, zero_time: ZeroTime) -> String {
    let mut attrs = vec![
        format!(r#"id="{}""#, escape_xml(&key.id)),
        format!(r#"attrName="{}""#, Key::ATTR_NAME),
    ];

    for (name, time) in key.comparisons() {
        if let Some(time) = zero_time.apply(time) {
            attrs.push(format!(r#"{}="{}""#, name, escape_xml(&time.to_rfc3339())));
        }
    }

    if let Some(select) = key.select.as_wire() {
        attrs.push(format!(r#"select="{}""#, select));
    }

    format!("<key {}/>", attrs.join(" "))
}

/// Converts a `QueryRequest` to a `<query>` element.
pub fn query_to_xml(request: &QueryRequest) -> String {
    let mut attrs = vec![
        format!(r#"id="{}""#, request.id),
        format!(r#"acceptableSize="{}""#, request.acceptable_size),
        format!(r#"type="{}""#, request.query_type()),
    ];

    if let Some(cursor) = request.cursor {
        attrs.push(format!(r#"cursor="{}""#, cursor));
    }

    let keys: String = request
        .keys
        .iter()
        .map(|key| key_to_xml(key, request.zero_time))
        .collect();

    format!("<query {}>{}</query>", attrs.join(" "), keys)
}

/// Wraps a request in the `<transport>` element and a SOAP envelope for `operation`.
pub fn request_envelope(operation: &str, request: &QueryRequest) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<soapenv:Envelope xmlns:soapenv="{envelope_ns}">"#,
            r#"<soapenv:Body>"#,
            r#"<ns2:{operation}RQ xmlns:ns2="{soap_ns}">"#,
            r#"<transport xmlns="{data_ns}"><header>{query}</header></transport>"#,
            r#"</ns2:{operation}RQ>"#,
            r#"</soapenv:Body>"#,
            r#"</soapenv:Envelope>"#,
        ),
        envelope_ns = SOAP_ENVELOPE_NS,
        soap_ns = FIAP_SOAP_NS,
        data_ns = FIAP_DATA_NS,
        operation = operation,
        query = query_to_xml(request),
    )
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use chrono::DateTime;
    use uuid::Uuid;

    use super::*;
    use crate::model::Select;

    fn time(s: &str) -> crate::model::Timestamp {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("O'Brien & Co"), "O&apos;Brien &amp; Co");
        assert_eq!(escape_xml("<test>"), "&lt;test&gt;");
    }

    #[test]
    fn test_unfiltered_key_omits_everything_optional() {
        assert_eq!(
            key_to_xml(&Key::new("http://example.org/a"), ZeroTime::Emit),
            r#"<key id="http://example.org/a" attrName="time"/>"#
        );
    }

    #[test]
    fn test_key_with_range_and_select() {
        let key = Key::new("A")
            .between(time("2012-02-01T00:00:00+09:00"), time("2012-02-02T00:00:00+09:00"))
            .select(Select::Maximum);
        assert_eq!(
            key_to_xml(&key, ZeroTime::Emit),
            r#"<key id="A" attrName="time" lteq="2012-02-02T00:00:00+09:00" gteq="2012-02-01T00:00:00+09:00" select="maximum"/>"#
        );
    }

    #[test]
    fn test_epoch_follows_zero_time_policy() {
        let key = Key::new("A").equals(time("1970-01-01T00:00:00+00:00"));
        assert_eq!(
            key_to_xml(&key, ZeroTime::Emit),
            r#"<key id="A" attrName="time" eq="1970-01-01T00:00:00+00:00"/>"#
        );
        assert_eq!(
            key_to_xml(&key, ZeroTime::Omit),
            r#"<key id="A" attrName="time"/>"#
        );
    }

    #[test]
    fn test_query_without_cursor() {
        let mut request = QueryRequest::new(NonZeroU32::new(10).unwrap(), None, vec![Key::new("A")]);
        request.id = Uuid::nil();
        assert_eq!(
            query_to_xml(&request),
            r#"<query id="00000000-0000-0000-0000-000000000000" acceptableSize="10" type="storage"><key id="A" attrName="time"/></query>"#
        );
    }

    #[test]
    fn test_query_with_cursor_and_escaped_id() {
        let cursor = Uuid::parse_str("6f3e3c64-9a43-4d2b-8d53-2b7c1f0a4e11").unwrap();
        let request = QueryRequest::new(
            NonZeroU32::new(1000).unwrap(),
            Some(cursor),
            vec![Key::new("a&b"), Key::new("c")],
        );
        let xml = query_to_xml(&request);
        assert!(xml.contains(r#"cursor="6f3e3c64-9a43-4d2b-8d53-2b7c1f0a4e11""#));
        assert!(xml.contains(r#"<key id="a&amp;b" attrName="time"/><key id="c" attrName="time"/>"#));
    }

    #[test]
    fn test_envelope_structure() {
        let request = QueryRequest::new(NonZeroU32::new(1).unwrap(), None, vec![Key::new("A")]);
        let xml = request_envelope("query", &request);
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope"#));
        assert!(xml.contains(r#"<ns2:queryRQ xmlns:ns2="http://soap.fiap.org/">"#));
        assert!(xml.contains(r#"<transport xmlns="http://gutp.jp/fiap/2009/11/"><header><query "#));
        assert!(xml.ends_with("</ns2:queryRQ></soapenv:Body></soapenv:Envelope>"));
    }
}
