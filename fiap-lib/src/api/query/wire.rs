//! Response tree as the server sends it.
//!
//! These types mirror the FIAP `transport` element one-to-one. Nothing here is
//! validated beyond XML well-formedness; see [`decode_page`](super::decode_page)
//! for turning a tree into flat maps.

/// The `<transport>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transport {
    /// The `<header>` element, if present.
    pub header: Option<Header>,
    /// The `<body>` element, if present.
    pub body: Option<Body>,
}

/// The `<header>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    /// Whether an `<OK/>` marker was present.
    pub ok: bool,
    /// The `<error>` element, if the server reported one.
    pub error: Option<HeaderError>,
    /// The echoed `<query>` element.
    pub query: Option<QueryEcho>,
}

/// The `<error type="...">text</error>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderError {
    /// The `type` attribute.
    pub kind: String,
    /// The element text, whitespace included.
    pub value: String,
}

/// The `<query>` element echoed in a response header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryEcho {
    /// The `id` attribute.
    pub id: Option<String>,
    /// The `type` attribute.
    pub query_type: Option<String>,
    /// The `cursor` attribute; absent or empty means no more pages.
    pub cursor: Option<String>,
    /// The `acceptableSize` attribute.
    pub acceptable_size: Option<String>,
}

/// The `<body>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    /// Top-level `<point>` elements.
    pub points: Vec<Point>,
    /// Top-level `<pointSet>` elements.
    pub point_sets: Vec<PointSet>,
}

impl Body {
    /// Returns `true` if the body holds neither points nor point-sets.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.point_sets.is_empty()
    }
}

/// A `<pointSet>` element and its direct children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointSet {
    /// The `id` attribute.
    pub id: String,
    /// Child `<point>` elements, in document order.
    pub points: Vec<Point>,
    /// Child `<pointSet>` elements, in document order.
    pub point_sets: Vec<PointSet>,
}

/// A `<point>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Point {
    /// The `id` attribute.
    pub id: String,
    /// Child `<value>` elements, in document order.
    pub values: Vec<Value>,
}

/// A `<value time="...">text</value>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Value {
    /// The raw `time` attribute.
    pub time: Option<String>,
    /// The element text, whitespace included.
    pub text: String,
}
