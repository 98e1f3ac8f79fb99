//! FIAP query building, decoding and pagination.
//!
//! # Pipeline
//!
//! - [`QueryBuilder`] - collects keys and options, validated before any I/O
//! - [`QueryRequest`] / [`xml`] - the `<query>` sent per page
//! - [`wire`] / [`parse_response`] - the `<transport>` tree a page returns
//! - [`decode_page`] - flattens a tree into per-ID maps and the next cursor
//! - [`QueryPages`] - follows cursors until the server has no more pages

mod builder;
mod decode;
mod page;
mod pages;
mod parse;
mod request;
mod validation;
pub mod wire;
pub mod xml;

pub use builder::QueryBuilder;
pub use decode::decode_page;
pub use decode::flatten_body;
pub use decode::parse_cursor;
pub use page::Page;
pub use pages::QueryPages;
pub use parse::parse_response;
pub use request::*;
pub use validation::is_canonical_uuid;
pub use validation::validate;
pub use xml::request_envelope;
