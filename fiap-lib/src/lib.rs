//! FIAP/IEEE1888 query client library
//!
//! A Rust async client for the FIAP storage `query` operation: builds the
//! SOAP request, follows the server's pagination cursor, and flattens the
//! nested point/point-set response into per-ID maps.

pub mod api;
pub mod error;
pub mod model;
pub mod response;

mod client;

pub use client::*;
pub use response::FetchResult;
