//! FIAP operations

pub mod query;
mod transport;

pub use transport::*;
