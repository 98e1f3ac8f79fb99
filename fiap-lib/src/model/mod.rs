//! Typed models

mod key;
mod point;

pub use key::*;
pub use point::*;
