//! Function signatures
//!
//! This module holds the parameter descriptors a parser is derived from, and
//! the loading and validation of signature files.

pub mod parse;
pub mod schema;
pub mod types;

// Re-export main types
pub use parse::*;
pub use schema::*;
pub use types::*;
