//! Running wrapped functions
//!
//! This module ties a function to its derived parser, and provides the entry
//! point, async and file helpers used around such functions.

pub mod bridge;
pub mod command;
pub mod entry;
pub mod files;

// Re-export main types
pub use bridge::*;
pub use command::*;
pub use entry::*;
pub use files::*;
