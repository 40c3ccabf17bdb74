//! CLI interface for the `sigparse` binary
//!
//! This module loads a signature file, parses the remaining command line
//! against it, and prints the bound arguments or a completion script.

pub mod app;

// Re-export main types
pub use app::*;
