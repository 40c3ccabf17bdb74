//! Signature-to-parser derivation
//!
//! This module classifies parameters, assigns flags, registers the result
//! with clap, and binds parsed values back onto the signature.

pub mod build;
pub mod classify;
pub mod docstring;
pub mod flags;
pub mod invoke;

// Re-export main types
pub use build::*;
pub use classify::*;
pub use docstring::*;
pub use flags::*;
pub use invoke::*;
