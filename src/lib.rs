//! sigparse - command-line parsers derived from function signatures
//!
//! Describe a function's parameters (names, defaults, variadic markers and
//! annotations), and sigparse builds a clap parser for them, parses a command
//! line, and calls the function with the bound arguments.
//!
//! ```no_run
//! use sigparse::runner::autocommand;
//! use sigparse::signature::{Parameter, Signature};
//!
//! let signature = Signature::new()
//!     .param(Parameter::new("name").with_annotation("Who to greet"))
//!     .param(Parameter::new("times").with_default(1))
//!     .param(Parameter::new("loud").with_default(false));
//!
//! let greet = autocommand(signature)
//!     .description("Greet someone")
//!     .build(|args| {
//!         let name = args.get_str("name").unwrap_or("world");
//!         for _ in 0..args.get_int("times").unwrap_or(1) {
//!             println!("Hello, {}!", name);
//!         }
//!     })
//!     .expect("signature is valid");
//!
//! greet.run_as_entry_point();
//! ```

// Public modules
pub mod cli;
pub mod error;
pub mod parser;
pub mod runner;
pub mod signature;

// Re-export commonly used types
pub use error::{Result, SigparseError, SignatureError};
pub use parser::{build_parser, BoundArgs, Parser};
pub use runner::{autocommand, AutoCommand};
pub use signature::{Annotation, ParamKind, Parameter, Signature, Value, ValueType};

/// Current version of sigparse
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
