//! Error types for sigparse

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sigparse operations
pub type Result<T> = std::result::Result<T, SigparseError>;

/// Main error type for sigparse
#[derive(Error, Debug)]
pub enum SigparseError {
    /// The signature cannot be turned into a command-line parser
    #[error("Signature error: {0}")]
    Signature(#[from] SignatureError),

    /// Signature file discovery and loading errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Command-line input rejected by the parser
    #[error("{0}")]
    Parse(#[from] clap::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors in the shape of a signature.
///
/// These are raised while the parser is being built, before any command line
/// is parsed, so a signature can be checked without ever calling the
/// function it describes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignatureError {
    /// Annotation is not a type, a description, or a (type, description) pair
    #[error("Invalid annotation {0}: must be a type, a description, or a pair of both")]
    Annotation(String),

    /// Positional-only parameters cannot be named on a command line
    #[error("Positional-only parameter '{0}' is not supported")]
    PositionalArg(String),

    /// Catch-all keyword parameters have no command-line equivalent
    #[error("Variadic keyword parameter '{0}' is not supported")]
    KwArg(String),

    #[error("Only one variadic positional parameter is allowed (found '{0}')")]
    MultipleVariadic(String),

    #[error("Parameter '{0}' is declared more than once")]
    DuplicateName(String),

    #[error("Parameter names cannot be empty")]
    EmptyName,

    /// Names must be identifiers: letters, digits and `_`, not starting
    /// with a digit
    #[error("Parameter name '{0}' is not a valid identifier")]
    InvalidName(String),

    #[error("Required parameter '{0}' cannot follow the variadic parameter")]
    RequiredAfterVariadic(String),

    #[error("Parameter '{0}' would shadow the reserved --help flag")]
    ReservedFlag(String),

    #[error("Docstring has more than one description/epilog separator")]
    TooManySplits,
}

/// Signature file discovery and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find signature file (searched: {0})")]
    NotFound(String),

    #[error("Invalid signature file: {0}")]
    Invalid(String),

    #[error("Failed to read '{path}': {error}")]
    Read { path: PathBuf, error: String },
}

/// Specialized result type for signature checks
pub type SignatureResult<T> = std::result::Result<T, SignatureError>;

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

