//! Signature validation
//!
//! Structural checks that hold for any signature, independent of whether its
//! parameter kinds can be expressed on a command line. Kind and annotation
//! checks happen when the parser is built.

use crate::error::{SignatureError, SignatureResult};
use crate::signature::types::Signature;
use std::collections::HashSet;

/// Validate a complete signature
pub fn validate_signature(signature: &Signature) -> SignatureResult<()> {
    let mut seen = HashSet::new();
    let mut variadic: Option<&str> = None;

    for param in signature.params() {
        if param.name.is_empty() {
            return Err(SignatureError::EmptyName);
        }

        if !is_identifier(&param.name) {
            return Err(SignatureError::InvalidName(param.name.clone()));
        }

        if !seen.insert(param.name.as_str()) {
            return Err(SignatureError::DuplicateName(param.name.clone()));
        }

        if param.is_variadic() {
            if variadic.is_some() {
                return Err(SignatureError::MultipleVariadic(param.name.clone()));
            }
            variadic = Some(&param.name);
        }
    }

    Ok(())
}

/// Letters, digits and underscores, not starting with a digit
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
