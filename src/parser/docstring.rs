//! Help text from a function's doc text
//!
//! A line of four or more dashes separates the description from the epilog.

use crate::error::{SignatureError, SignatureResult};
use regex::Regex;
use std::sync::OnceLock;

fn separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"\n\s*-{4,}\s*\n").expect("separator pattern is valid"))
}

/// Description and epilog taken from doc text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocParts {
    pub description: Option<String>,
    pub epilog: Option<String>,
}

/// Split doc text into description and epilog.
///
/// Text without a separator is all description. More than one separator is
/// an error.
pub fn split_docstring(doc: &str) -> SignatureResult<DocParts> {
    let parts: Vec<&str> = separator().split(doc).collect();

    let (description, epilog) = match parts.as_slice() {
        [description] => (*description, ""),
        [description, epilog] => (*description, *epilog),
        _ => return Err(SignatureError::TooManySplits),
    };

    Ok(DocParts {
        description: non_empty(description),
        epilog: non_empty(epilog),
    })
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
