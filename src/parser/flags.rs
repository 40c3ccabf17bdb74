//! Flag assignment
//!
//! Options get a `-c` short flag from the first letter of their name when
//! that letter (or its opposite case) is still free, and a `--name` long flag
//! unless the name is a single letter that already has its short flag.

use crate::signature::Parameter;
use std::collections::HashSet;

/// Short flags that belong to the parser itself (`-h` for help)
pub const RESERVED_SHORT_FLAGS: &[char] = &['h'];

/// A fresh set of claimed short flags for one build pass
pub fn reserved_short_flags() -> HashSet<char> {
    RESERVED_SHORT_FLAGS.iter().copied().collect()
}

/// Opposite-case form of a character, if it has a distinct one
fn swapcase(c: char) -> Option<char> {
    let swapped: Vec<char> = if c.is_lowercase() {
        c.to_uppercase().collect()
    } else if c.is_uppercase() {
        c.to_lowercase().collect()
    } else {
        return None;
    };

    match swapped.as_slice() {
        [s] if *s != c => Some(*s),
        _ => None,
    }
}

/// Pick the flags for an option named `name`, claiming a short letter in
/// `used` if one is available
pub fn assign_flags(name: &str, used: &mut HashSet<char>) -> Vec<String> {
    let mut flags = Vec::with_capacity(2);

    if let Some(first) = name.chars().next() {
        let candidates = std::iter::once(first).chain(swapcase(first));
        for letter in candidates {
            if used.insert(letter) {
                flags.push(format!("-{}", letter));
                break;
            }
        }
    }

    let single_letter = name.chars().count() == 1;
    if !single_letter || flags.is_empty() {
        flags.push(format!("--{}", name));
    }

    flags
}

/// Order in which parameters claim short flags.
///
/// Single-letter names go first so they keep their own letter; the sort is
/// stable, so declaration order is preserved within each group.
pub fn processing_order(params: &[Parameter]) -> Vec<&Parameter> {
    let mut ordered: Vec<&Parameter> = params.iter().collect();
    ordered.sort_by_key(|param| param.name.chars().count() > 1);
    ordered
}
