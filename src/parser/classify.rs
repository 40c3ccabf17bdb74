//! Parameter classification
//!
//! Turns one [`Parameter`] into the [`ArgumentSpec`] registered with clap:
//! its value type, action, default, help text and flags.

use crate::error::{SignatureError, SignatureResult};
use crate::parser::flags::assign_flags;
use crate::signature::{Annotation, ParamKind, Parameter, Value, ValueType};
use std::collections::HashSet;

/// An annotation after its shape has been checked
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedAnnotation {
    TypeOnly(ValueType),
    DescriptionOnly(String),
    TypeAndDescription(ValueType, String),
}

impl ResolvedAnnotation {
    /// Check the shape of a raw annotation.
    ///
    /// A pair is accepted only when exactly one element is a type and the
    /// other a description, in either order.
    pub fn resolve(annotation: &Annotation) -> SignatureResult<Self> {
        match annotation {
            Annotation::Type(ty) => Ok(ResolvedAnnotation::TypeOnly(ty.clone())),
            Annotation::Text(text) => Ok(ResolvedAnnotation::DescriptionOnly(text.clone())),
            Annotation::Tuple(items) => match items.as_slice() {
                [Annotation::Type(ty), Annotation::Text(text)]
                | [Annotation::Text(text), Annotation::Type(ty)] => Ok(
                    ResolvedAnnotation::TypeAndDescription(ty.clone(), text.clone()),
                ),
                _ => Err(SignatureError::Annotation(annotation.to_string())),
            },
            Annotation::Literal(_) => Err(SignatureError::Annotation(annotation.to_string())),
        }
    }

    pub fn value_type(&self) -> Option<&ValueType> {
        match self {
            ResolvedAnnotation::TypeOnly(ty) | ResolvedAnnotation::TypeAndDescription(ty, _) => {
                Some(ty)
            }
            ResolvedAnnotation::DescriptionOnly(_) => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            ResolvedAnnotation::DescriptionOnly(text)
            | ResolvedAnnotation::TypeAndDescription(_, text) => Some(text),
            ResolvedAnnotation::TypeOnly(_) => None,
        }
    }
}

/// Get the (type, description) pair for an optional annotation
pub fn classify(
    annotation: Option<&Annotation>,
) -> SignatureResult<(Option<ValueType>, Option<String>)> {
    let resolved = match annotation {
        None => return Ok((None, None)),
        Some(annotation) => ResolvedAnnotation::resolve(annotation)?,
    };

    Ok((
        resolved.value_type().cloned(),
        resolved.description().map(str::to_string),
    ))
}

/// What the parser does with a parameter's tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Store one converted value
    Store,
    /// Switch: presence stores `true`
    StoreTrue,
    /// Switch: presence stores `false`
    StoreFalse,
    /// Collect zero or more trailing values
    CollectMany,
}

/// Everything the argument parser needs to know about one parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSpec {
    /// Bare name for positionals, `-x` and/or `--name` for options
    pub flags: Vec<String>,
    /// Conversion for raw tokens; `None` passes strings through
    pub value_type: Option<ValueType>,
    pub action: Action,
    pub default_value: Option<Value>,
    pub help: Option<String>,
    /// Parameter name the parsed value is stored under
    pub dest: String,
    /// `--no-<name>` counterpart of a switch, when requested
    pub negation: Option<String>,
}

impl ArgumentSpec {
    /// Options are identified by flags rather than by position
    pub fn is_option(&self) -> bool {
        self.flags.iter().any(|flag| flag.starts_with('-'))
    }

    pub fn is_switch(&self) -> bool {
        matches!(self.action, Action::StoreTrue | Action::StoreFalse)
    }

    /// A positional that must be present on the command line
    pub fn is_required(&self) -> bool {
        !self.is_option() && self.action == Action::Store
    }

    pub fn short(&self) -> Option<char> {
        self.flags
            .iter()
            .filter(|flag| !flag.starts_with("--"))
            .find_map(|flag| flag.strip_prefix('-'))
            .and_then(|rest| rest.chars().next())
    }

    pub fn long(&self) -> Option<&str> {
        self.flags.iter().find_map(|flag| flag.strip_prefix("--"))
    }
}

/// Derive the argument spec for one parameter.
///
/// `used_short_chars` holds the short flag letters already claimed in this
/// build pass; a letter this parameter claims is added to it.
pub fn derive_argument_spec(
    param: &Parameter,
    used_short_chars: &mut HashSet<char>,
) -> SignatureResult<ArgumentSpec> {
    match param.kind {
        ParamKind::PositionalOnly => return Err(SignatureError::PositionalArg(param.name.clone())),
        ParamKind::VariadicKeyword => return Err(SignatureError::KwArg(param.name.clone())),
        ParamKind::PositionalOrKeyword | ParamKind::VariadicPositional => {}
    }

    let (mut value_type, description) = classify(param.annotation.as_ref())?;
    let default = param.default.clone();

    // No explicit type: infer it from a non-null default
    if value_type.is_none() {
        value_type = default.as_ref().and_then(Value::value_type);
    }

    let mut action = Action::Store;
    let mut is_option = default.is_some();

    if param.is_variadic() {
        action = Action::CollectMany;
        is_option = false;
    } else if value_type == Some(ValueType::Bool) {
        action = match &default {
            Some(value) if value.is_truthy() => Action::StoreFalse,
            _ => Action::StoreTrue,
        };
        value_type = None;
        is_option = true;
    } else if matches!(default, Some(Value::Stream(_))) {
        // The command line names a file; the handle default stays as is
        value_type = Some(ValueType::Str);
    }

    let flags = if is_option {
        assign_flags(&param.name, used_short_chars)
    } else {
        vec![param.name.clone()]
    };

    Ok(ArgumentSpec {
        flags,
        value_type,
        action,
        default_value: default,
        help: description,
        dest: param.name.clone(),
        negation: None,
    })
}
