//! Parsing and binding
//!
//! Raw tokens go through clap; the parsed values are then laid back onto the
//! signature as the positional and keyword arguments of a call.

use crate::parser::build::Parser;
use crate::parser::classify::{Action, ArgumentSpec};
use crate::signature::{Signature, Value};
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;

/// Parsed values by destination name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    values: BTreeMap<String, Value>,
}

impl ParsedArgs {
    pub fn get(&self, dest: &str) -> Option<&Value> {
        self.values.get(dest)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_map(self) -> BTreeMap<String, Value> {
        self.values
    }
}

impl Parser {
    /// Parse tokens (without the program name), returning clap's error on
    /// bad input or a help request
    pub fn try_parse<I, T>(&self, args: I) -> Result<ParsedArgs, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().try_get_matches_from(args)?;
        Ok(self.extract(&matches))
    }

    /// Parse tokens (without the program name).
    ///
    /// Bad input prints usage and exits with status 2; `-h` prints help and
    /// exits with status 0.
    pub fn parse<I, T>(&self, args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().get_matches_from(args);
        self.extract(&matches)
    }

    fn extract(&self, matches: &ArgMatches) -> ParsedArgs {
        if self.custom {
            return extract_all(&self.command, matches);
        }

        let values = self
            .specs
            .iter()
            .map(|spec| (spec.dest.clone(), extract_value(spec, matches)))
            .collect();
        ParsedArgs { values }
    }
}

/// The value for one spec, falling back to its default when absent
fn extract_value(spec: &ArgumentSpec, matches: &ArgMatches) -> Value {
    match spec.action {
        Action::StoreTrue | Action::StoreFalse => {
            if matches.get_flag(&spec.dest) {
                Value::Bool(spec.action == Action::StoreTrue)
            } else {
                spec.default_value
                    .clone()
                    .unwrap_or(Value::Bool(spec.action == Action::StoreFalse))
            }
        }
        Action::Store => matches
            .get_one::<Value>(&spec.dest)
            .cloned()
            .or_else(|| spec.default_value.clone())
            .unwrap_or(Value::None),
        Action::CollectMany => match matches.get_many::<Value>(&spec.dest) {
            Some(values) => Value::List(values.cloned().collect()),
            None => spec
                .default_value
                .clone()
                .unwrap_or_else(|| Value::List(Vec::new())),
        },
    }
}

/// Every value a hand-built command defines, keyed by argument id
fn extract_all(command: &Command, matches: &ArgMatches) -> ParsedArgs {
    let values = command
        .get_arguments()
        .filter(|arg| {
            !matches!(
                arg.get_action(),
                ArgAction::Help | ArgAction::HelpShort | ArgAction::HelpLong | ArgAction::Version
            )
        })
        .map(|arg| (arg.get_id().to_string(), any_value(arg, matches)))
        .collect();
    ParsedArgs { values }
}

/// Read one argument whatever value parser it was given
fn any_value(arg: &Arg, matches: &ArgMatches) -> Value {
    let id = arg.get_id().as_str();
    let multiple = matches!(arg.get_action(), ArgAction::Append)
        || arg
            .get_num_args()
            .map_or(false, |range| range.max_values() > 1);

    typed::<Value>(matches, id, multiple, |v| v)
        .or_else(|| typed::<String>(matches, id, multiple, Value::Str))
        .or_else(|| typed::<bool>(matches, id, multiple, Value::Bool))
        .or_else(|| typed::<i64>(matches, id, multiple, Value::Int))
        .or_else(|| typed::<u8>(matches, id, multiple, |n| Value::Int(n.into())))
        .or_else(|| typed::<f64>(matches, id, multiple, Value::Float))
        .or_else(|| {
            typed::<PathBuf>(matches, id, multiple, |p| {
                Value::Str(p.to_string_lossy().into_owned())
            })
        })
        .unwrap_or_else(|| raw_value(matches, id, multiple))
}

/// `None` when the argument holds values of some other type
fn typed<T>(matches: &ArgMatches, id: &str, multiple: bool, into: fn(T) -> Value) -> Option<Value>
where
    T: Clone + Send + Sync + 'static,
{
    if multiple {
        let values = matches.try_get_many::<T>(id).ok()?;
        Some(Value::List(
            values.into_iter().flatten().cloned().map(into).collect(),
        ))
    } else {
        let value = matches.try_get_one::<T>(id).ok()?;
        Some(value.cloned().map_or(Value::None, into))
    }
}

fn raw_value(matches: &ArgMatches, id: &str, multiple: bool) -> Value {
    let mut values = matches
        .get_raw(id)
        .into_iter()
        .flatten()
        .map(|raw| Value::Str(raw.to_string_lossy().into_owned()));

    if multiple {
        Value::List(values.collect())
    } else {
        values.next().unwrap_or(Value::None)
    }
}

/// Arguments ready to be passed to the target function
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoundArgs {
    positional: Vec<Value>,
    #[serde(rename = "keyword")]
    keywords: BTreeMap<String, Value>,
    /// Names of the leading positional values
    #[serde(skip)]
    positional_names: Vec<String>,
    /// Name of the variadic parameter whose values trail the named ones
    #[serde(skip)]
    variadic: Option<String>,
}

impl BoundArgs {
    /// Positional arguments in call order, variadic values last
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Keyword arguments by parameter name
    pub fn keywords(&self) -> &BTreeMap<String, Value> {
        &self.keywords
    }

    /// Values collected by the variadic parameter
    pub fn rest(&self) -> &[Value] {
        &self.positional[self.positional_names.len()..]
    }

    /// Look up a bound value by parameter name.
    ///
    /// The variadic parameter is not found here; use [`BoundArgs::rest`].
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.positional_names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.positional[i])
            .or_else(|| self.keywords.get(name))
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Every argument as a name/value pair: named positionals, then the
    /// variadic list, then keywords
    pub fn arguments(&self) -> Vec<(&str, Value)> {
        let mut pairs: Vec<(&str, Value)> = self
            .positional_names
            .iter()
            .zip(&self.positional)
            .map(|(name, value)| (name.as_str(), value.clone()))
            .collect();

        if let Some(variadic) = &self.variadic {
            pairs.push((variadic.as_str(), Value::List(self.rest().to_vec())));
        }

        pairs.extend(self.keywords.iter().map(|(k, v)| (k.as_str(), v.clone())));
        pairs
    }

    pub fn into_parts(self) -> (Vec<Value>, BTreeMap<String, Value>) {
        (self.positional, self.keywords)
    }
}

/// Lay parsed values onto a signature.
///
/// With a variadic parameter, everything declared before it is bound by
/// position and its values follow; every other parameter is bound by name.
pub fn bind(signature: &Signature, parsed: ParsedArgs) -> BoundArgs {
    // Start empty and overlay everything that was parsed
    let mut arguments: BTreeMap<String, Value> = BTreeMap::new();
    arguments.extend(parsed.into_map());

    let mut bound = BoundArgs::default();

    if let Some(index) = signature.variadic_index() {
        for param in &signature.params()[..index] {
            if let Some(value) = arguments.remove(&param.name) {
                bound.positional_names.push(param.name.clone());
                bound.positional.push(value);
            }
        }

        let variadic = &signature.params()[index].name;
        match arguments.remove(variadic) {
            Some(Value::List(values)) => bound.positional.extend(values),
            Some(other) => bound.positional.push(other),
            None => {}
        }
        bound.variadic = Some(variadic.clone());
    }

    bound.keywords = arguments;
    bound
}

/// Parse `raw_args`, bind them onto `signature` and call `target`.
///
/// Bad input or `-h` ends the process through clap before `target` runs.
pub fn invoke<I, T, F, R>(parser: &Parser, raw_args: I, target: F, signature: &Signature) -> R
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    F: FnOnce(BoundArgs) -> R,
{
    let parsed = parser.parse(raw_args);
    target(bind(signature, parsed))
}

/// Like [`invoke`], but hands back clap's error instead of exiting
pub fn try_invoke<I, T, F, R>(
    parser: &Parser,
    raw_args: I,
    target: F,
    signature: &Signature,
) -> Result<R, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    F: FnOnce(BoundArgs) -> R,
{
    let parsed = parser.try_parse(raw_args)?;
    Ok(target(bind(signature, parsed)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::build::build_parser;
    use crate::signature::{Parameter, ValueType};

    #[test]
    fn test_bind_without_variadic_is_all_keywords() {
        let sig = Signature::new()
            .param(Parameter::new("a"))
            .param(Parameter::new("b").with_default(2));
        let parser = build_parser(&sig, None, None).unwrap();
        let bound = bind(&sig, parser.try_parse(["x"]).unwrap());

        assert!(bound.positional().is_empty());
        assert_eq!(bound.keywords().get("a"), Some(&Value::from("x")));
        assert_eq!(bound.keywords().get("b"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_bind_with_variadic() {
        let sig = Signature::new()
            .param(Parameter::new("first"))
            .param(Parameter::variadic("rest").with_annotation(ValueType::Int))
            .param(Parameter::new("scale").with_default(1.5));
        let parser = build_parser(&sig, None, None).unwrap();
        let bound = bind(&sig, parser.try_parse(["x", "1", "2", "-s", "3"]).unwrap());

        assert_eq!(
            bound.positional(),
            &[Value::from("x"), Value::Int(1), Value::Int(2)]
        );
        assert_eq!(bound.rest(), &[Value::Int(1), Value::Int(2)]);
        assert_eq!(bound.get_str("first"), Some("x"));
        assert_eq!(bound.get("scale"), Some(&Value::Float(3.0)));
        assert_eq!(bound.get("rest"), None);
    }

    #[test]
    fn test_arguments_lists_every_name() {
        let sig = Signature::new()
            .param(Parameter::new("first"))
            .param(Parameter::variadic("rest"))
            .param(Parameter::new("flag").with_default(false));
        let parser = build_parser(&sig, None, None).unwrap();
        let bound = bind(&sig, parser.try_parse(["x", "y", "-f"]).unwrap());

        assert_eq!(
            bound.arguments(),
            vec![
                ("first", Value::from("x")),
                ("rest", Value::List(vec![Value::from("y")])),
                ("flag", Value::Bool(true)),
            ]
        );
    }

    #[test]
    fn test_custom_command_values() {
        let command = Command::new("custom")
            .arg(Arg::new("name"))
            .arg(
                Arg::new("count")
                    .short('c')
                    .value_parser(clap::value_parser!(i64))
                    .default_value("1"),
            )
            .arg(Arg::new("tag").short('t').action(ArgAction::Append))
            .arg(Arg::new("debug").short('d').action(ArgAction::SetTrue))
            .arg(Arg::new("level").short('l').action(ArgAction::Count));
        let parser = Parser::from_command(command);

        let parsed = parser
            .try_parse(["x", "-c", "3", "-t", "a", "-t", "b", "-ll"])
            .unwrap();
        assert_eq!(parsed.get("name"), Some(&Value::from("x")));
        assert_eq!(parsed.get("count"), Some(&Value::Int(3)));
        assert_eq!(
            parsed.get("tag"),
            Some(&Value::List(vec![Value::from("a"), Value::from("b")]))
        );
        assert_eq!(parsed.get("debug"), Some(&Value::Bool(false)));
        assert_eq!(parsed.get("level"), Some(&Value::Int(2)));
        assert_eq!(parsed.get("help"), None);

        let parsed = parser.try_parse(Vec::<String>::new()).unwrap();
        assert_eq!(parsed.get("name"), Some(&Value::None));
        assert_eq!(parsed.get("count"), Some(&Value::Int(1)));
        assert_eq!(parsed.get("tag"), Some(&Value::List(vec![])));
    }

    #[test]
    fn test_try_invoke_returns_target_result() {
        let sig = Signature::new().param(Parameter::new("n").with_annotation(ValueType::Int));
        let parser = build_parser(&sig, None, None).unwrap();

        let doubled = try_invoke(&parser, ["21"], |args| args.get_int("n").unwrap() * 2, &sig);
        assert_eq!(doubled.unwrap(), 42);

        let err = try_invoke(&parser, ["x"], |_| (), &sig).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
