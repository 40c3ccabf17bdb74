//! Core signature types
//!
//! This module defines the parameter descriptors a caller builds (or loads from
//! a signature file) to describe the function a parser is derived from.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// A dynamically typed value: a parameter default or a parsed argument
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    /// An already-open standard stream, used as a file-like default
    Stream(StdStream),
}

/// The standard streams a parameter can default to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StdStream {
    Stdin,
    Stdout,
    Stderr,
}

impl Value {
    /// Truthiness of the value; decides which way a boolean switch flips
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Stream(_) => true,
        }
    }

    /// The coercion a default of this value implies, if any.
    ///
    /// `None`, lists and streams imply nothing: the command line hands them
    /// over as plain strings.
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Value::Bool(_) => Some(ValueType::Bool),
            Value::Int(_) => Some(ValueType::Int),
            Value::Float(_) => Some(ValueType::Float),
            Value::Str(_) => Some(ValueType::Str),
            Value::None | Value::List(_) | Value::Stream(_) => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", parts.join(" "))
            }
            Value::Stream(stream) => write!(f, "{}", stream),
        }
    }
}

impl fmt::Display for StdStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StdStream::Stdin => write!(f, "<stdin>"),
            StdStream::Stdout => write!(f, "<stdout>"),
            StdStream::Stderr => write!(f, "<stderr>"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<StdStream> for Value {
    fn from(stream: StdStream) -> Self {
        Value::Stream(stream)
    }
}

impl TryFrom<serde_yaml::Value> for Value {
    type Error = String;

    fn try_from(value: serde_yaml::Value) -> Result<Self, Self::Error> {
        use serde_yaml::Value as Yaml;

        match value {
            Yaml::Null => Ok(Value::None),
            Yaml::Bool(b) => Ok(Value::Bool(b)),
            Yaml::Number(n) => match n.as_i64() {
                Some(i) => Ok(Value::Int(i)),
                None => n
                    .as_f64()
                    .map(Value::Float)
                    .ok_or_else(|| format!("unsupported number: {}", n)),
            },
            Yaml::String(s) => Ok(Value::Str(s)),
            Yaml::Sequence(seq) => seq
                .into_iter()
                .map(Value::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            // `{stream: stdout}` names a standard stream
            Yaml::Mapping(map) => {
                let stream = map
                    .get("stream")
                    .filter(|_| map.len() == 1)
                    .ok_or_else(|| "a mapping value must be {stream: <name>}".to_string())?;
                StdStream::deserialize(stream.clone())
                    .map(Value::Stream)
                    .map_err(|e| e.to_string())
            }
            Yaml::Tagged(tagged) => Err(format!("unsupported tagged value: {}", tagged.tag)),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let value = serde_yaml::Value::deserialize(deserializer)?;
        Value::try_from(value).map_err(D::Error::custom)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::None => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::List(items) => items.serialize(serializer),
            Value::Stream(stream) => serializer.collect_str(stream),
        }
    }
}

/// Signature of a user-supplied conversion from command-line text
pub type ParseFn = dyn Fn(&str) -> Result<Value, String> + Send + Sync;

/// How raw command-line text is converted into a [`Value`]
#[derive(Clone)]
pub enum ValueType {
    Str,
    Int,
    Float,
    Bool,
    Custom { name: String, parse: Arc<ParseFn> },
}

impl ValueType {
    /// Create a named custom conversion
    pub fn custom<F>(name: impl Into<String>, parse: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        ValueType::Custom {
            name: name.into(),
            parse: Arc::new(parse),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ValueType::Str => "str",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Bool => "bool",
            ValueType::Custom { name, .. } => name,
        }
    }

    /// Convert one raw token
    pub fn parse(&self, raw: &str) -> Result<Value, String> {
        match self {
            ValueType::Str => Ok(Value::Str(raw.to_string())),
            ValueType::Int => raw
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| format!("invalid int value: '{}'", raw)),
            ValueType::Float => raw
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| format!("invalid float value: '{}'", raw)),
            ValueType::Bool => Ok(Value::Bool(!raw.is_empty())),
            ValueType::Custom { name, parse } => {
                parse(raw).map_err(|e| format!("invalid {} value: '{}' ({})", name, raw, e))
            }
        }
    }

    /// Look up a builtin type by the name used in signature files
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "str" | "string" => Some(ValueType::Str),
            "int" | "integer" => Some(ValueType::Int),
            "float" => Some(ValueType::Float),
            "bool" | "boolean" => Some(ValueType::Bool),
            _ => None,
        }
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueType({})", self.name())
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueType::Custom { name: a, parse: pa }, ValueType::Custom { name: b, parse: pb }) => {
                a == b && Arc::ptr_eq(pa, pb)
            }
            (ValueType::Custom { .. }, _) | (_, ValueType::Custom { .. }) => false,
            _ => self.name() == other.name(),
        }
    }
}

impl<'de> Deserialize<'de> for ValueType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let name = String::deserialize(deserializer)?;
        ValueType::from_name(&name).ok_or_else(|| {
            D::Error::custom(format!(
                "Invalid type: {}. Must be one of: str, int, float, bool",
                name
            ))
        })
    }
}

/// Per-parameter annotation, as written by the caller.
///
/// Anything can be written here; only a type, a description, or a pair of
/// one of each (in either order) is accepted when the parser is built.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Type(ValueType),
    Text(String),
    Tuple(Vec<Annotation>),
    Literal(Value),
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Type(ty) => write!(f, "<type {}>", ty.name()),
            Annotation::Text(text) => write!(f, "{:?}", text),
            Annotation::Tuple(items) => {
                let parts: Vec<String> = items.iter().map(|a| a.to_string()).collect();
                write!(f, "({})", parts.join(", "))
            }
            Annotation::Literal(value) => write!(f, "{}", value),
        }
    }
}

impl From<ValueType> for Annotation {
    fn from(ty: ValueType) -> Self {
        Annotation::Type(ty)
    }
}

impl From<&str> for Annotation {
    fn from(text: &str) -> Self {
        Annotation::Text(text.to_string())
    }
}

impl From<String> for Annotation {
    fn from(text: String) -> Self {
        Annotation::Text(text)
    }
}

impl From<(ValueType, &str)> for Annotation {
    fn from((ty, text): (ValueType, &str)) -> Self {
        Annotation::Tuple(vec![ty.into(), text.into()])
    }
}

impl From<(&str, ValueType)> for Annotation {
    fn from((text, ty): (&str, ValueType)) -> Self {
        Annotation::Tuple(vec![text.into(), ty.into()])
    }
}

impl TryFrom<serde_yaml::Value> for Annotation {
    type Error = String;

    fn try_from(value: serde_yaml::Value) -> Result<Self, Self::Error> {
        use serde_yaml::Value as Yaml;

        match value {
            Yaml::String(text) => Ok(Annotation::Text(text)),
            Yaml::Sequence(seq) => seq
                .into_iter()
                .map(Annotation::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Annotation::Tuple),
            // `{type: int}` names a type
            Yaml::Mapping(ref map) if map.len() == 1 && map.contains_key("type") => {
                let ty = map.get("type").cloned().unwrap_or(Yaml::Null);
                ValueType::deserialize(ty)
                    .map(Annotation::Type)
                    .map_err(|e| e.to_string())
            }
            other => Value::try_from(other).map(Annotation::Literal),
        }
    }
}

impl<'de> Deserialize<'de> for Annotation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let value = serde_yaml::Value::deserialize(deserializer)?;
        Annotation::try_from(value).map_err(D::Error::custom)
    }
}

/// How a parameter accepts its argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParamKind {
    #[default]
    PositionalOrKeyword,
    #[serde(alias = "variadic")]
    VariadicPositional,
    VariadicKeyword,
    PositionalOnly,
}

/// One entry in a function's ordered parameter list
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    /// Parameter name, also the destination name of the parsed value
    pub name: String,

    /// Parameter kind
    #[serde(default)]
    pub kind: ParamKind,

    /// Default value. `Some(Value::None)` is an explicit null default,
    /// distinct from having no default at all.
    #[serde(default, deserialize_with = "deserialize_default")]
    pub default: Option<Value>,

    /// Type and/or help text
    #[serde(default)]
    pub annotation: Option<Annotation>,
}

impl Parameter {
    /// A plain positional-or-keyword parameter with no default
    pub fn new(name: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            kind: ParamKind::PositionalOrKeyword,
            default: None,
            annotation: None,
        }
    }

    /// A variadic positional parameter (`*args`)
    pub fn variadic(name: impl Into<String>) -> Self {
        Parameter::new(name).with_kind(ParamKind::VariadicPositional)
    }

    pub fn with_kind(mut self, kind: ParamKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<Annotation>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn is_variadic(&self) -> bool {
        self.kind == ParamKind::VariadicPositional
    }
}

/// A present `default:` key always means a default, even when it is null
fn deserialize_default<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A function's ordered parameter list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    params: Vec<Parameter>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter
    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Position of the variadic positional parameter, if there is one
    pub fn variadic_index(&self) -> Option<usize> {
        self.params.iter().position(Parameter::is_variadic)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl From<Vec<Parameter>> for Signature {
    fn from(params: Vec<Parameter>) -> Self {
        Signature { params }
    }
}

impl FromIterator<Parameter> for Signature {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        Signature {
            params: iter.into_iter().collect(),
        }
    }
}

/// A signature file: the parameter list plus parser metadata
#[derive(Debug, Clone, Deserialize)]
pub struct SignatureFile {
    /// Program name shown in usage (optional)
    #[serde(default)]
    pub name: Option<String>,

    /// Text shown before the argument list
    #[serde(default)]
    pub description: Option<String>,

    /// Text shown after the argument list
    #[serde(default)]
    pub epilog: Option<String>,

    /// Docstring-style text; split into description and epilog when those
    /// are not given
    #[serde(default)]
    pub doc: Option<String>,

    /// Add `--no-<name>` counterparts to every switch
    #[serde(default)]
    pub add_nos: bool,

    /// Parameters in declaration order
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl SignatureFile {
    pub fn signature(&self) -> Signature {
        Signature::from(self.parameters.clone())
    }
}
