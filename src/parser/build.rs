//! Parser construction
//!
//! Registers one clap argument per parameter. All flag assignment happens
//! here, once; the resulting [`Parser`] is reused for every call.

use crate::error::{SignatureError, SignatureResult};
use crate::parser::classify::{derive_argument_spec, Action, ArgumentSpec};
use crate::parser::flags::{processing_order, reserved_short_flags};
use crate::signature::{validate_signature, Signature, Value, ValueType};
use clap::builder::ValueParser;
use clap::{Arg, ArgAction, Command};

/// Parser-level settings that do not come from the parameters
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    /// Program name shown in usage
    pub name: Option<String>,
    /// Text shown before the argument list
    pub description: Option<String>,
    /// Text shown after the argument list
    pub epilog: Option<String>,
    /// Add a `--no-<name>` counterpart to every switch
    pub add_nos: bool,
}

/// A built parser: the clap command plus the specs it was built from
#[derive(Debug, Clone)]
pub struct Parser {
    pub(crate) command: Command,
    pub(crate) specs: Vec<ArgumentSpec>,
    /// Hand-built command: values are read from every argument it defines
    pub(crate) custom: bool,
}

impl Parser {
    /// Use a hand-built clap command in place of a derived one.
    ///
    /// Each argument id is bound to the parameter of the same name. The
    /// command parses tokens without a program name.
    pub fn from_command(command: Command) -> Self {
        let mut command = command.no_binary_name(true);
        command.build();
        Parser {
            command,
            specs: Vec::new(),
            custom: true,
        }
    }

    /// Whether this parser wraps a hand-built command
    pub fn is_custom(&self) -> bool {
        self.custom
    }

    /// The underlying clap command
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Argument specs in registration order
    pub fn specs(&self) -> &[ArgumentSpec] {
        &self.specs
    }

    pub fn spec(&self, dest: &str) -> Option<&ArgumentSpec> {
        self.specs.iter().find(|spec| spec.dest == dest)
    }

    pub fn description(&self) -> Option<String> {
        self.command.get_about().map(|about| about.to_string())
    }

    pub fn epilog(&self) -> Option<String> {
        self.command.get_after_help().map(|epilog| epilog.to_string())
    }

    /// Full help text, as `-h` would print it
    pub fn render_help(&self) -> String {
        self.command.clone().render_help().to_string()
    }
}

/// Build a parser with a description and epilog
pub fn build_parser(
    signature: &Signature,
    description: Option<&str>,
    epilog: Option<&str>,
) -> SignatureResult<Parser> {
    let config = ParserConfig {
        description: description.map(str::to_string),
        epilog: epilog.map(str::to_string),
        ..ParserConfig::default()
    };
    build_parser_with(signature, &config)
}

/// Build a parser from a signature.
///
/// Fails on the first parameter that cannot be expressed on a command line;
/// no partially built parser is returned.
pub fn build_parser_with(signature: &Signature, config: &ParserConfig) -> SignatureResult<Parser> {
    validate_signature(signature)?;

    let name = config.name.clone().unwrap_or_else(default_program_name);
    let mut command = Command::new(name)
        .no_binary_name(true)
        .args_override_self(true);

    if let Some(description) = &config.description {
        command = command.about(description.clone());
    }
    if let Some(epilog) = &config.epilog {
        command = command.after_help(epilog.clone());
    }

    let mut used_short_chars = reserved_short_flags();
    let mut specs = Vec::with_capacity(signature.len());
    let mut after_variadic = false;

    for param in processing_order(signature.params()) {
        let mut spec = derive_argument_spec(param, &mut used_short_chars)?;

        // clap owns both the `help` id and the `--help` flag
        if spec.dest == "help" {
            return Err(SignatureError::ReservedFlag(param.name.clone()));
        }
        if spec.is_required() && after_variadic {
            return Err(SignatureError::RequiredAfterVariadic(param.name.clone()));
        }
        if spec.action == Action::CollectMany {
            after_variadic = true;
        }

        if config.add_nos && spec.is_switch() {
            spec.negation = Some(format!("no-{}", spec.dest));
        }

        tracing::debug!(
            param = %spec.dest,
            flags = ?spec.flags,
            action = ?spec.action,
            "registering argument"
        );

        command = command.arg(clap_arg(&spec));
        if let Some(negation) = &spec.negation {
            command = command.arg(negation_arg(&spec, negation));
        }

        specs.push(spec);
    }

    Ok(Parser {
        command,
        specs,
        custom: false,
    })
}

/// Program name from the running executable
fn default_program_name() -> String {
    std::env::args_os()
        .next()
        .as_ref()
        .and_then(|arg0| std::path::Path::new(arg0).file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "command".to_string())
}

/// Conversion clap applies to each raw token
fn value_parser(value_type: Option<&ValueType>) -> ValueParser {
    match value_type {
        Some(ty) => {
            let ty = ty.clone();
            ValueParser::new(move |raw: &str| ty.parse(raw))
        }
        None => ValueParser::new(|raw: &str| Ok::<_, String>(Value::Str(raw.to_string()))),
    }
}

/// Translate one spec into a clap argument
fn clap_arg(spec: &ArgumentSpec) -> Arg {
    let mut arg = Arg::new(spec.dest.clone());

    if let Some(help) = &spec.help {
        arg = arg.help(help.clone());
    }

    let numeric = matches!(spec.value_type, Some(ValueType::Int | ValueType::Float));

    arg = match spec.action {
        Action::StoreTrue | Action::StoreFalse => arg.action(ArgAction::SetTrue),
        Action::Store => arg
            .action(ArgAction::Set)
            .value_parser(value_parser(spec.value_type.as_ref()))
            .allow_negative_numbers(numeric),
        Action::CollectMany => arg
            .action(ArgAction::Append)
            .num_args(0..)
            .value_parser(value_parser(spec.value_type.as_ref()))
            .allow_negative_numbers(numeric),
    };

    if spec.is_option() {
        if let Some(short) = spec.short() {
            arg = arg.short(short);
        }
        if let Some(long) = spec.long() {
            arg = arg.long(long.to_string());
        }
        if spec.action == Action::Store {
            arg = arg.value_name(spec.dest.to_uppercase());
        }
        if let Some(negation) = &spec.negation {
            arg = arg.overrides_with(negation.clone());
        }
    } else {
        arg = arg
            .value_name(spec.dest.clone())
            .required(spec.is_required());
    }

    arg
}

/// `--no-<name>`: puts a switch back to its default, whichever comes last wins
fn negation_arg(spec: &ArgumentSpec, negation: &str) -> Arg {
    Arg::new(negation.to_string())
        .long(negation.to_string())
        .action(ArgAction::SetTrue)
        .help(format!("Reset {} to its default", spec.dest))
        .overrides_with(spec.dest.clone())
}
