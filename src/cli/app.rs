//! Main CLI application

use crate::error::SigparseError;
use crate::parser::BoundArgs;
use crate::runner::{autocommand, AutoCommand};
use crate::signature::{parse_signature_auto, parse_signature_file, SignatureFile, Value};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueEnum};
use clap_complete::Shell;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// How the bound call is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `positional:` list and `keyword:` map
    Yaml,
    /// `name='value'` lines for `eval`
    Shell,
}

/// CLI application
pub struct App {
    /// Parsed signature file
    file: SignatureFile,
    /// Signature file path
    path: PathBuf,
}

impl App {
    /// Create an app from a discovered signature file
    pub fn new() -> Result<Self, SigparseError> {
        let (file, path) = parse_signature_auto()?;
        Ok(App { file, path })
    }

    /// Create an app with a specific signature file
    pub fn with_signature_file(path: PathBuf) -> Result<Self, SigparseError> {
        let file = parse_signature_file(&path)?;
        Ok(App { file, path })
    }

    /// Program name for the described command
    fn program_name(&self) -> String {
        self.file.name.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "command".to_string())
        })
    }

    /// Build the command described by the signature file
    pub fn command(&self) -> Result<AutoCommand<fn(BoundArgs) -> BoundArgs>, SigparseError> {
        let mut builder = autocommand(self.file.signature())
            .name(self.program_name())
            .add_nos(self.file.add_nos);

        if let Some(description) = &self.file.description {
            builder = builder.description(description.clone());
        }
        if let Some(epilog) = &self.file.epilog {
            builder = builder.epilog(epilog.clone());
        }
        if let Some(doc) = &self.file.doc {
            builder = builder.doc(doc.clone());
        }

        let identity: fn(BoundArgs) -> BoundArgs = |bound| bound;
        Ok(builder.build(identity)?)
    }

    /// Run the application with parsed outer matches
    pub fn run(self, matches: &ArgMatches) -> Result<(), SigparseError> {
        let command = self.command()?;

        if let Some(shell) = matches.get_one::<Shell>("completions") {
            let mut clap_command = command.parser().command().clone();
            clap_complete::generate(*shell, &mut clap_command, self.program_name(), &mut io::stdout());
            return Ok(());
        }

        let args: Vec<OsString> = matches
            .get_many::<OsString>("args")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        tracing::debug!(file = %self.path.display(), count = args.len(), "parsing arguments");
        let bound = command.try_call(args)?;

        let format = matches
            .get_one::<OutputFormat>("output")
            .copied()
            .unwrap_or(OutputFormat::Yaml);

        let rendered = match format {
            OutputFormat::Yaml => serde_yaml::to_string(&bound)?,
            OutputFormat::Shell => render_shell(&bound),
        };
        print!("{}", rendered);

        Ok(())
    }
}

/// Build the outer clap command
fn build_cli() -> Command {
    Command::new("sigparse")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse command-line arguments against a function signature")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Path to sigparse.yml signature file"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FORMAT")
                .value_parser(clap::value_parser!(OutputFormat))
                .default_value("yaml")
                .help("How to print the bound arguments"),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .value_parser(clap::value_parser!(Shell))
                .help("Print a completion script for the described command"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print debug logging")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("args")
                .value_name("ARGS")
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .value_parser(clap::value_parser!(OsString))
                .help("Arguments for the described command (after --)"),
        )
}

/// Install the stderr log subscriber
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Quote a string for POSIX shells
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

fn shell_value(value: &Value) -> String {
    match value {
        Value::None => "''".to_string(),
        Value::List(items) => {
            let quoted: Vec<String> = items.iter().map(|v| shell_quote(&v.to_string())).collect();
            format!("({})", quoted.join(" "))
        }
        other => shell_quote(&other.to_string()),
    }
}

/// Render the bound arguments as shell assignments, one per line
fn render_shell(bound: &BoundArgs) -> String {
    bound
        .arguments()
        .iter()
        .map(|(name, value)| format!("{}={}\n", name, shell_value(value)))
        .collect()
}

/// Run the CLI application with process arguments.
///
/// Command-line errors and help requests are printed by clap, which exits
/// with its own status (2 for usage errors, 0 for help).
pub fn run() -> Result<(), SigparseError> {
    match run_from(std::env::args_os()) {
        Err(SigparseError::Parse(e)) => e.exit(),
        result => result,
    }
}

/// Run the CLI application with the given arguments (program name first)
pub fn run_from<I, T>(args: I) -> Result<(), SigparseError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_cli().try_get_matches_from(args)?;
    init_tracing(matches.get_flag("verbose"));

    let app = match matches.get_one::<PathBuf>("file") {
        Some(path) => App::with_signature_file(path.clone())?,
        None => App::new()?,
    };

    app.run(&matches)
}
