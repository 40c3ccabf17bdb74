//! Functions wrapped with a derived command-line interface

use crate::error::SignatureResult;
use crate::parser::{bind, build_parser_with, split_docstring, BoundArgs, Parser, ParserConfig};
use crate::runner::entry::{run_main, IntoExitCode};
use crate::signature::{validate_signature, Signature};
use clap::Command;
use std::ffi::OsString;

/// Start describing a command for `signature`
pub fn autocommand(signature: Signature) -> AutoCommandBuilder {
    AutoCommandBuilder::new(signature)
}

/// Collects parser settings before the parser is built
#[derive(Debug, Clone)]
pub struct AutoCommandBuilder {
    signature: Signature,
    config: ParserConfig,
    doc: Option<String>,
    command: Option<Command>,
}

impl AutoCommandBuilder {
    pub fn new(signature: Signature) -> Self {
        AutoCommandBuilder {
            signature,
            config: ParserConfig::default(),
            doc: None,
            command: None,
        }
    }

    /// Program name shown in usage
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config.description = Some(description.into());
        self
    }

    pub fn epilog(mut self, epilog: impl Into<String>) -> Self {
        self.config.epilog = Some(epilog.into());
        self
    }

    /// Doc text supplying the description and epilog not given explicitly
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Give every switch a `--no-<name>` counterpart
    pub fn add_nos(mut self, add_nos: bool) -> Self {
        self.config.add_nos = add_nos;
        self
    }

    /// Parse with a hand-built clap command instead of deriving one.
    ///
    /// Argument ids are matched to parameter names. Name, description,
    /// epilog, doc and `add_nos` are then ignored.
    pub fn parser(mut self, command: Command) -> Self {
        self.command = Some(command);
        self
    }

    /// Build the parser now and attach `main` to it.
    ///
    /// Every signature problem surfaces here, before any command line is
    /// parsed.
    pub fn build<F, R>(self, main: F) -> SignatureResult<AutoCommand<F>>
    where
        F: Fn(BoundArgs) -> R,
    {
        if let Some(command) = self.command {
            validate_signature(&self.signature)?;
            return Ok(AutoCommand {
                signature: self.signature,
                parser: Parser::from_command(command),
                main,
            });
        }

        let mut config = self.config;

        if let Some(doc) = &self.doc {
            let parts = split_docstring(doc)?;
            config.description = config.description.or(parts.description);
            config.epilog = config.epilog.or(parts.epilog);
        }

        let parser = build_parser_with(&self.signature, &config)?;

        Ok(AutoCommand {
            signature: self.signature,
            parser,
            main,
        })
    }
}

/// A function together with the parser derived from its signature
pub struct AutoCommand<F> {
    signature: Signature,
    parser: Parser,
    main: F,
}

impl<F, R> AutoCommand<F>
where
    F: Fn(BoundArgs) -> R,
{
    /// Parse `args` (without the program name) and call the function.
    ///
    /// Bad input or `-h` ends the process through clap.
    pub fn call<I, T>(&self, args: I) -> R
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let parsed = self.parser.parse(args);
        (self.main)(bind(&self.signature, parsed))
    }

    /// Like [`AutoCommand::call`], but returns clap's error instead of exiting
    pub fn try_call<I, T>(&self, args: I) -> Result<R, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let parsed = self.parser.try_parse(args)?;
        Ok((self.main)(bind(&self.signature, parsed)))
    }

    /// Call with the process arguments and exit with the result
    pub fn run_as_entry_point(&self) -> !
    where
        R: IntoExitCode,
    {
        run_main(|| self.call(std::env::args_os().skip(1)))
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The wrapped function, callable directly
    pub fn main(&self) -> &F {
        &self.main
    }
}
