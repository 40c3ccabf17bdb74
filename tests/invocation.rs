//! Integration tests for wrapping and calling functions

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgGroup, Command};
use sigparse::parser::{build_parser, build_parser_with, ParserConfig};
use sigparse::runner::{autocommand, blocking, default_runtime, smart_open_read};
use sigparse::signature::{Annotation, ParamKind, Parameter, Signature, StdStream, Value, ValueType};
use sigparse::{BoundArgs, SignatureError};
use std::io::Read;
use std::sync::Arc;
use tempfile::TempDir;

fn greet_signature() -> Signature {
    Signature::new()
        .param(Parameter::new("name").with_annotation("Who to greet"))
        .param(Parameter::new("times").with_default(1))
        .param(Parameter::new("loud").with_default(false))
}

#[test]
fn test_basic_invocation() {
    let greet = autocommand(greet_signature())
        .build(|args: BoundArgs| {
            let mut greeting = format!("Hello, {}", args.get_str("name").unwrap());
            if args.get_bool("loud").unwrap() {
                greeting = greeting.to_uppercase();
            }
            vec![greeting; args.get_int("times").unwrap() as usize]
        })
        .unwrap();

    assert_eq!(greet.call(["world"]), vec!["Hello, world"]);
    assert_eq!(
        greet.call(["bob", "-t", "2", "--loud"]),
        vec!["HELLO, BOB", "HELLO, BOB"]
    );
}

#[test]
fn test_variadic_capture() {
    let sig = Signature::new()
        .param(Parameter::new("arg1"))
        .param(Parameter::variadic("args"));
    let cmd = autocommand(sig).build(|args: BoundArgs| args).unwrap();

    let bound = cmd.call(["x", "y", "z"]);
    assert_eq!(
        bound.positional(),
        &[Value::from("x"), Value::from("y"), Value::from("z")]
    );
    assert_eq!(bound.get_str("arg1"), Some("x"));
    assert_eq!(bound.rest(), &[Value::from("y"), Value::from("z")]);
    assert!(bound.keywords().is_empty());

    let bound = cmd.call(["x"]);
    assert_eq!(bound.positional(), &[Value::from("x")]);
    assert!(bound.rest().is_empty());
}

#[test]
fn test_help_contains_description_and_epilog() {
    let cmd = autocommand(greet_signature())
        .name("greet")
        .description("Say hello to someone")
        .epilog("Report bugs to the issue tracker")
        .build(|_| ())
        .unwrap();

    let err = cmd.try_call(["-h"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayHelp);

    let help = err.to_string();
    assert!(help.contains("Say hello to someone"));
    assert!(help.contains("Report bugs to the issue tracker"));
    assert!(help.contains("Who to greet"));
    assert!(help.contains("--times"));
}

#[test]
fn test_docstring_fills_help() {
    let cmd = autocommand(greet_signature())
        .doc("Say hello to someone\n\n------\n\nSee the manual for more")
        .build(|_| ())
        .unwrap();

    assert_eq!(
        cmd.parser().description(),
        Some("Say hello to someone".to_string())
    );
    assert_eq!(
        cmd.parser().epilog(),
        Some("See the manual for more".to_string())
    );
}

#[test]
fn test_explicit_description_beats_docstring() {
    let cmd = autocommand(greet_signature())
        .description("Explicit")
        .doc("From the docs\n----\nEpilog from the docs")
        .build(|_| ())
        .unwrap();

    assert_eq!(cmd.parser().description(), Some("Explicit".to_string()));
    assert_eq!(
        cmd.parser().epilog(),
        Some("Epilog from the docs".to_string())
    );
}

#[test]
fn test_bad_docstring() {
    let result = autocommand(greet_signature())
        .doc("One\n----\nTwo\n----\nThree")
        .build(|_| ());
    assert_eq!(result.err(), Some(SignatureError::TooManySplits));
}

#[test]
fn test_unsupported_parameters_rejected_at_build() {
    let kwargs = Signature::new()
        .param(Parameter::new("a"))
        .param(Parameter::new("options").with_kind(ParamKind::VariadicKeyword));
    assert_eq!(
        build_parser(&kwargs, None, None).unwrap_err(),
        SignatureError::KwArg("options".to_string())
    );

    let positional_only = Signature::new()
        .param(Parameter::new("a").with_kind(ParamKind::PositionalOnly));
    assert_eq!(
        build_parser(&positional_only, None, None).unwrap_err(),
        SignatureError::PositionalArg("a".to_string())
    );
}

#[test]
fn test_bad_annotations_rejected_at_build() {
    let literal = Signature::new()
        .param(Parameter::new("a").with_annotation(Annotation::Literal(Value::Int(3))));
    assert!(matches!(
        build_parser(&literal, None, None),
        Err(SignatureError::Annotation(_))
    ));

    let two_types = Signature::new().param(Parameter::new("a").with_annotation(
        Annotation::Tuple(vec![ValueType::Int.into(), ValueType::Str.into()]),
    ));
    assert!(matches!(
        build_parser(&two_types, None, None),
        Err(SignatureError::Annotation(_))
    ));

    let reversed = Signature::new()
        .param(Parameter::new("a").with_annotation(("count of things", ValueType::Int)));
    assert!(build_parser(&reversed, None, None).is_ok());
}

#[test]
fn test_add_nos_last_wins() {
    let sig = Signature::new().param(Parameter::new("verbose").with_default(false));
    let cmd = autocommand(sig)
        .add_nos(true)
        .build(|args: BoundArgs| args.get_bool("verbose"))
        .unwrap();

    assert_eq!(cmd.call(["--verbose"]), Some(true));
    assert_eq!(cmd.call(["--verbose", "--no-verbose"]), Some(false));
    assert_eq!(cmd.call(["--no-verbose", "--verbose"]), Some(true));
    assert_eq!(cmd.call(Vec::<String>::new()), Some(false));
}

#[test]
fn test_negation_cannot_shadow_a_parameter() {
    let sig = Signature::new()
        .param(Parameter::new("verbose").with_default(false))
        .param(Parameter::new("no-verbose").with_default(false));
    let config = ParserConfig {
        add_nos: true,
        ..ParserConfig::default()
    };

    assert_eq!(
        build_parser_with(&sig, &config).unwrap_err(),
        SignatureError::InvalidName("no-verbose".to_string())
    );

    // An underscore name keeps its own flag next to the generated one
    let sig = Signature::new()
        .param(Parameter::new("verbose").with_default(false))
        .param(Parameter::new("no_verbose").with_default(false));
    let parser = build_parser_with(&sig, &config).unwrap();
    let parsed = parser.try_parse(["--verbose", "--no_verbose"]).unwrap();
    assert_eq!(parsed.get("verbose"), Some(&Value::Bool(true)));
    assert_eq!(parsed.get("no_verbose"), Some(&Value::Bool(true)));
}

#[test]
fn test_hand_built_parser() {
    let command = Command::new("custom")
        .arg(Arg::new("arg"))
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue),
        )
        .group(ArgGroup::new("mode").args(["verbose", "quiet"]));

    let sig = Signature::new()
        .param(Parameter::new("arg"))
        .param(Parameter::new("verbose"))
        .param(Parameter::new("quiet"));
    let cmd = autocommand(sig)
        .parser(command)
        .build(|args: BoundArgs| {
            (
                args.get("arg").cloned().unwrap(),
                args.get_bool("verbose").unwrap(),
                args.get_bool("quiet").unwrap(),
            )
        })
        .unwrap();

    assert!(cmd.parser().is_custom());
    assert_eq!(cmd.call(Vec::<String>::new()), (Value::None, false, false));
    assert_eq!(cmd.call(["thing"]), (Value::from("thing"), false, false));
    assert_eq!(cmd.call(["-v"]), (Value::None, true, false));
    assert_eq!(cmd.call(["-q"]), (Value::None, false, true));
    assert_eq!(cmd.call(["-v", "thing"]), (Value::from("thing"), true, false));

    let err = cmd.try_call(["-v", "-q"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
}

#[test]
fn test_no_negation_without_add_nos() {
    let sig = Signature::new().param(Parameter::new("verbose").with_default(false));
    let cmd = autocommand(sig).build(|_| ()).unwrap();

    let err = cmd.try_call(["--no-verbose"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownArgument);
}

#[test]
fn test_bound_arguments_call_the_function_again() {
    let sig = Signature::new()
        .param(Parameter::new("src"))
        .param(Parameter::new("level").with_default(3))
        .param(Parameter::new("dry_run").with_default(false));
    let cmd = autocommand(sig).build(|args: BoundArgs| args).unwrap();

    let bound = cmd.call(["input.txt", "-l", "9", "-d"]);

    // Feed the bound values back through the command line
    let mut args = vec![bound.get_str("src").unwrap().to_string()];
    args.push("--level".to_string());
    args.push(bound.get_int("level").unwrap().to_string());
    if bound.get_bool("dry_run").unwrap() {
        args.push("--dry_run".to_string());
    }

    assert_eq!(cmd.call(args), bound);
}

#[test]
fn test_async_main_through_blocking_bridge() {
    let runtime = Arc::new(default_runtime().unwrap());
    let sig = Signature::new()
        .param(Parameter::new("n").with_annotation(ValueType::Int))
        .param(Parameter::new("step").with_default(1));

    let main = blocking(runtime, |args: BoundArgs| async move {
        tokio::task::yield_now().await;
        args.get_int("n").unwrap() + args.get_int("step").unwrap()
    });
    let cmd = autocommand(sig).build(main).unwrap();

    assert_eq!(cmd.call(["41"]), 42);
    assert_eq!(cmd.call(["40", "-s", "5"]), 45);
}

#[test]
fn test_stream_default_opens_file_or_stream() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("input.txt");
    std::fs::write(&path, "file contents").unwrap();

    let sig = Signature::new().param(Parameter::new("input_file").with_default(StdStream::Stdin));
    let cmd = autocommand(sig).build(|args: BoundArgs| args).unwrap();

    let bound = cmd.call(["-i", path.to_str().unwrap()]);
    let mut file = smart_open_read(bound.get("input_file").unwrap()).unwrap();
    assert!(file.owns_handle());
    let mut contents = String::new();
    file.read_to_string(&mut contents).unwrap();
    assert_eq!(contents, "file contents");

    let bound = cmd.call(Vec::<String>::new());
    assert_eq!(bound.get("input_file"), Some(&Value::Stream(StdStream::Stdin)));
    let stdin = smart_open_read(bound.get("input_file").unwrap()).unwrap();
    assert!(!stdin.owns_handle());
}

#[test]
fn test_parse_errors_do_not_call_the_function() {
    let called = std::cell::Cell::new(false);
    let cmd = autocommand(greet_signature())
        .build(|_| called.set(true))
        .unwrap();

    let err = cmd.try_call(["bob", "--times", "many"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
    assert!(!called.get());
}
