//! Common test utilities

use sigparse::parser::build_parser;
use sigparse::signature::{Signature, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory with a sigparse.yml file
pub fn create_signature_file(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sigparse.yml");
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

/// Create a signature file with a subdirectory next to it
pub fn create_signature_file_in_subdir(content: &str) -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sigparse.yml");
    let sub_dir = temp_dir.path().join("subdir");

    fs::write(&path, content).unwrap();
    fs::create_dir(&sub_dir).unwrap();

    (temp_dir, path, sub_dir)
}

/// Build a parser for `signature`, parse `args`, and check that the parsed
/// values are exactly `expected`
pub fn check_parse(signature: &Signature, args: &[&str], expected: &[(&str, Value)]) {
    let parser = build_parser(signature, None, None).unwrap();
    let parsed = parser.try_parse(args).unwrap().into_map();

    let expected: BTreeMap<String, Value> = expected
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();
    assert_eq!(parsed, expected, "parsing {:?}", args);
}

/// Parse `args` and return the kind of error clap reported
pub fn parse_error(signature: &Signature, args: &[&str]) -> clap::error::ErrorKind {
    let parser = build_parser(signature, None, None).unwrap();
    parser
        .try_parse(args)
        .expect_err("parsing should have failed")
        .kind()
}
