//! Signature file parsing and discovery

use crate::error::{ConfigError, ConfigResult, SigparseError};
use crate::signature::schema::validate_signature;
use crate::signature::types::SignatureFile;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default signature file names to search for
const SIGNATURE_FILE_NAMES: &[&str] = &["sigparse.yml", "sigparse.yaml"];

/// Find the signature file by searching current and parent directories
pub fn find_signature_file() -> ConfigResult<PathBuf> {
    find_signature_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the signature file starting from a specific directory
pub fn find_signature_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in SIGNATURE_FILE_NAMES {
            let path = current_dir.join(file_name);
            searched_paths.push(path.display().to_string());

            if path.is_file() {
                return Ok(path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(ConfigError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Parse and validate a signature file from a path
pub fn parse_signature_file(path: &Path) -> Result<SignatureFile, SigparseError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    parse_signature(&contents)
}

/// Parse and validate a signature from a YAML string
pub fn parse_signature(yaml: &str) -> Result<SignatureFile, SigparseError> {
    let file: SignatureFile = serde_yaml::from_str(yaml)?;
    validate_signature(&file.signature())?;
    Ok(file)
}

/// Parse a signature file with automatic file discovery
pub fn parse_signature_auto() -> Result<(SignatureFile, PathBuf), SigparseError> {
    let path = find_signature_file()?;
    let file = parse_signature_file(&path)?;
    Ok((file, path))
}
