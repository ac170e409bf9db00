//! Configuration file parsing and discovery

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult, UdbgError};
use directories::ProjectDirs;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["udbg.yml", "udbg.yaml"];

/// Find the configuration file by searching current and parent directories
pub fn find_config_file() -> ConfigResult<PathBuf> {
    find_config_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the configuration file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        if let Some(found) = find_in_dir(&current_dir, &mut searched_paths) {
            return Ok(found);
        }

        // Try parent directory
        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => break,
        }
    }

    // Fall back to the per-user config directory
    if let Some(dirs) = ProjectDirs::from("", "", "udbg") {
        if let Some(found) = find_in_dir(dirs.config_dir(), &mut searched_paths) {
            return Ok(found);
        }
    }

    Err(ConfigError::NotFound(searched_paths.join(", ")))
}

fn find_in_dir(dir: &Path, searched_paths: &mut Vec<String>) -> Option<PathBuf> {
    for file_name in CONFIG_FILE_NAMES {
        let config_path = dir.join(file_name);
        searched_paths.push(config_path.display().to_string());

        if config_path.is_file() {
            return Some(config_path);
        }
    }
    None
}

/// Parse a configuration file from a path
pub fn parse_config_file(path: &Path) -> Result<Config, UdbgError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    parse_config(&contents)
}

/// Parse configuration from a string
///
/// An empty document yields the default configuration.
pub fn parse_config(yaml: &str) -> Result<Config, UdbgError> {
    if yaml.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(yaml)?;
    Ok(config)
}

/// Parse configuration with automatic file discovery
///
/// A missing file is not an error: defaults are used and no path is returned.
pub fn parse_config_auto() -> Result<(Config, Option<PathBuf>), UdbgError> {
    match find_config_file() {
        Ok(config_path) => {
            let config = parse_config_file(&config_path)?;
            Ok((config, Some(config_path)))
        }
        Err(ConfigError::NotFound(searched)) => {
            log::debug!("No config file found (searched: {})", searched);
            Ok((Config::default(), None))
        }
        Err(e) => Err(e.into()),
    }
}
