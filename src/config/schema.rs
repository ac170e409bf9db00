//! Configuration validation
//!
//! This module provides validation logic for configuration files.

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult};
use crate::modules::OPTIONAL_MODULES;

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    if config.prompt.trim().is_empty() {
        return Err(ConfigError::Invalid("prompt must not be empty".to_string()));
    }

    for (name, target) in &config.aliases {
        validate_alias(name, target)?;

        // Aliases resolve a single hop, so a chain would never reach a command
        if config.aliases.contains_key(target) {
            return Err(ConfigError::AliasChain {
                alias: name.clone(),
                target: target.clone(),
            });
        }
    }

    for module in &config.disabled_modules {
        if !OPTIONAL_MODULES.contains(&module.as_str()) {
            return Err(ConfigError::UnknownModule(module.clone()));
        }
    }

    Ok(())
}

/// Validate a single alias entry
pub fn validate_alias(name: &str, target: &str) -> ConfigResult<()> {
    if !is_token(name) {
        return Err(ConfigError::Invalid(format!(
            "Invalid alias name '{}': must be a single non-empty word",
            name
        )));
    }
    if !is_token(target) {
        return Err(ConfigError::Invalid(format!(
            "Invalid target '{}' for alias '{}': must be a single command name",
            target, name
        )));
    }
    if name == target {
        return Err(ConfigError::Invalid(format!(
            "Alias '{}' points at itself",
            name
        )));
    }
    Ok(())
}

/// Whether `text` survives whitespace tokenization as exactly one token
fn is_token(text: &str) -> bool {
    !text.is_empty() && !text.chars().any(char::is_whitespace)
}
