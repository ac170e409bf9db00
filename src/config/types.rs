//! Core configuration types
//!
//! This module defines the data structures that represent a udbg.yml configuration file.

use crate::engine::{Arch, Mode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prompt shown when the config does not set one
pub const DEFAULT_PROMPT: &str = "$>";

/// Address `load` uses when none is given
pub const DEFAULT_LOAD_ADDRESS: u64 = 0x1000;

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Prompt text
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Default architecture (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<Arch>,

    /// Default mode (optional)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_mode"
    )]
    pub mode: Option<Mode>,

    /// User aliases (alias name -> command name)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aliases: BTreeMap<String, String>,

    /// Default address for `load`
    #[serde(
        default = "default_load_address",
        deserialize_with = "deserialize_address"
    )]
    pub load_address: u64,

    /// Optional modules not to attach
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled_modules: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: default_prompt(),
            arch: None,
            mode: None,
            aliases: BTreeMap::new(),
            load_address: DEFAULT_LOAD_ADDRESS,
            disabled_modules: Vec::new(),
        }
    }
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_load_address() -> u64 {
    DEFAULT_LOAD_ADDRESS
}

/// Custom deserializer for modes given either as text (`thumb`) or as a bare number (`32`)
fn deserialize_mode<'de, D>(deserializer: D) -> Result<Option<Mode>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    let text = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        // Null or not present
        Value::Null => return Ok(None),
        _ => return Err(D::Error::custom("mode must be a string or number")),
    };
    text.parse::<Mode>().map(Some).map_err(D::Error::custom)
}

/// Custom deserializer for addresses given as integers or as `0x` strings
fn deserialize_address<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| D::Error::custom("address must be a non-negative integer")),
        Value::String(s) => {
            let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                Some(hex) => u64::from_str_radix(hex, 16),
                None => s.parse::<u64>(),
            };
            parsed.map_err(|_| D::Error::custom(format!("invalid address '{}'", s)))
        }
        Value::Null => Ok(DEFAULT_LOAD_ADDRESS),
        _ => Err(D::Error::custom("address must be an integer or string")),
    }
}
