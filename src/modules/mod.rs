//! Built-in feature modules
//!
//! Each module exports its commands through [`Module`] and is attached to the
//! dispatcher at start-up.

pub mod aliases;
pub mod builtins;
pub mod loader;

pub use self::aliases::AliasModule;
pub use self::builtins::CoreModule;
pub use self::loader::LoaderModule;

use crate::config::Config;
use crate::dispatch::Module;
use crate::error::{HandlerError, HandlerResult};
use colored::{ColoredString, Colorize};

/// Modules that can be listed under `disabled_modules`
pub const OPTIONAL_MODULES: &[&str] = &[loader::CONTEXT, aliases::CONTEXT];

/// The `[*]` marker used in status lines
pub fn marker() -> String {
    format!("[{}]", "*".cyan().bold().dimmed())
}

/// A module name as shown to the user
pub fn module_name(name: &str) -> ColoredString {
    name.white().bold().underline()
}

/// Build the modules to attach for `config`, in attach order
pub fn builtin_modules(config: &Config) -> Vec<Box<dyn Module>> {
    let enabled = |name: &str| !config.disabled_modules.iter().any(|d| d == name);

    let mut modules: Vec<Box<dyn Module>> = vec![Box::new(CoreModule::new())];
    if enabled(loader::CONTEXT) {
        modules.push(Box::new(LoaderModule::new(config.load_address)));
    }
    if enabled(aliases::CONTEXT) && !config.aliases.is_empty() {
        modules.push(Box::new(AliasModule::new(config.aliases.clone())));
    }
    modules
}

/// Parse an address given as `0x`-prefixed hex or decimal
pub fn parse_address(text: &str) -> HandlerResult<u64> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse::<u64>(),
    };
    parsed.map_err(|_| HandlerError::Failed(format!("invalid address '{}'", text)))
}
