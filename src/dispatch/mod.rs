//! Command routing
//!
//! This module holds the command tree, the registry that modules attach to,
//! the dispatcher that turns a token list into a handler call and the help
//! generator that reads the same tree.

pub mod dispatcher;
pub mod help;
pub mod registry;
pub mod tree;

// Re-export main types
pub use dispatcher::*;
pub use help::*;
pub use registry::*;
pub use tree::*;

use crate::engine::EmulatorHandle;
use crate::error::{HandlerError, HandlerResult};

/// What a handler can see while it runs
pub struct CommandContext<'a> {
    /// The registry, read-only once dispatch begins.
    pub registry: &'a Registry,
    emulator: Option<&'a mut EmulatorHandle>,
}

impl<'a> CommandContext<'a> {
    pub fn new(registry: &'a Registry, emulator: Option<&'a mut EmulatorHandle>) -> Self {
        CommandContext { registry, emulator }
    }

    /// The session's emulator, or an error if none was opened
    pub fn emulator(&mut self) -> HandlerResult<&mut EmulatorHandle> {
        self.emulator
            .as_deref_mut()
            .ok_or_else(|| HandlerError::Failed("no emulator is open".to_string()))
    }
}

/// Split an input line into whitespace-delimited tokens
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}
