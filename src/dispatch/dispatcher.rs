//! Dispatcher: routes a token list to the handler responsible for it
//!
//! Routing is greedy and exact. The first token names a top-level command
//! (aliases are followed one hop), then each following token that names a
//! child of the current node is consumed. Whatever is left becomes the
//! handler's positional arguments.

use crate::dispatch::registry::{Module, Registry};
use crate::dispatch::tree::{resolve_alias, AliasFault, CommandMap, CommandNode, Outcome};
use crate::dispatch::{tokenize, CommandContext};
use crate::engine::EmulatorHandle;
use crate::error::{is_binding_defect, DispatchError, DispatchResult, RegistryResult};
use std::rc::Rc;

/// A command line after tree resolution
#[derive(Debug)]
pub struct Resolved<'a> {
    /// The deepest node reached.
    pub node: &'a CommandNode,
    /// Name of that node (the last consumed token).
    pub name: &'a str,
    /// Tokens that did not match a sub-command.
    pub args: &'a [String],
}

/// Walk the command tree for `tokens`
///
/// `tokens` must not be empty.
pub fn resolve<'a>(commands: &'a CommandMap, tokens: &'a [String]) -> DispatchResult<Resolved<'a>> {
    let (first, mut args) = tokens
        .split_first()
        .ok_or_else(|| DispatchError::CommandNotFound(String::new()))?;

    let found = commands
        .get(first)
        .ok_or_else(|| DispatchError::CommandNotFound(first.clone()))?;

    let mut node = match resolve_alias(commands, found) {
        Ok(node) => node,
        Err(AliasFault::Missing(target)) => {
            log::warn!("Alias '{}' points at missing command '{}'", first, target);
            return Err(DispatchError::NotImplemented(first.clone()));
        }
        Err(AliasFault::Chained(target)) => {
            return Err(DispatchError::HandlerBinding {
                command: first.clone(),
                reason: format!("alias target '{}' is itself an alias", target),
            });
        }
    };
    let mut name = first.as_str();

    while let Some((token, rest)) = args.split_first() {
        match node.child(token) {
            Some(child) => {
                log::debug!("Descending from '{}' into '{}'", name, token);
                node = child;
                name = token;
                args = rest;
            }
            None => break,
        }
    }

    Ok(Resolved { node, name, args })
}

/// Owns the registry and the emulator handle for one session
pub struct Dispatcher {
    registry: Registry,
    emulator: Option<EmulatorHandle>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Dispatcher {
            registry: Registry::new(),
            emulator: None,
        }
    }

    /// Attach a feature module
    pub fn attach(&mut self, module: impl Module + 'static) -> RegistryResult<()> {
        self.registry.attach(module)
    }

    /// Attach an already boxed feature module
    pub fn attach_boxed(&mut self, module: Box<dyn Module>) -> RegistryResult<()> {
        self.registry.attach_boxed(module)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Install the session's emulator handle
    pub fn set_emulator(&mut self, handle: EmulatorHandle) {
        self.emulator = Some(handle);
    }

    pub fn emulator(&self) -> Option<&EmulatorHandle> {
        self.emulator.as_ref()
    }

    pub fn emulator_mut(&mut self) -> Option<&mut EmulatorHandle> {
        self.emulator.as_mut()
    }

    /// Route `tokens` to a handler and run it
    ///
    /// An empty token list does nothing.
    pub fn dispatch(&mut self, tokens: &[String]) -> DispatchResult<Outcome> {
        if tokens.is_empty() {
            return Ok(Outcome::None);
        }

        let resolved = resolve(self.registry.commands(), tokens)?;
        let binding = resolved
            .node
            .binding()
            .ok_or_else(|| DispatchError::NotImplemented(resolved.name.to_string()))?;

        if !self.registry.has_context(&binding.context) {
            return Err(DispatchError::HandlerBinding {
                command: resolved.name.to_string(),
                reason: format!("context '{}' is not attached", binding.context),
            });
        }

        let handler = Rc::clone(&binding.handler);
        let mut ctx = CommandContext::new(&self.registry, self.emulator.as_mut());
        handler
            .invoke(&mut ctx, resolved.name, resolved.args)
            .map_err(|source| DispatchError::HandlerExecution {
                command: resolved.name.to_string(),
                source,
            })
    }

    /// Dispatch `tokens`, turning every failure into a message
    ///
    /// A `Quit` outcome tears down all modules before it is returned.
    pub fn execute(&mut self, tokens: &[String]) -> Outcome {
        match self.dispatch(tokens) {
            Ok(Outcome::Quit) => {
                let count = self.shutdown();
                log::info!("Shut down {} module(s)", count);
                Outcome::Quit
            }
            Ok(outcome) => outcome,
            Err(err) => {
                match &err {
                    DispatchError::HandlerExecution { command, source } => {
                        log::error!("exec error in '{}': {}", command, source)
                    }
                    err if is_binding_defect(err) => log::error!("{}", err),
                    _ => log::debug!("{}", err),
                }
                Outcome::Text(err.to_string())
            }
        }
    }

    /// Tokenize and execute one input line
    pub fn execute_line(&mut self, line: &str) -> Outcome {
        self.execute(&tokenize(line))
    }

    /// Tear down all attached modules
    pub fn shutdown(&mut self) -> usize {
        self.registry.shutdown()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
