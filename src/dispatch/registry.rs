//! Module registry
//!
//! Feature modules attach here during start-up. Each attach either installs
//! all of a module's commands or none of them.

use crate::dispatch::tree::{CommandMap, CommandNode};
use crate::error::{RegistryError, RegistryResult};
use std::collections::BTreeMap;

/// Context id reserved for the dispatcher's own built-ins
pub const SELF_CONTEXT: &str = "self";

/// A feature module that contributes commands
pub trait Module {
    /// Unique, non-empty namespace for this module
    fn context_id(&self) -> &str;

    /// Top-level commands this module exports
    fn commands(&self) -> CommandMap;

    /// Called once, right after a successful attach
    fn init(&mut self) {}

    /// Called once at shutdown
    fn teardown(&mut self) {}
}

/// Attached contexts and the global command namespace
pub struct Registry {
    contexts: BTreeMap<String, Box<dyn Module>>,
    commands: CommandMap,
    shut_down: bool,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            contexts: BTreeMap::new(),
            commands: CommandMap::new(),
            shut_down: false,
        }
    }

    /// Attach a module, merging its commands into the global namespace
    pub fn attach(&mut self, module: impl Module + 'static) -> RegistryResult<()> {
        self.attach_boxed(Box::new(module))
    }

    /// Attach an already boxed module
    pub fn attach_boxed(&mut self, mut module: Box<dyn Module>) -> RegistryResult<()> {
        let context_id = module.context_id().to_string();
        let exported = module.commands();

        // Validate everything before touching committed state
        if context_id == SELF_CONTEXT || self.contexts.contains_key(&context_id) {
            return Err(RegistryError::DuplicateContext(context_id));
        }
        if context_id.is_empty() || exported.is_empty() {
            return Err(RegistryError::EmptyModule(context_id));
        }
        if let Some(command) = exported.keys().find(|name| self.commands.contains_key(*name)) {
            return Err(RegistryError::DuplicateCommand {
                context: context_id,
                command: command.clone(),
            });
        }

        log::debug!(
            "Attaching '{}' with commands: {}",
            context_id,
            exported.keys().cloned().collect::<Vec<_>>().join(", ")
        );
        self.commands.extend(exported);
        module.init();
        self.contexts.insert(context_id.clone(), module);
        log::info!("Module '{}' attached", context_id);

        Ok(())
    }

    /// Tear down every attached module once
    ///
    /// Returns the number of modules torn down. Later calls do nothing.
    pub fn shutdown(&mut self) -> usize {
        if self.shut_down {
            return 0;
        }
        self.shut_down = true;

        let mut count = 0;
        for (context_id, module) in self.contexts.iter_mut() {
            log::debug!("Tearing down '{}'", context_id);
            module.teardown();
            count += 1;
        }
        count
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// The global command namespace
    pub fn commands(&self) -> &CommandMap {
        &self.commands
    }

    /// Look up a top-level command by name
    pub fn command(&self, name: &str) -> Option<&CommandNode> {
        self.commands.get(name)
    }

    /// Attached context ids, sorted
    pub fn context_ids(&self) -> impl Iterator<Item = &str> {
        self.contexts.keys().map(String::as_str)
    }

    /// Whether a binding to `context_id` can be resolved
    pub fn has_context(&self, context_id: &str) -> bool {
        context_id == SELF_CONTEXT || self.contexts.contains_key(context_id)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::tree::Outcome;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counted {
        id: &'static str,
        names: Vec<&'static str>,
        inits: Rc<Cell<u32>>,
        teardowns: Rc<Cell<u32>>,
    }

    impl Counted {
        fn new(id: &'static str, names: &[&'static str]) -> Self {
            Counted {
                id,
                names: names.to_vec(),
                inits: Rc::new(Cell::new(0)),
                teardowns: Rc::new(Cell::new(0)),
            }
        }
    }

    impl Module for Counted {
        fn context_id(&self) -> &str {
            self.id
        }

        fn commands(&self) -> CommandMap {
            self.names
                .iter()
                .map(|name| {
                    let node = CommandNode::from_fn(self.id, |_, _, _| Ok(Outcome::None));
                    (name.to_string(), node)
                })
                .collect()
        }

        fn init(&mut self) {
            self.inits.set(self.inits.get() + 1);
        }

        fn teardown(&mut self) {
            self.teardowns.set(self.teardowns.get() + 1);
        }
    }

    #[test]
    fn test_attach_merges_and_inits() {
        let mut registry = Registry::new();
        let module = Counted::new("core", &["quit", "help"]);
        let inits = Rc::clone(&module.inits);

        registry.attach(module).unwrap();

        assert_eq!(inits.get(), 1);
        assert!(registry.command("quit").is_some());
        assert!(registry.command("help").is_some());
        assert_eq!(registry.context_ids().collect::<Vec<_>>(), vec!["core"]);
    }

    #[test]
    fn test_duplicate_command_is_all_or_nothing() {
        let mut registry = Registry::new();
        registry.attach(Counted::new("first", &["x", "y"])).unwrap();

        let second = Counted::new("second", &["a", "x", "z"]);
        let inits = Rc::clone(&second.inits);
        let err = registry.attach(second).unwrap_err();

        assert_eq!(
            err,
            RegistryError::DuplicateCommand {
                context: "second".into(),
                command: "x".into()
            }
        );
        assert_eq!(inits.get(), 0);
        assert!(registry.command("a").is_none());
        assert!(registry.command("z").is_none());
        assert!(!registry.has_context("second"));
        assert_eq!(registry.commands().len(), 2);
    }

    #[test]
    fn test_duplicate_and_reserved_context() {
        let mut registry = Registry::new();
        registry.attach(Counted::new("core", &["quit"])).unwrap();

        assert_eq!(
            registry.attach(Counted::new("core", &["other"])).unwrap_err(),
            RegistryError::DuplicateContext("core".into())
        );
        assert_eq!(
            registry.attach(Counted::new("self", &["mine"])).unwrap_err(),
            RegistryError::DuplicateContext("self".into())
        );
        assert!(registry.command("other").is_none());
        assert!(registry.command("mine").is_none());
    }

    #[test]
    fn test_context_checked_before_emptiness() {
        let mut registry = Registry::new();
        registry.attach(Counted::new("core", &["quit"])).unwrap();

        assert_eq!(
            registry.attach(Counted::new("self", &[])).unwrap_err(),
            RegistryError::DuplicateContext("self".into())
        );
        assert_eq!(
            registry.attach(Counted::new("core", &[])).unwrap_err(),
            RegistryError::DuplicateContext("core".into())
        );
    }

    #[test]
    fn test_empty_module_rejected() {
        let mut registry = Registry::new();
        assert_eq!(
            registry.attach(Counted::new("nothing", &[])).unwrap_err(),
            RegistryError::EmptyModule("nothing".into())
        );
        assert_eq!(
            registry.attach(Counted::new("", &["cmd"])).unwrap_err(),
            RegistryError::EmptyModule(String::new())
        );
        assert!(registry.commands().is_empty());
    }

    #[test]
    fn test_registry_usable_after_failed_attach() {
        let mut registry = Registry::new();
        registry.attach(Counted::new("a", &["x"])).unwrap();
        assert!(registry.attach(Counted::new("b", &["x"])).is_err());
        registry.attach(Counted::new("b", &["y"])).unwrap();
        assert!(registry.has_context("b"));
        assert!(registry.command("y").is_some());
    }

    #[test]
    fn test_shutdown_tears_down_once() {
        let mut registry = Registry::new();
        let a = Counted::new("a", &["x"]);
        let b = Counted::new("b", &["y"]);
        let (ta, tb) = (Rc::clone(&a.teardowns), Rc::clone(&b.teardowns));
        registry.attach(a).unwrap();
        registry.attach(b).unwrap();

        assert_eq!(registry.shutdown(), 2);
        assert_eq!(registry.shutdown(), 0);
        assert!(registry.is_shut_down());
        assert_eq!((ta.get(), tb.get()), (1, 1));
    }

    #[test]
    fn test_self_context_always_resolves() {
        let registry = Registry::new();
        assert!(registry.has_context(SELF_CONTEXT));
        assert!(!registry.has_context("loader"));
    }
}
