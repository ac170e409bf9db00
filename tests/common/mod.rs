//! Common test utilities

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::fs;
use std::rc::Rc;
use tempfile::TempDir;
use udbg::dispatch::{CommandMap, CommandNode, Module, Outcome};

/// Create a temporary directory with a udbg.yml file
pub fn create_test_config(content: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("udbg.yml");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}

/// Create a binary file to load inside `dir`
pub fn create_binary(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

/// Every handler call as (active name, args...)
pub type Calls = Rc<RefCell<Vec<Vec<String>>>>;

/// A node whose handler appends its invocation to `calls`
pub fn recording_node(context: &str, calls: &Calls) -> CommandNode {
    let calls = Rc::clone(calls);
    CommandNode::from_fn(context, move |_, name, args| {
        let mut call = vec![name.to_string()];
        call.extend(args.iter().cloned());
        calls.borrow_mut().push(call);
        Ok(Outcome::None)
    })
}

/// Module built from a prepared command map, counting lifecycle hooks
pub struct TestModule {
    pub id: String,
    pub commands: CommandMap,
    pub inits: Rc<Cell<u32>>,
    pub teardowns: Rc<Cell<u32>>,
}

impl TestModule {
    pub fn new(id: &str, commands: CommandMap) -> Self {
        TestModule {
            id: id.to_string(),
            commands,
            inits: Rc::new(Cell::new(0)),
            teardowns: Rc::new(Cell::new(0)),
        }
    }
}

impl Module for TestModule {
    fn context_id(&self) -> &str {
        &self.id
    }

    fn commands(&self) -> CommandMap {
        self.commands.clone()
    }

    fn init(&mut self) {
        self.inits.set(self.inits.get() + 1);
    }

    fn teardown(&mut self) {
        self.teardowns.set(self.teardowns.get() + 1);
    }
}
