//! Binary loader: copies a file from disk into emulator memory

use crate::dispatch::{CommandContext, CommandMap, CommandNode, Module, Outcome};
use crate::error::{HandlerError, HandlerResult};
use crate::modules::parse_address;
use std::cell::Cell;
use std::fs;
use std::rc::Rc;

/// Context id of the loader module
pub const CONTEXT: &str = "loader";

const USAGE: &str = "load <path> [address]";

pub struct LoaderModule {
    default_address: u64,
    loaded: Rc<Cell<usize>>,
}

impl LoaderModule {
    pub fn new(default_address: u64) -> Self {
        LoaderModule {
            default_address,
            loaded: Rc::new(Cell::new(0)),
        }
    }
}

impl Module for LoaderModule {
    fn context_id(&self) -> &str {
        CONTEXT
    }

    fn commands(&self) -> CommandMap {
        let default_address = self.default_address;
        let loaded = Rc::clone(&self.loaded);

        let mut commands = CommandMap::new();
        commands.insert(
            "load".into(),
            CommandNode::from_fn(CONTEXT, move |ctx, _, args| {
                let outcome = load(ctx, args, default_address)?;
                loaded.set(loaded.get() + 1);
                Ok(outcome)
            })
            .with_help("Load a binary file into emulator memory")
            .with_usage(USAGE),
        );
        commands
    }

    fn init(&mut self) {
        log::debug!("Loader ready, default address {:#x}", self.default_address);
    }

    fn teardown(&mut self) {
        log::info!("Loader unloaded after {} image(s)", self.loaded.get());
    }
}

fn load(ctx: &mut CommandContext<'_>, args: &[String], default_address: u64) -> HandlerResult<Outcome> {
    let path = args
        .first()
        .ok_or_else(|| HandlerError::Usage(USAGE.to_string()))?;
    let address = match args.get(1) {
        Some(text) => parse_address(text)?,
        None => default_address,
    };

    let bytes = fs::read(path)?;
    if bytes.is_empty() {
        return Err(HandlerError::Failed(format!("'{}' is empty", path)));
    }

    ctx.emulator()?.engine_mut().write_memory(address, &bytes)?;
    log::debug!("Loaded {} bytes from {} at {:#x}", bytes.len(), path, address);

    Ok(Outcome::Text(format!(
        "Loaded {} bytes from {} at {:#x}",
        bytes.len(),
        path,
        address
    )))
}
