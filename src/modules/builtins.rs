//! Core commands: quit, help, show, start and modules

use crate::dispatch::{render_help, CommandContext, CommandMap, CommandNode, Module, Outcome};
use crate::error::{HandlerError, HandlerResult};
use crate::modules::{marker, module_name, parse_address};

/// Context id of the core module
pub const CONTEXT: &str = "core";

/// Commands every session has
#[derive(Debug, Default)]
pub struct CoreModule;

impl CoreModule {
    pub fn new() -> Self {
        CoreModule
    }
}

impl Module for CoreModule {
    fn context_id(&self) -> &str {
        CONTEXT
    }

    fn commands(&self) -> CommandMap {
        let mut commands = CommandMap::new();

        commands.insert("q".into(), CommandNode::alias("quit"));
        commands.insert("exit".into(), CommandNode::alias("quit"));
        commands.insert("s".into(), CommandNode::alias("show"));
        commands.insert("c".into(), CommandNode::alias("start"));

        commands.insert(
            "quit".into(),
            CommandNode::handler(CONTEXT, quit)
                .with_short("q")
                .with_help("Quit command"),
        );
        commands.insert(
            "help".into(),
            CommandNode::handler(CONTEXT, help)
                .with_help("Show command help")
                .with_usage("help [command] [subcommand...]"),
        );
        commands.insert(
            "show".into(),
            CommandNode::handler(CONTEXT, show)
                .with_short("s")
                .with_help("Show list of mappings and patches")
                .with_usage("show [mappings|patches]")
                .with_child(
                    "mappings",
                    CommandNode::handler(CONTEXT, show_mappings).with_help("Show list of mappings"),
                )
                .with_child(
                    "patches",
                    CommandNode::group().with_help("Show list of patches"),
                ),
        );
        commands.insert(
            "start".into(),
            CommandNode::handler(CONTEXT, start)
                .with_short("c")
                .with_help("Start emulation")
                .with_usage("start [address] [until]"),
        );
        commands.insert(
            "modules".into(),
            CommandNode::handler(CONTEXT, modules).with_help("Loaded modules list"),
        );

        commands
    }
}

fn quit(_: &mut CommandContext<'_>, _: &str, _: &[String]) -> HandlerResult<Outcome> {
    Ok(Outcome::Quit)
}

fn help(ctx: &mut CommandContext<'_>, _: &str, args: &[String]) -> HandlerResult<Outcome> {
    Ok(Outcome::Text(render_help(ctx.registry.commands(), args)))
}

fn show(ctx: &mut CommandContext<'_>, _: &str, _: &[String]) -> HandlerResult<Outcome> {
    let emulator = ctx.emulator()?;
    let engine = emulator.engine();
    let state = if engine.is_running() {
        "running"
    } else {
        "stopped"
    };
    Ok(Outcome::Text(format!(
        "arch: {}\nmode: {}\nstate: {}\nmappings: {}",
        emulator.arch(),
        emulator.mode(),
        state,
        engine.mappings().len()
    )))
}

fn show_mappings(ctx: &mut CommandContext<'_>, _: &str, _: &[String]) -> HandlerResult<Outcome> {
    let mappings = ctx.emulator()?.engine().mappings();
    if mappings.is_empty() {
        return Ok(Outcome::Text("No mappings".to_string()));
    }

    let lines: Vec<String> = mappings
        .iter()
        .map(|region| {
            format!(
                "\t{:#010x} - {:#010x} ({} bytes)",
                region.address,
                region.end(),
                region.size
            )
        })
        .collect();
    Ok(Outcome::Text(format!("Mappings:\n{}", lines.join("\n"))))
}

fn start(ctx: &mut CommandContext<'_>, _: &str, args: &[String]) -> HandlerResult<Outcome> {
    let engine = ctx.emulator()?.engine_mut();

    let begin = match args.first() {
        Some(text) => parse_address(text)?,
        None => engine
            .mappings()
            .first()
            .map(|region| region.address)
            .ok_or_else(|| HandlerError::Failed("nothing is mapped, load a binary first".into()))?,
    };
    let until = args.get(1).map(|text| parse_address(text)).transpose()?;

    engine.start(begin, until)?;
    Ok(Outcome::Text(format!("Emulation started at {:#x}", begin)))
}

fn modules(ctx: &mut CommandContext<'_>, _: &str, _: &[String]) -> HandlerResult<Outcome> {
    let mut out = String::from("Loaded modules:\n");
    for id in ctx.registry.context_ids() {
        out.push_str(&format!("\n\t{} {}", marker(), module_name(id)));
    }
    Ok(Outcome::Text(out))
}
