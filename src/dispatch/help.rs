//! Help text derived from the command tree

use crate::dispatch::tree::{resolve_alias, CommandMap, CommandNode};
use crate::error::NoHelpFound;

/// Top-level command names for the flat listing
///
/// Alias entries are left out; commands with a short name are shown as
/// `name (short)`. The result is sorted.
pub fn list_commands(commands: &CommandMap) -> Vec<String> {
    let mut names: Vec<String> = commands
        .iter()
        .filter(|(_, node)| !node.is_alias())
        .map(|(name, node)| match node.short() {
            Some(short) => format!("{} ({})", name, short),
            None => name.clone(),
        })
        .collect();
    names.sort();
    names
}

/// The full `help` output with no arguments
pub fn render_index(commands: &CommandMap) -> String {
    let mut out = String::from("Commands list:\n");
    for name in list_commands(commands) {
        out.push_str(&format!("\n\t{}", name));
    }
    out
}

/// Walk `path` the same way the dispatcher does
///
/// Unlike dispatch, any token that is not a child of the current node fails
/// the whole walk.
pub fn find_node<'a>(commands: &'a CommandMap, path: &[String]) -> Option<&'a CommandNode> {
    let (first, rest) = path.split_first()?;
    let mut node = resolve_alias(commands, commands.get(first)?).ok()?;
    for token in rest {
        if !node.has_children() {
            return None;
        }
        node = node.child(token)?;
    }
    Some(node)
}

/// Help and usage text for the command at `path`
pub fn describe(commands: &CommandMap, path: &[String]) -> Result<String, NoHelpFound> {
    let node = find_node(commands, path);
    match node.and_then(CommandNode::help) {
        Some(help) => {
            let mut out = help.to_string();
            if let Some(usage) = node.and_then(CommandNode::usage) {
                out.push_str(&format!("\nUsage: {}", usage));
            }
            Ok(out)
        }
        None => Err(NoHelpFound {
            path: path.join(" "),
            usage: first_usage(commands, path),
        }),
    }
}

/// `help [path...]` as shown to the user
pub fn render_help(commands: &CommandMap, path: &[String]) -> String {
    if path.is_empty() {
        return render_index(commands);
    }
    match describe(commands, path) {
        Ok(text) => text,
        Err(missing) => match &missing.usage {
            Some(usage) => format!("{}\nUsage: {}", missing, usage),
            None => missing.to_string(),
        },
    }
}

fn first_usage(commands: &CommandMap, path: &[String]) -> Option<String> {
    let first = commands.get(path.first()?)?;
    resolve_alias(commands, first)
        .ok()?
        .usage()
        .map(str::to_string)
}
