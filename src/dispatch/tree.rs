//! Command tree nodes and handler binding
//!
//! A node is either an alias pointing at another top-level command, or a
//! command that may carry a handler binding, metadata and sub-commands.

use crate::dispatch::CommandContext;
use crate::error::HandlerResult;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Mapping from command (or sub-command) token to its node
pub type CommandMap = BTreeMap<String, CommandNode>;

/// Result produced by a handler that completed normally
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Text to show the user.
    Text(String),
    /// Nothing to show.
    None,
    /// Ask the session to shut down.
    Quit,
}

/// Something that can run a command
///
/// `name` is the active command name (the deepest matched token) and `args`
/// are the tokens left after sub-command resolution.
pub trait Handler {
    fn invoke(
        &self,
        ctx: &mut CommandContext<'_>,
        name: &str,
        args: &[String],
    ) -> HandlerResult<Outcome>;
}

impl<F> Handler for F
where
    F: Fn(&mut CommandContext<'_>, &str, &[String]) -> HandlerResult<Outcome>,
{
    fn invoke(
        &self,
        ctx: &mut CommandContext<'_>,
        name: &str,
        args: &[String],
    ) -> HandlerResult<Outcome> {
        self(ctx, name, args)
    }
}

/// A handler together with the context that owns it
#[derive(Clone)]
pub struct Binding {
    pub context: String,
    pub handler: Rc<dyn Handler>,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// A node in the command tree
#[derive(Debug, Clone)]
pub enum CommandNode {
    /// Redirects to another top-level command, resolved at dispatch time.
    Alias(String),
    /// A command, with or without a handler.
    Command(CommandDef),
}

/// A command node's payload
#[derive(Debug, Clone, Default)]
pub struct CommandDef {
    pub binding: Option<Binding>,
    pub short: Option<String>,
    pub help: Option<String>,
    pub usage: Option<String>,
    pub children: CommandMap,
}

impl CommandNode {
    /// Alias node redirecting to `target`
    pub fn alias(target: impl Into<String>) -> Self {
        CommandNode::Alias(target.into())
    }

    /// Command bound to a handler owned by `context`
    pub fn handler(context: impl Into<String>, handler: impl Handler + 'static) -> Self {
        CommandNode::Command(CommandDef {
            binding: Some(Binding {
                context: context.into(),
                handler: Rc::new(handler),
            }),
            ..CommandDef::default()
        })
    }

    /// Command bound to a closure or function owned by `context`
    pub fn from_fn<F>(context: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut CommandContext<'_>, &str, &[String]) -> HandlerResult<Outcome> + 'static,
    {
        Self::handler(context, f)
    }

    /// Command with no handler of its own
    pub fn group() -> Self {
        CommandNode::Command(CommandDef::default())
    }

    pub fn with_help(self, help: impl Into<String>) -> Self {
        self.map_def(|def| def.help = Some(help.into()))
    }

    pub fn with_usage(self, usage: impl Into<String>) -> Self {
        self.map_def(|def| def.usage = Some(usage.into()))
    }

    pub fn with_short(self, short: impl Into<String>) -> Self {
        self.map_def(|def| def.short = Some(short.into()))
    }

    /// Add a sub-command
    pub fn with_child(self, name: impl Into<String>, child: CommandNode) -> Self {
        let name = name.into();
        self.map_def(move |def| {
            def.children.insert(name, child);
        })
    }

    // Metadata on an alias is silently dropped: aliases only redirect.
    fn map_def(mut self, f: impl FnOnce(&mut CommandDef)) -> Self {
        if let CommandNode::Command(def) = &mut self {
            f(def);
        }
        self
    }

    pub fn def(&self) -> Option<&CommandDef> {
        match self {
            CommandNode::Alias(_) => None,
            CommandNode::Command(def) => Some(def),
        }
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, CommandNode::Alias(_))
    }

    pub fn short(&self) -> Option<&str> {
        self.def().and_then(|def| def.short.as_deref())
    }

    pub fn help(&self) -> Option<&str> {
        self.def().and_then(|def| def.help.as_deref())
    }

    pub fn usage(&self) -> Option<&str> {
        self.def().and_then(|def| def.usage.as_deref())
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.def().and_then(|def| def.binding.as_ref())
    }

    /// Child node for an exact sub-command token
    pub fn child(&self, token: &str) -> Option<&CommandNode> {
        self.def().and_then(|def| def.children.get(token))
    }

    pub fn has_children(&self) -> bool {
        self.def().is_some_and(|def| !def.children.is_empty())
    }
}

/// Resolve a top-level alias one hop
///
/// Returns `Ok(node)` for non-aliases, `Ok(target)` when the alias target is
/// a command, `Err(Missing)` when the target does not exist and
/// `Err(Chained)` when the target is itself an alias.
pub fn resolve_alias<'a>(
    commands: &'a CommandMap,
    node: &'a CommandNode,
) -> Result<&'a CommandNode, AliasFault<'a>> {
    match node {
        CommandNode::Command(_) => Ok(node),
        CommandNode::Alias(target) => match commands.get(target) {
            None => Err(AliasFault::Missing(target)),
            Some(CommandNode::Alias(_)) => Err(AliasFault::Chained(target)),
            Some(resolved) => Ok(resolved),
        },
    }
}

/// Why a one-hop alias resolution failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasFault<'a> {
    Missing(&'a str),
    Chained(&'a str),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut CommandContext<'_>, _: &str, _: &[String]) -> HandlerResult<Outcome> {
        Ok(Outcome::None)
    }

    #[test]
    fn test_node_kinds() {
        assert!(CommandNode::alias("quit").is_alias());
        assert_eq!(
            CommandNode::handler("core", noop).binding().map(|b| b.context.as_str()),
            Some("core")
        );
        let group = CommandNode::group();
        assert!(!group.is_alias());
        assert!(group.binding().is_none());
    }

    #[test]
    fn test_builder_sets_metadata() {
        let node = CommandNode::handler("core", noop)
            .with_short("s")
            .with_help("Show things")
            .with_usage("show [mappings]")
            .with_child("mappings", CommandNode::group().with_help("Mappings"));

        assert_eq!(node.short(), Some("s"));
        assert_eq!(node.help(), Some("Show things"));
        assert_eq!(node.usage(), Some("show [mappings]"));
        assert!(node.has_children());
        assert_eq!(node.child("mappings").and_then(|c| c.help()), Some("Mappings"));
        assert!(node.child("patches").is_none());
    }

    #[test]
    fn test_alias_ignores_metadata() {
        let node = CommandNode::alias("quit").with_help("nope").with_short("x");
        assert!(node.is_alias());
        assert_eq!(node.help(), None);
        assert_eq!(node.short(), None);
        assert!(!node.has_children());
    }

    #[test]
    fn test_resolve_alias_one_hop() {
        let mut commands = CommandMap::new();
        commands.insert("quit".into(), CommandNode::handler("core", noop));
        commands.insert("q".into(), CommandNode::alias("quit"));
        commands.insert("qq".into(), CommandNode::alias("q"));
        commands.insert("gone".into(), CommandNode::alias("missing"));

        let q = &commands["q"];
        assert!(matches!(
            resolve_alias(&commands, q).map(|node| node.binding().map(|b| b.context.as_str())),
            Ok(Some("core"))
        ));
        assert_eq!(
            resolve_alias(&commands, &commands["qq"]).unwrap_err(),
            AliasFault::Chained("q")
        );
        assert_eq!(
            resolve_alias(&commands, &commands["gone"]).unwrap_err(),
            AliasFault::Missing("missing")
        );
    }
}
