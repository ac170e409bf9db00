//! User-defined aliases from the configuration file

use crate::dispatch::{CommandMap, CommandNode, Module};
use std::collections::BTreeMap;

/// Context id of the alias module
pub const CONTEXT: &str = "aliases";

/// Exports one alias node per configured alias
pub struct AliasModule {
    aliases: BTreeMap<String, String>,
}

impl AliasModule {
    pub fn new(aliases: BTreeMap<String, String>) -> Self {
        AliasModule { aliases }
    }
}

impl Module for AliasModule {
    fn context_id(&self) -> &str {
        CONTEXT
    }

    fn commands(&self) -> CommandMap {
        self.aliases
            .iter()
            .map(|(name, target)| (name.clone(), CommandNode::alias(target.clone())))
            .collect()
    }
}
