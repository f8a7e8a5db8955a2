//! Alias recorder: IR variable slots denoted by source variables.

use indexmap::{IndexMap, IndexSet};

/// How the correspondence between slot and source variable was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasKind {
    Receiver,
    Parameter,
    /// Base variable of a call, from invocation facts.
    CallBase,
    /// Variable assigned the result of a call or allocation.
    AssignTarget,
}

/// Multi-valued map slot id → source symbol ids. Has no effect on matching.
#[derive(Debug, Clone, Default)]
pub struct AliasRecorder {
    aliases: IndexMap<String, IndexSet<String>>,
}

impl AliasRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: AliasKind, source_symbol: &str, slot_id: &str) {
        tracing::trace!(?kind, slot = slot_id, symbol = source_symbol, "alias");
        self.aliases
            .entry(slot_id.to_string())
            .or_default()
            .insert(source_symbol.to_string());
    }

    pub fn get(&self, slot_id: &str) -> Option<&IndexSet<String>> {
        self.aliases.get(slot_id)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn into_map(self) -> IndexMap<String, IndexSet<String>> {
        self.aliases
    }
}
