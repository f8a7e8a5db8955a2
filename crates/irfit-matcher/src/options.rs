//! Matching options.

use indexmap::IndexMap;

/// Switches for the heuristics of one matching run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOptions {
    /// Pair allocations by line when group sizes disagree.
    pub lossy: bool,
    /// Check source order against IR line order before positional pairing.
    pub verify_ordering: bool,
    /// Resolve the declaring method of every matched call.
    pub resolve_invocations: bool,
    /// Report method parameter types combining source and IR spellings.
    pub synthesize_types: bool,
    /// Extra variable-arity methods: `Type.name` → possible IR arities.
    pub extra_vararg_methods: IndexMap<String, Vec<usize>>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        MatchOptions {
            lossy: false,
            verify_ordering: true,
            resolve_invocations: false,
            synthesize_types: false,
            extra_vararg_methods: IndexMap::new(),
        }
    }
}
