//! Centralized limits and thresholds for matching.
//!
//! These bound the work the heuristics may do on pathological inputs. All of
//! them degrade precision when hit, never correctness of recorded matches.

// =============================================================================
// Signature Candidates
// =============================================================================

/// Maximum number of method-id candidates generated from the Cartesian
/// product of fuzzy return/parameter type candidates.
///
/// A method with ten parameters whose types each resolve to three wildcard
/// candidates would otherwise produce 3^11 ids. Candidates past the cap are
/// dropped with a warning and the method may stay unmatched.
pub const MAX_SIGNATURE_CANDIDATES: usize = 4096;

// =============================================================================
// Type Hierarchy Walks
// =============================================================================

/// Maximum supertype depth explored when resolving an invocation target.
///
/// Guards against cycles in malformed IR hierarchies.
pub const MAX_HIERARCHY_DEPTH: usize = 64;

/// Maximum nesting depth of lambdas matched recursively inside one method.
pub const MAX_LAMBDA_NESTING: usize = 32;

// =============================================================================
// Capacity Hints
// =============================================================================

/// Initial capacity of per-method grouping tables.
pub const GROUP_TABLE_CAPACITY: usize = 16;
