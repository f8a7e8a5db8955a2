//! Source/IR correlation engine.
//!
//! A [`MatchSession`] takes source files produced by a front end and one
//! [`IrPool`](irfit_ir::IrPool), and links every source element it can to
//! the low-level element it compiled to. The result is a [`MatchReport`]:
//! IR id → source elements, aliases between IR variable slots and source
//! variables, diagnostics and the count of elements left unmatched.
//!
//! Matching is heuristic and never fails. See [`engine`] for the per-type
//! pipeline.

pub mod alias;
pub mod engine;
pub mod facts;
pub mod options;
pub mod ordering;
pub mod registry;
pub mod report;
pub mod session;
pub mod stats;
pub mod targets;
pub mod type_uses;
pub mod varargs;

pub use alias::{AliasKind, AliasRecorder};
pub use engine::TypeMatchState;
pub use facts::{Facts, FactsError, FactsReader, LocalAssignment};
pub use options::MatchOptions;
pub use registry::{IdMapper, SourceHandle};
pub use report::{MatchReport, ReportedElement};
pub use session::{MatchSession, RunResult};
pub use stats::{KindStats, MatchStats};
pub use targets::resolve_invocation_target;
pub use varargs::VarargTable;

#[cfg(test)]
#[path = "../tests/session_tests.rs"]
mod session_tests;
