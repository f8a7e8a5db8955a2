//! Diagnostic types for the matching engine.
//!
//! Nothing in matching is fatal: every failed heuristic degrades precision
//! and leaves a diagnostic behind, so a run always produces a (possibly
//! partial) report together with the reasons elements stayed unmatched.

use serde::Serialize;
use std::fmt;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Message = 2,
}

/// What went wrong while matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// Group sizes, arities or read/write kinds disagree.
    StructuralMismatch,
    /// Several equally plausible candidates and no tiebreak.
    Ambiguity,
    /// A referenced IR method or lambda implementation does not exist.
    MissingInput,
    /// A source construct that is not modeled.
    UnsupportedConstruct,
    /// Source visit order contradicts IR appearance order inside a group.
    OrderingViolation,
    /// An element was offered a second match.
    RedundantMatch,
}

impl DiagnosticKind {
    /// Default category for diagnostics of this kind.
    pub const fn category(self) -> DiagnosticCategory {
        match self {
            DiagnosticKind::MissingInput => DiagnosticCategory::Error,
            DiagnosticKind::StructuralMismatch
            | DiagnosticKind::Ambiguity
            | DiagnosticKind::UnsupportedConstruct
            | DiagnosticKind::OrderingViolation
            | DiagnosticKind::RedundantMatch => DiagnosticCategory::Warning,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticKind::StructuralMismatch => "structural-mismatch",
            DiagnosticKind::Ambiguity => "ambiguity",
            DiagnosticKind::MissingInput => "missing-input",
            DiagnosticKind::UnsupportedConstruct => "unsupported-construct",
            DiagnosticKind::OrderingViolation => "ordering-violation",
            DiagnosticKind::RedundantMatch => "redundant-match",
        };
        f.write_str(s)
    }
}

/// A matching diagnostic, optionally anchored to a source line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchDiagnostic {
    pub kind: DiagnosticKind,
    pub category: DiagnosticCategory,
    /// Source file path (relative), or the IR input for pool diagnostics.
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub message: String,
}

impl MatchDiagnostic {
    /// Create a diagnostic with the default category of `kind`.
    #[must_use]
    pub fn new(kind: DiagnosticKind, file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            category: kind.category(),
            file: file.into(),
            line: None,
            message: message.into(),
        }
    }

    /// Anchor this diagnostic to a source line.
    #[must_use]
    pub fn at_line(mut self, line: Option<u32>) -> Self {
        self.line = line;
        self
    }
}

impl fmt::Display for MatchDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: [{}] {}", self.file, line, self.kind, self.message),
            None => write!(f, "{}: [{}] {}", self.file, self.kind, self.message),
        }
    }
}

// =============================================================================
// Collector
// =============================================================================

/// Accumulates diagnostics for one run.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct DiagnosticCollector {
    diagnostics: Vec<MatchDiagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: MatchDiagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = MatchDiagnostic>) {
        self.diagnostics.extend(other);
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchDiagnostic> {
        self.diagnostics.iter()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of diagnostics of the given kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    pub fn into_vec(self) -> Vec<MatchDiagnostic> {
        self.diagnostics
    }
}
