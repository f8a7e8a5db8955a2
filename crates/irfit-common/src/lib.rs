//! Common types and utilities for the irfit source/IR matcher.
//!
//! This crate provides foundational types used across all irfit crates:
//! - Source positions (`Position`)
//! - Type-name normalization helpers shared by both models
//! - Low-level names of compiler-generated methods
//! - Matching limits and thresholds
//! - Element and access kinds shared by both hierarchies
//! - Match diagnostics (`MatchDiagnostic`, `DiagnosticCollector`)

// Position types for line/column source locations
pub mod position;
pub use position::Position;

// Type-name normalization (generics, nested types, simple names)
pub mod type_names;

// Low-level names of constructors and initializers
pub mod names;

// Centralized limits and thresholds
pub mod limits;

// Diagnostics emitted while matching
pub mod diagnostics;
pub use diagnostics::{DiagnosticCategory, DiagnosticCollector, DiagnosticKind, MatchDiagnostic};

/// Kinds of elements shared by the source and IR hierarchies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    Type,
    Field,
    Method,
    Invocation,
    Allocation,
    FieldAccess,
    MethodRef,
    Cast,
    Lambda,
    Variable,
    StringConstant,
    TypeUsage,
}

impl ElementKind {
    pub const ALL: [ElementKind; 12] = [
        ElementKind::Type,
        ElementKind::Field,
        ElementKind::Method,
        ElementKind::Invocation,
        ElementKind::Allocation,
        ElementKind::FieldAccess,
        ElementKind::MethodRef,
        ElementKind::Cast,
        ElementKind::Lambda,
        ElementKind::Variable,
        ElementKind::StringConstant,
        ElementKind::TypeUsage,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ElementKind::Type => "type",
            ElementKind::Field => "field",
            ElementKind::Method => "method",
            ElementKind::Invocation => "invocation",
            ElementKind::Allocation => "allocation",
            ElementKind::FieldAccess => "field-access",
            ElementKind::MethodRef => "method-ref",
            ElementKind::Cast => "cast",
            ElementKind::Lambda => "lambda",
            ElementKind::Variable => "variable",
            ElementKind::StringConstant => "string-constant",
            ElementKind::TypeUsage => "type-usage",
        }
    }

    /// Dense index into per-kind tables.
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read/write kind of a field access, shared by both element hierarchies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    Read,
    Write,
}

impl AccessKind {
    /// Key prefix used when numbering IR field accesses.
    pub const fn id_prefix(self) -> &'static str {
        match self {
            AccessKind::Read => "read-field-",
            AccessKind::Write => "write-field-",
        }
    }

    pub const fn is_read(self) -> bool {
        matches!(self, AccessKind::Read)
    }
}
