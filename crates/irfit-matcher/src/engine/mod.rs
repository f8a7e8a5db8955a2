//! The matching engine.
//!
//! Matching proceeds per source file, and within a file per declared type
//! in document order. Each type moves through [`TypeMatchState`]:
//!
//! - `Unseen → TypeMatched`: the IR type with the source type's binary name
//!   is found and not yet consumed.
//! - `TypeMatched → MembersMatched`: fields by name, methods by name, arity
//!   and signature heuristics ([`members`]).
//! - `MembersMatched → BodiesMatched`: statement-level elements of every
//!   matched method ([`bodies`]), then the outer-`this` and reflective-array
//!   passes ([`passes`]).
//! - `BodiesMatched → Finalized`: placeholders for IR call and allocation
//!   sites left unmatched, and type-use resolution.
//!
//! Nothing here fails: heuristics that do not apply leave elements
//! unmatched and emit a [`MatchDiagnostic`].

mod bodies;
mod members;
mod passes;

use crate::alias::AliasRecorder;
use crate::options::MatchOptions;
use crate::ordering::first_inversion;
use crate::registry::IdMapper;
use crate::type_uses::resolve_type_uses;
use crate::varargs::VarargTable;
use irfit_common::{DiagnosticCollector, DiagnosticKind, MatchDiagnostic};
use irfit_ir::{IrElementRef, IrMethodId, IrPool};
use irfit_source::{FileId, SourceElementRef, SourceFile, SrcMethodId, SrcTypeId};

/// Progress of one source type through the matching pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TypeMatchState {
    Unseen,
    TypeMatched,
    MembersMatched,
    BodiesMatched,
    Finalized,
}

/// Run-wide state borrowed by every file pass.
pub(crate) struct MatchContext<'s> {
    pub pool: &'s IrPool,
    pub options: &'s MatchOptions,
    pub varargs: &'s VarargTable,
    pub registry: &'s mut IdMapper,
    pub aliases: &'s mut AliasRecorder,
    pub diagnostics: &'s mut DiagnosticCollector,
}

/// Matches the elements of one source file against the pool.
pub(crate) struct FileMatcher<'s> {
    pool: &'s IrPool,
    options: &'s MatchOptions,
    varargs: &'s VarargTable,
    registry: &'s mut IdMapper,
    aliases: &'s mut AliasRecorder,
    diagnostics: &'s mut DiagnosticCollector,
    file_id: FileId,
    file: &'s mut SourceFile,
    states: Vec<TypeMatchState>,
    /// Matched (source, IR) method pairs of the current type, lambdas
    /// included, in matching order.
    method_pairs: Vec<(SrcMethodId, IrMethodId)>,
}

impl<'s> FileMatcher<'s> {
    pub(crate) fn new(ctx: MatchContext<'s>, file_id: FileId, file: &'s mut SourceFile) -> Self {
        let type_count = file.type_ids().count();
        FileMatcher {
            pool: ctx.pool,
            options: ctx.options,
            varargs: ctx.varargs,
            registry: ctx.registry,
            aliases: ctx.aliases,
            diagnostics: ctx.diagnostics,
            file_id,
            file,
            states: vec![TypeMatchState::Unseen; type_count],
            method_pairs: Vec::new(),
        }
    }

    /// Match every type of the file; returns the final state per type.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %self.file.path))]
    pub(crate) fn match_file(mut self) -> Vec<TypeMatchState> {
        let types: Vec<SrcTypeId> = self.file.type_ids().collect();
        for ty in types {
            self.match_type(ty);
        }
        self.states
    }

    fn match_type(&mut self, ty: SrcTypeId) {
        let pool = self.pool;
        let binary_name = self.file.ty(ty).binary_name.clone();
        let Some(ir_ty) = pool.type_by_name(&binary_name) else {
            tracing::debug!(ty = %binary_name, "no IR type");
            return;
        };
        if !self.record(ty, ir_ty) {
            return;
        }
        self.states[ty.index()] = TypeMatchState::TypeMatched;

        self.match_fields(ty, ir_ty);
        self.match_methods(ty, ir_ty);
        self.states[ty.index()] = TypeMatchState::MembersMatched;

        self.method_pairs.clear();
        let methods = self.file.ty(ty).methods.clone();
        for method in methods {
            if let Some(ir_method) = self.matched_ir_method(method) {
                self.match_method_body(method, ir_method, 0);
            }
        }
        self.resolve_outer_this();
        self.resolve_reflective_arrays();
        self.states[ty.index()] = TypeMatchState::BodiesMatched;

        self.synthesize_placeholders();
        resolve_type_uses(pool, self.file, ty, ir_ty);
        self.states[ty.index()] = TypeMatchState::Finalized;
        tracing::debug!(ty = %binary_name, pairs = self.method_pairs.len(), "type finalized");
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    fn matched_ir_method(&self, method: SrcMethodId) -> Option<IrMethodId> {
        match self.file.method(method).meta.link.as_ref()?.ir {
            IrElementRef::Method(ir) => Some(ir),
            _ => None,
        }
    }

    #[inline]
    fn is_consumed(&self, ir: impl Into<IrElementRef>) -> bool {
        self.registry.is_consumed(ir.into())
    }

    /// Record a match; a rejected record is a redundant-match diagnostic.
    fn record(&mut self, src: impl Into<SourceElementRef>, ir: impl Into<IrElementRef>) -> bool {
        let (src, ir) = (src.into(), ir.into());
        if self
            .registry
            .record(self.pool, self.file_id, self.file, src, ir)
        {
            return true;
        }
        let line = self.file.meta(src).start_line();
        let message = format!(
            "{} '{}' cannot be matched with {}: already matched",
            src.kind(),
            self.file.display_name(src),
            self.pool.element_id(ir)
        );
        self.diagnose(DiagnosticKind::RedundantMatch, line, message);
        false
    }

    fn diagnose(&mut self, kind: DiagnosticKind, line: Option<u32>, message: String) {
        tracing::warn!(file = %self.file.path, line = ?line, %kind, "{message}");
        self.diagnostics
            .push(MatchDiagnostic::new(kind, self.file.path.clone(), message).at_line(line));
    }

    /// Pair two equal-size groups positionally. With ordering verification
    /// on, a group whose source order contradicts the IR line order is
    /// abandoned.
    fn pair_group(&mut self, label: &str, sources: &[SourceElementRef], irs: &[IrElementRef]) -> bool {
        debug_assert_eq!(sources.len(), irs.len());
        if self.options.verify_ordering
            && let Some((i, j)) = first_inversion(self.file, self.pool, sources, irs)
        {
            let line = self.file.meta(sources[i]).start_line();
            let message = format!(
                "{label}: elements {i} and {j} appear in a different order than in the IR; group abandoned"
            );
            self.diagnose(DiagnosticKind::OrderingViolation, line, message);
            return false;
        }
        for (&src, &ir) in sources.iter().zip(irs) {
            self.record(src, ir);
        }
        true
    }
}

fn src_refs<T: Copy + Into<SourceElementRef>>(items: &[T]) -> Vec<SourceElementRef> {
    items.iter().map(|&item| item.into()).collect()
}

fn ir_refs<T: Copy + Into<IrElementRef>>(items: &[T]) -> Vec<IrElementRef> {
    items.iter().map(|&item| item.into()).collect()
}

#[cfg(test)]
#[path = "../../tests/engine_tests.rs"]
mod engine_tests;
