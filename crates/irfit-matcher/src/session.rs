//! A matching run over a set of source files and one IR pool.

use crate::alias::{AliasKind, AliasRecorder};
use crate::engine::{FileMatcher, MatchContext, TypeMatchState};
use crate::facts::Facts;
use crate::options::MatchOptions;
use crate::registry::IdMapper;
use crate::report::{MatchReport, report_element};
use crate::stats::MatchStats;
use crate::targets::resolve_invocation_target;
use crate::varargs::VarargTable;
use indexmap::IndexMap;
use irfit_common::names::{MethodSlot, method_slot};
use irfit_common::{DiagnosticCollector, ElementKind, MatchDiagnostic};
use irfit_ir::{IrElementRef, IrMethodId, IrPool};
use irfit_source::{FileId, SourceElementRef, SourceFile, SrcMethodId};

/// Everything a run produces.
#[derive(Debug)]
pub struct RunResult {
    pub report: MatchReport,
    pub stats: MatchStats,
    /// The source files, with their match links and placeholders.
    pub files: Vec<SourceFile>,
}

/// Owns the mutable state of one run: the registry, aliases and
/// diagnostics. Files are matched sequentially in insertion order.
pub struct MatchSession<'p> {
    pool: &'p IrPool,
    options: MatchOptions,
    varargs: VarargTable,
    registry: IdMapper,
    aliases: AliasRecorder,
    diagnostics: DiagnosticCollector,
    files: Vec<SourceFile>,
    facts: Option<Facts>,
}

impl<'p> MatchSession<'p> {
    pub fn new(pool: &'p IrPool, options: MatchOptions) -> Self {
        let varargs = VarargTable::build(pool, &options.extra_vararg_methods);
        MatchSession {
            pool,
            options,
            varargs,
            registry: IdMapper::new(pool),
            aliases: AliasRecorder::new(),
            diagnostics: DiagnosticCollector::new(),
            files: Vec::new(),
            facts: None,
        }
    }

    /// Carry diagnostics produced while building the pool into the report.
    pub fn add_diagnostics(&mut self, diagnostics: impl IntoIterator<Item = MatchDiagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn add_file(&mut self, file: SourceFile) -> FileId {
        let id = FileId(self.files.len() as u32);
        self.files.push(file);
        id
    }

    pub fn set_facts(&mut self, facts: Facts) {
        self.facts = Some(facts);
    }

    #[tracing::instrument(level = "info", skip_all, fields(files = self.files.len()))]
    pub fn run(mut self) -> RunResult {
        for (index, file) in self.files.iter_mut().enumerate() {
            let ctx = MatchContext {
                pool: self.pool,
                options: &self.options,
                varargs: &self.varargs,
                registry: &mut self.registry,
                aliases: &mut self.aliases,
                diagnostics: &mut self.diagnostics,
            };
            let states = FileMatcher::new(ctx, FileId(index as u32), file).match_file();
            let finalized = states.iter().filter(|&&s| s == TypeMatchState::Finalized).count();
            tracing::debug!(file = %file.path, types = states.len(), finalized, "file matched");
        }

        if let Some(facts) = &self.facts {
            for file in &self.files {
                record_fact_aliases(self.pool, file, facts, &mut self.aliases);
            }
        }

        let resolved_targets = if self.options.resolve_invocations {
            self.resolve_targets()
        } else {
            IndexMap::new()
        };

        let entries = self
            .registry
            .merge()
            .into_iter()
            .map(|(ir_id, handles)| {
                let elements = handles
                    .into_iter()
                    .map(|handle| {
                        let file = &self.files[handle.file.index()];
                        report_element(self.pool, file, handle, self.options.synthesize_types)
                    })
                    .collect();
                (ir_id, elements)
            })
            .collect();

        let stats = MatchStats::collect(&self.files);
        let report = MatchReport {
            entries,
            aliases: self.aliases.into_map(),
            diagnostics: self.diagnostics.into_vec(),
            unmatched: stats.unmatched(),
            resolved_targets,
        };
        tracing::info!(
            ir_ids = report.entries.len(),
            elements = report.element_count(),
            unmatched = report.unmatched,
            diagnostics = report.diagnostics.len(),
            "matching finished"
        );
        RunResult {
            report,
            stats,
            files: self.files,
        }
    }

    /// IR call-site id → declaring method id, for every matched source call.
    fn resolve_targets(&self) -> IndexMap<String, String> {
        let mut resolved = IndexMap::new();
        for file in &self.files {
            for element in file.elements(ElementKind::Invocation) {
                if let Some(link) = &file.meta(element).link
                    && let IrElementRef::Invocation(call) = link.ir
                {
                    let target = resolve_invocation_target(self.pool, self.pool.invocation(call));
                    resolved.insert(link.ir_id.clone(), target);
                }
            }
        }
        resolved
    }
}

/// Aliases surfaced by fact relations: the base variable of matched calls,
/// the variables assigned by matched calls and allocations, and the locals
/// copied from the receiver or a parameter of a matched method.
fn record_fact_aliases(pool: &IrPool, file: &SourceFile, facts: &Facts, aliases: &mut AliasRecorder) {
    for element in file
        .elements(ElementKind::Method)
        .into_iter()
        .chain(file.elements(ElementKind::Lambda))
    {
        let SourceElementRef::Method(method) = element else {
            continue;
        };
        let Some(link) = &file.method(method).meta.link else {
            continue;
        };
        let IrElementRef::Method(ir) = link.ir else {
            continue;
        };
        record_local_aliases(pool, file, method, ir, facts, aliases);
    }

    for element in file
        .elements(ElementKind::Invocation)
        .into_iter()
        .chain(file.elements(ElementKind::Allocation))
    {
        let Some(link) = &file.meta(element).link else {
            continue;
        };
        let ir_id = link.ir_id.as_str();
        match element {
            SourceElementRef::Invocation(call) => {
                let invocation = file.invocation(call);
                if let (Some(base), Some(slot)) = (invocation.base, facts.invocation_base(ir_id)) {
                    aliases.record(AliasKind::CallBase, &file.variable(base).symbol, slot);
                }
                if let (Some(target), Some(slot)) = (invocation.target, facts.return_target(ir_id)) {
                    aliases.record(AliasKind::AssignTarget, &file.variable(target).symbol, slot);
                }
            }
            SourceElementRef::Allocation(alloc) => {
                let allocation = file.allocation(alloc);
                if let (Some(target), Some(slot)) = (allocation.target, facts.allocation_target(ir_id)) {
                    aliases.record(AliasKind::AssignTarget, &file.variable(target).symbol, slot);
                }
            }
            _ => {}
        }
    }
}

/// `x = this` and `x = pN` inside a matched method alias `x`'s slot with the
/// source receiver or parameter. Parameters are offset by the values the
/// compiler prepends.
fn record_local_aliases(
    pool: &IrPool,
    file: &SourceFile,
    method: SrcMethodId,
    ir: IrMethodId,
    facts: &Facts,
    aliases: &mut AliasRecorder,
) {
    let ir_method = pool.method(ir);
    let source = file.method(method);
    let shift = ir_method.params.len().saturating_sub(source.params.len());
    for assignment in facts.local_assignments(&ir_method.id) {
        let (kind, variable) = match method_slot(&assignment.from) {
            Some(MethodSlot::Receiver) => (AliasKind::Receiver, source.receiver),
            Some(MethodSlot::Parameter(index)) => (
                AliasKind::Parameter,
                index
                    .checked_sub(shift)
                    .and_then(|i| source.params.get(i).copied()),
            ),
            None => continue,
        };
        match variable {
            Some(variable) => aliases.record(kind, &file.variable(variable).symbol, &assignment.to),
            None => tracing::debug!(from = %assignment.from, method = %ir_method.id, "no source variable for local copy"),
        }
    }
}
