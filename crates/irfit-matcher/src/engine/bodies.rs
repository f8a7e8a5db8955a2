//! Statement-level matching inside a matched method.
//!
//! Every element kind is grouped on both sides by a key that survives
//! compilation (callee name and argument count, allocated type, field name)
//! and equal-size groups are paired positionally. Only the IR elements of
//! the IR method matched by the enclosing source method are candidates.

use super::{FileMatcher, ir_refs, src_refs};
use crate::alias::AliasKind;
use crate::varargs::DeferredGroup;
use indexmap::IndexMap;
use irfit_common::limits::{GROUP_TABLE_CAPACITY, MAX_LAMBDA_NESTING};
use irfit_common::type_names::{simple_ir_type, simple_source_type};
use irfit_common::{AccessKind, DiagnosticKind};
use irfit_ir::{IrAllocationId, IrFieldAccessId, IrInvocationId, IrMethodId};
use irfit_source::{SrcAllocationId, SrcFieldAccessId, SrcMethodId};

impl FileMatcher<'_> {
    pub(super) fn match_method_body(&mut self, src: SrcMethodId, ir: IrMethodId, depth: usize) {
        if depth > MAX_LAMBDA_NESTING {
            let line = self.file.method(src).meta.start_line();
            let message = format!("lambdas nested deeper than {MAX_LAMBDA_NESTING} levels are not matched");
            self.diagnose(DiagnosticKind::UnsupportedConstruct, line, message);
            return;
        }
        tracing::trace!(method = %self.pool.method(ir).id, depth, "matching body");
        self.method_pairs.push((src, ir));

        self.match_variables(src, ir);
        self.match_calls(src, ir);
        self.match_call_bases(src, ir);
        self.match_allocations(src, ir);
        self.match_field_accesses(src, ir);
        self.match_casts(src, ir);
        self.match_method_refs(src, ir);
        self.match_lambdas(src, ir, depth);
    }

    // =========================================================================
    // Variables
    // =========================================================================

    /// Receiver to `@this`, parameters to `@parameterN`. Captured values the
    /// compiler prepends to constructors and lambda implementations shift
    /// the IR parameters by the arity difference.
    fn match_variables(&mut self, src: SrcMethodId, ir: IrMethodId) {
        let pool = self.pool;
        let ir_method = pool.method(ir);
        let (receiver, params) = {
            let method = self.file.method(src);
            (method.receiver, method.params.clone())
        };

        if let (Some(receiver), Some(ir_receiver)) = (receiver, ir_method.receiver)
            && self.record(receiver, ir_receiver)
        {
            self.aliases.record(
                AliasKind::Receiver,
                &self.file.variable(receiver).symbol,
                &pool.variable(ir_receiver).id,
            );
        }

        let Some(shift) = ir_method.params.len().checked_sub(params.len()) else {
            tracing::debug!(method = %ir_method.id, "IR method has fewer parameters than source");
            return;
        };
        for (&param, &ir_param) in params.iter().zip(&ir_method.params[shift..]) {
            if self.record(param, ir_param) {
                self.aliases.record(
                    AliasKind::Parameter,
                    &self.file.variable(param).symbol,
                    &pool.variable(ir_param).id,
                );
            }
        }
    }

    // =========================================================================
    // Calls
    // =========================================================================

    fn match_calls(&mut self, src: SrcMethodId, ir: IrMethodId) {
        let pool = self.pool;

        let mut src_groups = IndexMap::with_capacity(GROUP_TABLE_CAPACITY);
        for &call in &self.file.method(src).invocations {
            let invocation = self.file.invocation(call);
            src_groups
                .entry((invocation.name.clone(), invocation.arity))
                .or_insert_with(Vec::new)
                .push(call);
        }

        let mut ir_groups: IndexMap<(&str, usize), Vec<IrInvocationId>> =
            IndexMap::with_capacity(GROUP_TABLE_CAPACITY);
        for &call in &pool.method(ir).invocations {
            if self.is_consumed(call) {
                continue;
            }
            let invocation = pool.invocation(call);
            ir_groups
                .entry((invocation.name.as_str(), invocation.arity()))
                .or_default()
                .push(call);
        }

        let mut deferred = Vec::new();
        for ((name, arity), sources) in src_groups {
            match ir_groups.get(&(name.as_str(), arity)) {
                Some(irs) if irs.len() == sources.len() => {
                    let label = format!("calls to {name}/{arity}");
                    self.pair_group(&label, &src_refs(&sources), &ir_refs(irs));
                }
                _ => deferred.push(DeferredGroup { name, arity, sources }),
            }
        }
        self.resolve_deferred_calls(ir, deferred);
    }

    /// Second pass over the groups without an equal-size IR counterpart,
    /// once every fixed-arity group of the method is settled.
    fn resolve_deferred_calls(&mut self, ir: IrMethodId, deferred: Vec<DeferredGroup>) {
        for group in deferred {
            let regrouped = self
                .varargs
                .regroup(self.pool, self.registry, ir, &group.name, group.arity);
            let label = format!("calls to {}/{}", group.name, group.arity);
            if regrouped.len() == group.sources.len() {
                tracing::debug!(group = %label, "settled by variable-arity regrouping");
                self.pair_group(&label, &src_refs(&group.sources), &ir_refs(&regrouped));
                continue;
            }

            let line = self.file.invocation(group.sources[0]).meta.start_line();
            let message = format!(
                "{label}: {} in source, {} in IR; pairing by line",
                group.sources.len(),
                regrouped.len()
            );
            self.diagnose(DiagnosticKind::StructuralMismatch, line, message);
            self.pair_calls_by_line(ir, &group);
        }
    }

    /// A source line holding a single call of the group pairs with the only
    /// unconsumed IR call of the same name and arity hinted at that line.
    fn pair_calls_by_line(&mut self, ir: IrMethodId, group: &DeferredGroup) {
        let pool = self.pool;
        let mut by_line: IndexMap<u32, Vec<_>> = IndexMap::new();
        for &call in &group.sources {
            let meta = &self.file.invocation(call).meta;
            if let Some(line) = meta.start_line()
                && !meta.is_matched()
            {
                by_line.entry(line).or_default().push(call);
            }
        }

        for (line, calls) in by_line {
            let &[call] = calls.as_slice() else {
                continue;
            };
            let candidates: Vec<IrInvocationId> = pool
                .method(ir)
                .invocations
                .iter()
                .copied()
                .filter(|&c| {
                    let invocation = pool.invocation(c);
                    !self.is_consumed(c)
                        && invocation.line == Some(line)
                        && invocation.name == group.name
                        && invocation.arity() == group.arity
                })
                .collect();
            if let &[only] = candidates.as_slice() {
                self.record(call, only);
            }
        }
    }

    /// Base variables of matched calls. A receiver or parameter base maps to
    /// its matched IR slot, any other variable to the slot
    /// `<ir-method-id>/<name>`.
    fn match_call_bases(&mut self, src: SrcMethodId, ir: IrMethodId) {
        let pool = self.pool;
        let ir_id = &pool.method(ir).id;
        for &call in &self.file.method(src).invocations {
            let invocation = self.file.invocation(call);
            let Some(base) = invocation.base else {
                continue;
            };
            if !invocation.meta.is_matched() {
                continue;
            }
            let variable = self.file.variable(base);
            let slot = match &variable.meta.link {
                Some(link) => link.ir_id.clone(),
                None => format!("{ir_id}/{}", variable.name),
            };
            self.aliases.record(AliasKind::CallBase, &variable.symbol, &slot);
        }
    }

    // =========================================================================
    // Allocations
    // =========================================================================

    fn match_allocations(&mut self, src: SrcMethodId, ir: IrMethodId) {
        let pool = self.pool;

        let mut src_groups: IndexMap<String, Vec<SrcAllocationId>> = IndexMap::new();
        for &alloc in &self.file.method(src).allocations {
            let allocation = self.file.allocation(alloc);
            let base = simple_source_type(&allocation.ty);
            let key = format!(
                "{}{}",
                base.trim_end_matches("[]"),
                "[]".repeat(allocation.dimensions as usize)
            );
            src_groups.entry(key).or_default().push(alloc);
        }

        let mut ir_groups: IndexMap<&str, Vec<IrAllocationId>> = IndexMap::new();
        for &alloc in &pool.method(ir).allocations {
            if !self.is_consumed(alloc) {
                ir_groups
                    .entry(simple_ir_type(&pool.allocation(alloc).ty))
                    .or_default()
                    .push(alloc);
            }
        }

        for (key, sources) in src_groups {
            let irs = ir_groups.get(key.as_str()).map(Vec::as_slice).unwrap_or_default();
            if irs.len() == sources.len() {
                self.pair_group(&format!("allocations of {key}"), &src_refs(&sources), &ir_refs(irs));
                continue;
            }
            // Multi-dimensional arrays may compile to reflective factory calls.
            let multi_dimensional = self.file.allocation(sources[0]).dimensions > 1;
            if !(irs.is_empty() && multi_dimensional) {
                let line = self.file.allocation(sources[0]).meta.start_line();
                let message = format!(
                    "allocations of {key}: {} in source, {} in IR",
                    sources.len(),
                    irs.len()
                );
                self.diagnose(DiagnosticKind::StructuralMismatch, line, message);
            }
            if self.options.lossy {
                self.pair_allocations_by_line(&sources, irs);
            }
        }
    }

    /// Lossy pairing: an allocation that is the only one of its group on
    /// its line takes the first unconsumed IR allocation of the group with
    /// that line hint. Allocations of other types on the line do not count.
    fn pair_allocations_by_line(&mut self, sources: &[SrcAllocationId], irs: &[IrAllocationId]) {
        let pool = self.pool;
        for &alloc in sources {
            let Some(line) = self.file.allocation(alloc).meta.start_line() else {
                continue;
            };
            let on_line = sources
                .iter()
                .filter(|&&other| self.file.allocation(other).meta.start_line() == Some(line))
                .count();
            if on_line != 1 {
                continue;
            }
            let found = irs
                .iter()
                .copied()
                .find(|&ir| !self.is_consumed(ir) && pool.allocation(ir).line == Some(line));
            if let Some(ir) = found {
                tracing::debug!(line, ir = %pool.allocation(ir).id, "lossy allocation pairing");
                self.record(alloc, ir);
            }
        }
    }

    // =========================================================================
    // Field accesses
    // =========================================================================

    /// Accesses group by field name. An equal-size group whose read/write
    /// kinds disagree somewhere is contradictory and abandoned; groups of
    /// different sizes are split by access kind.
    fn match_field_accesses(&mut self, src: SrcMethodId, ir: IrMethodId) {
        let pool = self.pool;

        let mut src_groups: IndexMap<String, Vec<SrcFieldAccessId>> = IndexMap::new();
        for &access in &self.file.method(src).field_accesses {
            let field_access = self.file.field_access(access);
            // `Outer.this` is settled by the outer-this pass.
            if field_access.outer_this.is_none() {
                src_groups.entry(field_access.name.clone()).or_default().push(access);
            }
        }

        let mut ir_groups: IndexMap<&str, Vec<IrFieldAccessId>> = IndexMap::new();
        for &access in &pool.method(ir).field_accesses {
            if !self.is_consumed(access) {
                ir_groups
                    .entry(pool.field_access(access).name.as_str())
                    .or_default()
                    .push(access);
            }
        }

        for (name, sources) in src_groups {
            let irs = ir_groups.get(name.as_str()).map(Vec::as_slice).unwrap_or_default();
            if irs.len() == sources.len() {
                let disagreement = sources
                    .iter()
                    .zip(irs)
                    .position(|(&s, &i)| self.file.field_access(s).kind != pool.field_access(i).kind);
                if let Some(index) = disagreement {
                    let line = self.file.field_access(sources[index]).meta.start_line();
                    let message = format!("accesses of field '{name}': read/write kinds disagree; group abandoned");
                    self.diagnose(DiagnosticKind::StructuralMismatch, line, message);
                } else {
                    self.pair_group(&format!("accesses of {name}"), &src_refs(&sources), &ir_refs(irs));
                }
                continue;
            }

            for kind in [AccessKind::Read, AccessKind::Write] {
                let src_kind: Vec<SrcFieldAccessId> = sources
                    .iter()
                    .copied()
                    .filter(|&s| self.file.field_access(s).kind == kind)
                    .collect();
                let ir_kind: Vec<IrFieldAccessId> = irs
                    .iter()
                    .copied()
                    .filter(|&i| pool.field_access(i).kind == kind)
                    .collect();
                if src_kind.is_empty() {
                    continue;
                }
                if src_kind.len() == ir_kind.len() {
                    let label = format!("{}{name}", kind.id_prefix());
                    self.pair_group(&label, &src_refs(&src_kind), &ir_refs(&ir_kind));
                } else {
                    let line = self.file.field_access(src_kind[0]).meta.start_line();
                    let message = format!(
                        "accesses of field '{name}' ({kind:?}): {} in source, {} in IR",
                        src_kind.len(),
                        ir_kind.len()
                    );
                    self.diagnose(DiagnosticKind::StructuralMismatch, line, message);
                }
            }
        }
    }

    // =========================================================================
    // Casts, method references, lambdas
    // =========================================================================

    fn match_casts(&mut self, src: SrcMethodId, ir: IrMethodId) {
        let sources = self.file.method(src).casts.clone();
        let irs: Vec<_> = self
            .pool
            .method(ir)
            .casts
            .iter()
            .copied()
            .filter(|&cast| !self.is_consumed(cast))
            .collect();
        if sources.len() == irs.len() {
            if !sources.is_empty() {
                self.pair_group("casts", &src_refs(&sources), &ir_refs(&irs));
            }
        } else if !sources.is_empty() {
            let line = self.file.cast(sources[0]).meta.start_line();
            let message = format!("casts: {} in source, {} in IR", sources.len(), irs.len());
            self.diagnose(DiagnosticKind::StructuralMismatch, line, message);
        }
    }

    fn match_method_refs(&mut self, src: SrcMethodId, ir: IrMethodId) {
        let pool = self.pool;

        let mut src_groups: IndexMap<String, Vec<_>> = IndexMap::new();
        for &method_ref in &self.file.method(src).method_refs {
            src_groups
                .entry(self.file.method_ref(method_ref).name.clone())
                .or_default()
                .push(method_ref);
        }
        let mut ir_groups: IndexMap<&str, Vec<_>> = IndexMap::new();
        for &method_ref in &pool.method(ir).method_refs {
            if !self.is_consumed(method_ref) {
                ir_groups
                    .entry(pool.method_ref(method_ref).name.as_str())
                    .or_default()
                    .push(method_ref);
            }
        }

        for (name, sources) in src_groups {
            match ir_groups.get(name.as_str()) {
                Some(irs) if irs.len() == sources.len() => {
                    self.pair_group(&format!("references to {name}"), &src_refs(&sources), &ir_refs(irs));
                }
                other => {
                    let line = self.file.method_ref(sources[0]).meta.start_line();
                    let message = format!(
                        "references to '{name}': {} in source, {} in IR",
                        sources.len(),
                        other.map_or(0, Vec::len)
                    );
                    self.diagnose(DiagnosticKind::StructuralMismatch, line, message);
                }
            }
        }
    }

    /// Source lambdas pair positionally with the IR lambda sites of the
    /// method; each matches the site's implementation method, whose body is
    /// matched in turn.
    fn match_lambdas(&mut self, src: SrcMethodId, ir: IrMethodId, depth: usize) {
        let pool = self.pool;
        let lambdas = self.file.method(src).lambdas.clone();
        let sites = &pool.method(ir).lambdas;
        if lambdas.len() != sites.len() {
            if let Some(&first) = lambdas.first() {
                let line = self.file.method(first).meta.start_line();
                let message = format!("lambdas: {} in source, {} in IR", lambdas.len(), sites.len());
                self.diagnose(DiagnosticKind::StructuralMismatch, line, message);
            }
            return;
        }

        for (&lambda, &site) in lambdas.iter().zip(sites) {
            let line = self.file.method(lambda).meta.start_line();
            let site = pool.lambda(site);
            let Some(implementation) = site.implementation else {
                let message = format!("lambda implementation {} not found", site.implementation_id);
                self.diagnose(DiagnosticKind::MissingInput, line, message);
                continue;
            };
            let src_arity = self.file.method(lambda).arity();
            let ir_arity = pool.method(implementation).arity();
            if ir_arity < src_arity {
                let message = format!(
                    "lambda takes {src_arity} parameters but {} takes {ir_arity}",
                    pool.method(implementation).id
                );
                self.diagnose(DiagnosticKind::StructuralMismatch, line, message);
                continue;
            }
            if self.record(lambda, implementation) {
                self.match_method_body(lambda, implementation, depth + 1);
            }
        }
    }
}
