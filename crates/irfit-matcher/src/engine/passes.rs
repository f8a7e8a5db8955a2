//! Cross-cutting passes over the matched method pairs of a type.

use super::{FileMatcher, ir_refs, src_refs};
use irfit_common::names::{REFLECTIVE_ARRAY_FACTORY, is_outer_this_field};
use irfit_ir::IrInvocationId;
use irfit_source::{FuzzyTypeResolver, SrcAllocationId};

impl FileMatcher<'_> {
    /// `Outer.this` compiles to a read of the captured `this$N` field.
    pub(super) fn resolve_outer_this(&mut self) {
        let pool = self.pool;
        for (src, ir) in self.method_pairs.clone() {
            let pending: Vec<_> = self
                .file
                .method(src)
                .field_accesses
                .iter()
                .copied()
                .filter_map(|access| {
                    let field_access = self.file.field_access(access);
                    let qualifier = field_access.outer_this.as_deref()?;
                    (!field_access.meta.is_matched()).then(|| (access, qualifier.to_string()))
                })
                .collect();

            for (access, qualifier) in pending {
                let candidates = FuzzyTypeResolver::new(self.file).resolve(Some(&qualifier));
                let found = pool.method(ir).field_accesses.iter().copied().find(|&ir_access| {
                    let ir_access_record = pool.field_access(ir_access);
                    !self.is_consumed(ir_access)
                        && ir_access_record.kind.is_read()
                        && is_outer_this_field(&ir_access_record.name)
                        && ir_access_record
                            .field_type
                            .as_ref()
                            .is_some_and(|ty| candidates.contains(ty))
                });
                match found {
                    Some(ir_access) => {
                        self.record(access, ir_access);
                    }
                    None => tracing::debug!(%qualifier, "no captured outer instance read"),
                }
            }
        }
    }

    /// Multi-dimensional array creations left over against reflective
    /// array factory calls, only when both sides have the same count.
    pub(super) fn resolve_reflective_arrays(&mut self) {
        let pool = self.pool;
        for (src, ir) in self.method_pairs.clone() {
            let sources: Vec<SrcAllocationId> = self
                .file
                .method(src)
                .allocations
                .iter()
                .copied()
                .filter(|&alloc| {
                    let allocation = self.file.allocation(alloc);
                    allocation.dimensions > 1 && !allocation.meta.is_matched()
                })
                .collect();
            if sources.is_empty() {
                continue;
            }
            let irs: Vec<IrInvocationId> = pool
                .method(ir)
                .invocations
                .iter()
                .copied()
                .filter(|&call| {
                    !self.is_consumed(call) && pool.invocation(call).naming_id() == REFLECTIVE_ARRAY_FACTORY
                })
                .collect();
            if sources.len() == irs.len() {
                self.pair_group("reflective array creations", &src_refs(&sources), &ir_refs(&irs));
            } else {
                tracing::debug!(
                    method = %pool.method(ir).id,
                    source = sources.len(),
                    ir = irs.len(),
                    "reflective array counts differ"
                );
            }
        }
    }

    /// Unconsumed IR call and allocation sites with a line hint become
    /// non-authoritative source elements of the matched source method.
    pub(super) fn synthesize_placeholders(&mut self) {
        let pool = self.pool;
        for (src, ir) in self.method_pairs.clone() {
            let ir_method = pool.method(ir);
            for &call in &ir_method.invocations {
                let invocation = pool.invocation(call);
                if let Some(line) = invocation.line
                    && !self.is_consumed(call)
                {
                    let placeholder =
                        self.file
                            .add_placeholder_invocation(src, &invocation.name, invocation.arity(), line);
                    self.record(placeholder, call);
                }
            }
            for &alloc in &ir_method.allocations {
                let allocation = pool.allocation(alloc);
                if let Some(line) = allocation.line
                    && !self.is_consumed(alloc)
                {
                    let placeholder = self.file.add_placeholder_allocation(src, &allocation.ty, line);
                    self.record(placeholder, alloc);
                }
            }
        }
    }
}
