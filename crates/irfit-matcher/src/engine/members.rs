//! Field and method matching inside a matched type.

use super::FileMatcher;
use indexmap::IndexMap;
use irfit_common::DiagnosticKind;
use irfit_common::names::{CONSTRUCTOR, is_constructor_or_initializer};
use irfit_common::type_names::{simple_ir_type, simple_types_equal};
use irfit_ir::{IrMethodId, IrModifiers, IrTypeId};
use irfit_source::{FuzzyTypeResolver, MethodKind, SrcMethodId, SrcTypeId};

impl FileMatcher<'_> {
    // =========================================================================
    // Fields
    // =========================================================================

    /// Fields match by exact name against the first unconsumed IR field.
    /// IR fields left over become placeholder fields at the type.
    pub(super) fn match_fields(&mut self, ty: SrcTypeId, ir_ty: IrTypeId) {
        let pool = self.pool;
        let ir_fields = &pool.ty(ir_ty).fields;

        for field in self.file.ty(ty).fields.clone() {
            let name = self.file.field(field).name.clone();
            let candidate = ir_fields
                .iter()
                .copied()
                .find(|&ir| pool.field(ir).name == name && !self.is_consumed(ir));
            match candidate {
                Some(ir) => {
                    self.record(field, ir);
                }
                None => tracing::debug!(field = %name, "no IR field"),
            }
        }

        for &ir in ir_fields {
            if self.is_consumed(ir) {
                continue;
            }
            let ir_field = pool.field(ir);
            let placeholder = self.file.add_placeholder_field(ty, &ir_field.name, &ir_field.ty);
            self.record(placeholder, ir);
        }
    }

    // =========================================================================
    // Methods
    // =========================================================================

    /// Methods match by name, then by arity, then by simplified parameter
    /// types, then by fully resolved signature candidates; constructors of
    /// inner types finally account for the captured outer instances.
    pub(super) fn match_methods(&mut self, ty: SrcTypeId, ir_ty: IrTypeId) {
        let pool = self.pool;

        let mut src_by_name: IndexMap<String, Vec<SrcMethodId>> = IndexMap::new();
        for &m in &self.file.ty(ty).methods {
            let method = self.file.method(m);
            // Instance initializer blocks compile into every constructor.
            if method.kind == MethodKind::InstanceInitializer {
                continue;
            }
            src_by_name.entry(method.name.clone()).or_default().push(m);
        }

        let mut ir_by_name: IndexMap<&str, Vec<IrMethodId>> = IndexMap::new();
        for &m in &pool.ty(ir_ty).methods {
            let method = pool.method(m);
            if method.modifiers.contains(IrModifiers::BRIDGE) {
                continue;
            }
            ir_by_name.entry(method.name.as_str()).or_default().push(m);
        }

        for (name, sources) in &src_by_name {
            let Some(candidates) = ir_by_name.get(name.as_str()) else {
                if !is_constructor_or_initializer(name) {
                    let line = self.file.method(sources[0]).meta.start_line();
                    let message = format!(
                        "method '{name}' of {} has no IR counterpart",
                        self.file.ty(ty).binary_name
                    );
                    self.diagnose(DiagnosticKind::StructuralMismatch, line, message);
                }
                continue;
            };
            if let ([src], [ir]) = (sources.as_slice(), candidates.as_slice()) {
                if !self.is_consumed(*ir) {
                    self.record(*src, *ir);
                }
                continue;
            }
            // Arity says nothing about constructors taking captured outer
            // instances; those are matched below.
            if name == CONSTRUCTOR && !pool.ty(ir_ty).outer_types.is_empty() {
                continue;
            }
            for &src in sources {
                self.match_overload(src, candidates);
            }
        }

        let binary_name = self.file.ty(ty).binary_name.clone();
        for (name, sources) in &src_by_name {
            if !ir_by_name.contains_key(name.as_str()) {
                continue;
            }
            for &src in sources {
                if !self.file.method(src).meta.is_matched() {
                    self.match_by_signature(src, &binary_name, ir_ty);
                }
            }
        }

        if let (Some(sources), Some(ctors)) = (src_by_name.get(CONSTRUCTOR), ir_by_name.get(CONSTRUCTOR)) {
            for &src in sources {
                if !self.file.method(src).meta.is_matched() {
                    self.match_inner_constructor(src, ir_ty, ctors);
                }
            }
        }

        for (name, sources) in &src_by_name {
            let Some(candidates) = ir_by_name.get(name.as_str()) else {
                continue;
            };
            for &src in sources {
                let method = self.file.method(src);
                if method.meta.is_matched() || method.implicit {
                    continue;
                }
                let open = candidates.iter().filter(|&&ir| !self.is_consumed(ir)).count();
                let line = method.meta.start_line();
                let (kind, message) = if open > 1 {
                    (
                        DiagnosticKind::Ambiguity,
                        format!("method '{name}' of {binary_name}: {open} IR candidates, none preferred"),
                    )
                } else {
                    (
                        DiagnosticKind::StructuralMismatch,
                        format!("method '{name}' of {binary_name}: no IR method with a compatible signature"),
                    )
                };
                self.diagnose(kind, line, message);
            }
        }
    }

    /// Several methods share a name: a unique unconsumed candidate of the
    /// same arity wins, otherwise a unique candidate whose simplified
    /// parameter types agree position by position.
    fn match_overload(&mut self, src: SrcMethodId, candidates: &[IrMethodId]) {
        let pool = self.pool;
        let arity = self.file.method(src).arity();
        let same_arity: Vec<IrMethodId> = candidates
            .iter()
            .copied()
            .filter(|&ir| !self.is_consumed(ir) && pool.method(ir).arity() == arity)
            .collect();

        let chosen = match same_arity.as_slice() {
            [] => None,
            [only] => Some(*only),
            _ => {
                let src_types = self.file.param_types(src);
                let survivors: Vec<IrMethodId> = same_arity
                    .iter()
                    .copied()
                    .filter(|&ir| {
                        src_types
                            .iter()
                            .zip(&pool.method(ir).param_types)
                            .all(|(src_ty, ir_ty)| src_ty.is_none_or(|s| simple_types_equal(s, ir_ty)))
                    })
                    .collect();
                match survivors.as_slice() {
                    [only] => Some(*only),
                    _ => None,
                }
            }
        };
        if let Some(ir) = chosen {
            self.record(src, ir);
        }
    }

    /// Match against the first unconsumed IR method whose id is among the
    /// resolved signature candidates of the source method.
    fn match_by_signature(&mut self, src: SrcMethodId, owner: &str, ir_ty: IrTypeId) {
        let pool = self.pool;
        let candidates = {
            let method = self.file.method(src);
            let params = self.file.param_types(src);
            FuzzyTypeResolver::new(self.file).method_candidates(
                owner,
                method.return_type.as_deref(),
                &method.name,
                &params,
            )
        };
        let found = pool
            .ty(ir_ty)
            .methods
            .iter()
            .copied()
            .find(|&ir| !self.is_consumed(ir) && candidates.ids.contains(&pool.method(ir).id));
        if let Some(ir) = found {
            tracing::debug!(method = %pool.method(ir).id, "matched by signature candidates");
            self.record(src, ir);
        }
    }

    /// A constructor of an inner type takes the captured outer instances as
    /// leading parameters.
    fn match_inner_constructor(&mut self, src: SrcMethodId, ir_ty: IrTypeId, ctors: &[IrMethodId]) {
        let pool = self.pool;
        let outer = &pool.ty(ir_ty).outer_types;
        if outer.is_empty() {
            return;
        }
        let shift = outer.len();
        let src_types = self.file.param_types(src);
        let found: Vec<IrMethodId> = ctors
            .iter()
            .copied()
            .filter(|&ir| {
                let params = &pool.method(ir).param_types;
                !self.is_consumed(ir)
                    && params.len() == shift + src_types.len()
                    && outer
                        .iter()
                        .zip(params)
                        .all(|(o, p)| simple_ir_type(o) == simple_ir_type(p))
                    && src_types
                        .iter()
                        .zip(&params[shift..])
                        .all(|(s, p)| s.is_none_or(|s| simple_types_equal(s, p)))
            })
            .collect();
        if let [only] = found.as_slice() {
            self.record(src, *only);
        }
    }
}
