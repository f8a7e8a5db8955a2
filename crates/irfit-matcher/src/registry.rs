//! The identifier registry: IR element id → matched source elements.
//!
//! The registry is the only mutable state shared across files. It owns the
//! consumption bits of the (immutable) IR pool, so an IR element can be the
//! target of at most one source element for the whole run.

use fixedbitset::FixedBitSet;
use indexmap::IndexMap;
use irfit_common::ElementKind;
use irfit_ir::{IrElementRef, IrPool};
use irfit_source::{FileId, MatchLink, SourceElementRef, SourceFile};

/// A source element of a specific file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceHandle {
    pub file: FileId,
    pub element: SourceElementRef,
}

/// Records matches and enforces at-most-once consumption of IR elements.
#[derive(Debug, Clone)]
pub struct IdMapper {
    /// Per IR element kind: IR id → source elements, in recording order.
    entries: Vec<IndexMap<String, Vec<SourceHandle>>>,
    /// Per IR element kind: consumed arena indices.
    consumed: Vec<FixedBitSet>,
}

impl IdMapper {
    pub fn new(pool: &IrPool) -> Self {
        IdMapper {
            entries: ElementKind::ALL.iter().map(|_| IndexMap::new()).collect(),
            consumed: ElementKind::ALL
                .iter()
                .map(|&kind| FixedBitSet::with_capacity(pool.len(kind)))
                .collect(),
        }
    }

    #[inline]
    pub fn is_consumed(&self, ir: IrElementRef) -> bool {
        self.consumed[ir.kind().index()].contains(ir.index())
    }

    /// Link `src` to `ir` and consume `ir`.
    ///
    /// Returns `false` without changing anything when `ir` is already
    /// consumed or `src` already carries a link.
    pub fn record(
        &mut self,
        pool: &IrPool,
        file_id: FileId,
        file: &mut SourceFile,
        src: SourceElementRef,
        ir: IrElementRef,
    ) -> bool {
        let ir_id = pool.element_id(ir);
        if self.is_consumed(ir) {
            tracing::warn!(ir = ir_id, file = %file.path, "IR element already consumed");
            return false;
        }
        if let Some(existing) = &file.meta(src).link {
            tracing::warn!(
                ir = ir_id,
                existing = %existing.ir_id,
                file = %file.path,
                "source element already matched"
            );
            return false;
        }
        let link = MatchLink {
            ir,
            ir_id: ir_id.to_string(),
        };
        if !file.set_link(src, link) {
            return false;
        }
        self.consumed[ir.kind().index()].insert(ir.index());
        self.entries[ir.kind().index()]
            .entry(ir_id.to_string())
            .or_default()
            .push(SourceHandle { file: file_id, element: src });
        tracing::trace!(ir = ir_id, kind = %ir.kind(), "recorded match");
        true
    }

    /// Number of recorded IR elements of `kind`.
    pub fn recorded(&self, kind: ElementKind) -> usize {
        self.entries[kind.index()].len()
    }

    /// Flattened view over all kinds: IR id → source elements.
    pub fn merge(&self) -> IndexMap<String, Vec<SourceHandle>> {
        let mut merged: IndexMap<String, Vec<SourceHandle>> = IndexMap::new();
        for per_kind in &self.entries {
            for (id, handles) in per_kind {
                merged.entry(id.clone()).or_default().extend(handles.iter().copied());
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use irfit_ir::{IrModifiers, IrPoolBuilder};

    fn setup() -> (IrPool, SourceFile) {
        let mut b = IrPoolBuilder::new();
        let ty = b.add_type("p.A");
        b.add_field(ty, "x", "int");
        let pool = b.finish().pool;
        let mut file = SourceFile::new("p/A.src.json", "p");
        let a = file.add_type("A", None, None);
        file.add_field(a, "x", "int", None);
        file.add_field(a, "y", "int", None);
        (pool, file)
    }

    #[test]
    fn test_record_consumes_once() {
        let (pool, mut file) = setup();
        let mut registry = IdMapper::new(&pool);
        let ty = pool.type_by_name("p.A").unwrap();
        let ir_field = IrElementRef::Field(pool.ty(ty).fields[0]);
        let x = SourceElementRef::Field(file.ty(irfit_source::SrcTypeId(0)).fields[0]);
        let y = SourceElementRef::Field(file.ty(irfit_source::SrcTypeId(0)).fields[1]);

        assert!(!registry.is_consumed(ir_field));
        assert!(registry.record(&pool, FileId(0), &mut file, x, ir_field));
        assert!(registry.is_consumed(ir_field));
        // Second consumer is rejected.
        assert!(!registry.record(&pool, FileId(0), &mut file, y, ir_field));
        assert!(file.meta(y).link.is_none());
        assert_eq!(registry.recorded(ElementKind::Field), 1);
    }

    #[test]
    fn test_record_rejects_linked_source() {
        let mut b = IrPoolBuilder::new();
        let ty = b.add_type("p.A");
        let m1 = b.add_method(ty, "f", "void", &[] as &[&str], IrModifiers::empty());
        let m2 = b.add_method(ty, "g", "void", &[] as &[&str], IrModifiers::empty());
        let pool = b.finish().pool;
        let mut file = SourceFile::new("p/A.src.json", "p");
        let a = file.add_type("A", None, None);
        let f = file.add_method(a, "f", Some("void"), false, None);
        let mut registry = IdMapper::new(&pool);

        assert!(registry.record(&pool, FileId(0), &mut file, f.into(), m1.into()));
        assert!(!registry.record(&pool, FileId(0), &mut file, f.into(), m2.into()));
        assert!(!registry.is_consumed(m2.into()));
    }

    #[test]
    fn test_merge_flattens_kinds_in_order() {
        let (pool, mut file) = setup();
        let mut registry = IdMapper::new(&pool);
        let ty = pool.type_by_name("p.A").unwrap();
        let field = pool.ty(ty).fields[0];
        let src_ty = irfit_source::SrcTypeId(0);
        let src_field = file.ty(src_ty).fields[0];
        registry.record(&pool, FileId(0), &mut file, src_field.into(), field.into());
        registry.record(&pool, FileId(0), &mut file, src_ty.into(), ty.into());

        let merged = registry.merge();
        let ids: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["p.A", "<p.A: int x>"]);
        assert_eq!(merged["p.A"][0].element, SourceElementRef::Type(src_ty));
    }
}
