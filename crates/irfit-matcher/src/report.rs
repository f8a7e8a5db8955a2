//! The flattened result of a matching run.

use crate::registry::SourceHandle;
use indexmap::{IndexMap, IndexSet};
use irfit_common::type_names::synthesize_type;
use irfit_common::{ElementKind, MatchDiagnostic, Position};
use irfit_ir::{IrElementRef, IrPool};
use irfit_source::{MethodKind, SourceElementRef, SourceFile};
use serde::Serialize;

/// A source element as it appears in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedElement {
    pub file: String,
    pub kind: ElementKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Source-side identifier, for elements that have one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub authoritative: bool,
    /// Parameter types of a method, combining source and IR spellings.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub param_types: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    /// IR element id → matched and placeholder source elements.
    pub entries: IndexMap<String, Vec<ReportedElement>>,
    /// IR variable slot → source variable symbols.
    pub aliases: IndexMap<String, IndexSet<String>>,
    pub diagnostics: Vec<MatchDiagnostic>,
    pub unmatched: usize,
    /// Source call (IR call-site id) → declaring method id.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub resolved_targets: IndexMap<String, String>,
}

impl MatchReport {
    /// Total number of reported source elements.
    pub fn element_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Reported source elements of one IR id.
    pub fn get(&self, ir_id: &str) -> &[ReportedElement] {
        self.entries.get(ir_id).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Report entry for one recorded source element.
pub(crate) fn report_element(
    pool: &IrPool,
    file: &SourceFile,
    handle: SourceHandle,
    synthesize_types: bool,
) -> ReportedElement {
    let element = handle.element;
    let meta = file.meta(element);
    let kind = match element {
        SourceElementRef::Method(m) if file.method(m).kind == MethodKind::Lambda => ElementKind::Lambda,
        other => other.kind(),
    };
    let id = match element {
        SourceElementRef::Type(t) => Some(file.ty(t).binary_name.clone()),
        SourceElementRef::Field(f) => {
            let field = file.field(f);
            Some(format!("{}.{}", file.ty(field.declaring).binary_name, field.name))
        }
        SourceElementRef::Method(m) => Some(file.qualified_method_name(m)),
        SourceElementRef::Variable(v) => Some(file.variable(v).symbol.clone()),
        _ => None,
    };
    let param_types = match (element, meta.link.as_ref().map(|link| link.ir)) {
        (SourceElementRef::Method(m), Some(IrElementRef::Method(ir))) if synthesize_types => {
            let src_types = file.param_types(m);
            let ir_types = &pool.method(ir).param_types;
            // Captured values lead the IR parameter list.
            let shift = ir_types.len().saturating_sub(src_types.len());
            src_types
                .iter()
                .zip(&ir_types[shift..])
                .map(|(src, ir_ty)| match src {
                    Some(src) => synthesize_type(src, ir_ty),
                    None => ir_ty.clone(),
                })
                .collect()
        }
        _ => Vec::new(),
    };
    ReportedElement {
        file: file.path.clone(),
        kind,
        name: file.display_name(element),
        position: meta.pos,
        id,
        authoritative: meta.authoritative,
        param_types,
    }
}
