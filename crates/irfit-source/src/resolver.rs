//! Fuzzy resolution of partial source type names.
//!
//! Source files spell types however the author wrote them. Without a full
//! type checker the best we can do is produce the ordered set of fully
//! qualified ids the name may denote, given the declarations and imports of
//! the file, and let the matcher pick the one the IR knows about.

use crate::file::SourceFile;
use indexmap::IndexSet;
use irfit_common::limits::MAX_SIGNATURE_CANDIDATES;
use irfit_common::type_names::{dots_to_dollars, is_primitive_type, simplify_type};
use rustc_hash::FxHashMap;

/// Candidate method ids produced by [`FuzzyTypeResolver::method_candidates`].
#[derive(Debug, Clone, Default)]
pub struct MethodCandidates {
    pub ids: IndexSet<String>,
    /// The Cartesian product hit [`MAX_SIGNATURE_CANDIDATES`].
    pub truncated: bool,
}

/// Resolves type names in the context of one source file.
pub struct FuzzyTypeResolver<'a> {
    file: &'a SourceFile,
    /// Unqualified name → binary name of non-anonymous types in the file.
    local_types: FxHashMap<&'a str, &'a str>,
}

impl<'a> FuzzyTypeResolver<'a> {
    pub fn new(file: &'a SourceFile) -> Self {
        let mut local_types = FxHashMap::default();
        for id in file.type_ids() {
            let ty = file.ty(id);
            if !ty.anonymous {
                local_types
                    .entry(ty.name.as_str())
                    .or_insert(ty.binary_name.as_str());
            }
        }
        FuzzyTypeResolver { file, local_types }
    }

    /// Candidate ids for `ty`, most specific first. An absent type is `void`.
    pub fn resolve(&self, ty: Option<&str>) -> IndexSet<String> {
        let mut out = IndexSet::new();
        let Some(raw) = ty else {
            out.insert("void".to_string());
            return out;
        };
        let simplified = simplify_type(raw);
        let base = simplified.trim_end_matches("[]");
        let dims = &simplified[base.len()..];

        if base.is_empty() || is_primitive_type(base) {
            out.insert(simplified);
            return out;
        }

        if let Some(&local) = self.local_types.get(base) {
            out.insert(format!("{local}{dims}"));
            return out;
        }

        for import in self.file.imports.iter().filter(|i| i.is_single_type()) {
            let simple = import.simple_name();
            if simple == base {
                out.insert(format!("{}{dims}", dots_to_dollars(&import.name)));
                return out;
            }
            if let Some(rest) = base.strip_prefix(simple)
                && let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix('$'))
            {
                let nested = format!("{}.{rest}", import.name);
                out.insert(format!("{}{dims}", dots_to_dollars(&nested)));
                return out;
            }
        }

        out.insert(format!("{}{dims}", dots_to_dollars(base)));
        if !self.file.package.is_empty() {
            out.insert(format!("{}{dims}", dots_to_dollars(&format!("{}.{base}", self.file.package))));
        }
        for import in self.file.imports.iter().filter(|i| i.is_wildcard && !i.is_static) {
            out.insert(format!("{}{dims}", dots_to_dollars(&format!("{}.{base}", import.name))));
        }
        out
    }

    /// Every method id `<owner: R name(P1,..)>` the given source signature
    /// may denote: the Cartesian product of the return and parameter type
    /// candidates, capped at [`MAX_SIGNATURE_CANDIDATES`].
    pub fn method_candidates(
        &self,
        owner: &str,
        return_type: Option<&str>,
        name: &str,
        param_types: &[Option<&str>],
    ) -> MethodCandidates {
        let mut truncated = false;
        // Partial signatures: (return type, params so far).
        let mut partial: Vec<(String, Vec<String>)> = self
            .resolve(return_type)
            .into_iter()
            .map(|ret| (ret, Vec::new()))
            .collect();

        for param in param_types {
            let options = self.resolve(*param);
            let mut next = Vec::with_capacity(partial.len() * options.len());
            'product: for (ret, params) in &partial {
                for option in &options {
                    if next.len() >= MAX_SIGNATURE_CANDIDATES {
                        truncated = true;
                        break 'product;
                    }
                    let mut extended = params.clone();
                    extended.push(option.clone());
                    next.push((ret.clone(), extended));
                }
            }
            partial = next;
        }

        if truncated {
            tracing::warn!(
                owner,
                name,
                limit = MAX_SIGNATURE_CANDIDATES,
                "method signature candidates truncated"
            );
        }

        let ids = partial
            .into_iter()
            .map(|(ret, params)| irfit_ir::method_id(owner, &ret, name, &params))
            .collect();
        MethodCandidates { ids, truncated }
    }
}

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod resolver_tests;
