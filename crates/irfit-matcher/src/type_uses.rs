//! Resolution of type usages inside matched types.

use irfit_common::type_names::is_boxed_representation;
use irfit_ir::{IrPool, IrTypeId};
use irfit_source::{FuzzyTypeResolver, SourceFile, SrcTypeId};

/// Resolve every type usage of `ty`, matched to `ir_ty`.
///
/// A candidate the IR type lists among its annotations or referenced types
/// wins. Otherwise any candidate naming a pool type or a boxed primitive
/// representation is taken.
pub fn resolve_type_uses(pool: &IrPool, file: &mut SourceFile, ty: SrcTypeId, ir_ty: IrTypeId) {
    let ir_type = pool.ty(ir_ty);
    let resolved: Vec<_> = {
        let resolver = FuzzyTypeResolver::new(file);
        file.ty(ty)
            .type_usages
            .iter()
            .map(|&usage| {
                let name = &file.type_usage(usage).name;
                let candidates = resolver.resolve(Some(name));
                let known = candidates
                    .iter()
                    .find(|c| ir_type.annotations.contains(c) || ir_type.referenced_types.contains(c))
                    .cloned()
                    .or_else(|| {
                        candidates.iter().find_map(|c| {
                            if pool.type_by_name(c).is_some() || is_boxed_representation(c) {
                                return Some(c.clone());
                            }
                            let lang = format!("java.lang.{c}");
                            is_boxed_representation(&lang).then_some(lang)
                        })
                    });
                (usage, known)
            })
            .collect()
    };

    for (usage, known) in resolved {
        match known {
            Some(id) => {
                tracing::trace!(usage = %file.type_usage(usage).name, resolved = %id, "type use resolved");
                file.type_usage_mut(usage).resolved = Some(id);
            }
            None => tracing::debug!(usage = %file.type_usage(usage).name, "type use unresolved"),
        }
    }
}
