//! Variable-arity call resolution.
//!
//! A call to a variable-arity method has as many source arguments as the
//! caller wrote, but the compiled call passes a single trailing array, so
//! (name, arity) groups of the two sides may disagree. Groups that fail to
//! pair are deferred and re-grouped here once the fixed-arity groups of the
//! method are settled.

use crate::registry::IdMapper;
use indexmap::IndexMap;
use irfit_ir::{IrElementRef, IrInvocationId, IrMethodId, IrPool};
use irfit_source::SrcInvocationId;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

type Arities = SmallVec<[usize; 2]>;

/// Variable-arity platform methods (`Type.name` → IR arities).
static PLATFORM_VARARGS: Lazy<FxHashMap<&'static str, Arities>> = Lazy::new(|| {
    let entries: [(&str, &[usize]); 8] = [
        ("java.lang.Class.getConstructor", &[1]),
        ("java.lang.Class.getDeclaredConstructor", &[1]),
        ("java.lang.Class.getDeclaredMethod", &[2]),
        ("java.lang.Class.getMethod", &[2]),
        ("java.lang.String.format", &[2, 3]),
        ("java.lang.reflect.Constructor.newInstance", &[1]),
        ("java.lang.reflect.Method.invoke", &[2]),
        ("java.util.Arrays.asList", &[1]),
    ];
    entries
        .into_iter()
        .map(|(name, arities)| (name, Arities::from_slice(arities)))
        .collect()
});

/// A source call group with no equal-size IR counterpart.
#[derive(Debug, Clone)]
pub struct DeferredGroup {
    pub name: String,
    pub arity: usize,
    pub sources: Vec<SrcInvocationId>,
}

/// Known variable-arity methods for one run.
#[derive(Debug, Clone, Default)]
pub struct VarargTable {
    entries: FxHashMap<String, Arities>,
}

impl VarargTable {
    /// A table without any entry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The platform table.
    pub fn platform() -> Self {
        let mut table = Self::empty();
        for (name, arities) in PLATFORM_VARARGS.iter() {
            table.insert(name, arities);
        }
        table
    }

    /// Platform entries, methods the pool flags as variable-arity and
    /// user-configured entries.
    pub fn build(pool: &IrPool, extra: &IndexMap<String, Vec<usize>>) -> Self {
        let mut table = Self::platform();
        for (name, arities) in pool.vararg_methods() {
            table.insert(name, arities);
        }
        for (name, arities) in extra {
            table.insert(name, arities);
        }
        table
    }

    pub fn insert(&mut self, naming_id: &str, arities: &[usize]) {
        let entry = self.entries.entry(naming_id.to_string()).or_default();
        for &arity in arities {
            if !entry.contains(&arity) {
                entry.push(arity);
            }
        }
        entry.sort_unstable();
    }

    pub fn arities(&self, naming_id: &str) -> Option<&[usize]> {
        self.entries.get(naming_id).map(SmallVec::as_slice)
    }

    pub fn contains(&self, naming_id: &str) -> bool {
        self.entries.contains_key(naming_id)
    }

    /// True when exactly one arity variant of `naming_id` could have been
    /// called with `src_arity` source arguments (the source passes at least
    /// every fixed argument) and that variant is the IR call's arity.
    /// Methods with several such variants are left alone.
    pub fn is_plausible(&self, naming_id: &str, ir_arity: usize, src_arity: usize) -> bool {
        let Some(arities) = self.arities(naming_id) else {
            return false;
        };
        let mut plausible = arities.iter().filter(|&&variant| src_arity + 1 >= variant);
        match (plausible.next(), plausible.next()) {
            (Some(&variant), None) => variant == ir_arity,
            _ => false,
        }
    }

    /// Re-group the unconsumed calls of `ir_method` for a deferred source
    /// group: exact-arity calls of that name plus calls to a known
    /// variable-arity method with a single plausible variant, in appearance
    /// order.
    pub fn regroup(
        &self,
        pool: &IrPool,
        registry: &IdMapper,
        ir_method: IrMethodId,
        name: &str,
        src_arity: usize,
    ) -> Vec<IrInvocationId> {
        pool.method(ir_method)
            .invocations
            .iter()
            .copied()
            .filter(|&call| !registry.is_consumed(IrElementRef::Invocation(call)))
            .filter(|&call| {
                let ir = pool.invocation(call);
                ir.name == name
                    && (ir.arity() == src_arity
                        || self.is_plausible(&ir.naming_id(), ir.arity(), src_arity))
            })
            .collect()
    }
}
