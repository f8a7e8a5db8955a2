//! Declaring-method resolution for matched calls.

use irfit_common::limits::MAX_HIERARCHY_DEPTH;
use irfit_ir::{IrInvocation, IrPool, method_id};
use rustc_hash::FxHashSet;

const OBJECT: &str = "java.lang.Object";

/// Id of the method a call resolves to: the first type of the hierarchy
/// walk from the call's declared target type (then its supertypes, depth
/// first) that declares a method with the call's name, return type and
/// parameter types. Falls back to the unresolved descriptor.
pub fn resolve_invocation_target(pool: &IrPool, call: &IrInvocation) -> String {
    let mut visited = FxHashSet::default();
    let mut stack = vec![(call.target_type.as_str(), 0usize)];
    while let Some((ty_name, depth)) = stack.pop() {
        if ty_name == OBJECT || depth > MAX_HIERARCHY_DEPTH || !visited.insert(ty_name) {
            continue;
        }
        let Some(ty) = pool.type_by_name(ty_name) else {
            continue;
        };
        if let Some(found) = pool.find_method(ty, &call.name, &call.return_type, &call.param_types) {
            return pool.method(found).id.clone();
        }
        // Reverse so the first declared supertype is visited first.
        for super_type in pool.ty(ty).super_types.iter().rev() {
            stack.push((super_type.as_str(), depth + 1));
        }
    }
    tracing::trace!(call = %call.id, "call target not declared in the pool");
    method_id(&call.target_type, &call.return_type, &call.name, &call.param_types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use irfit_ir::{IrModifiers, IrPoolBuilder};

    #[test]
    fn test_target_found_in_supertype() {
        let mut b = IrPoolBuilder::new();
        let base = b.add_type("p.Base");
        b.add_method(base, "run", "void", &["int"], IrModifiers::PUBLIC);
        let iface = b.add_type("p.Iface");
        b.add_method(iface, "run", "void", &["int"], IrModifiers::ABSTRACT);
        let derived = b.add_type("p.Derived");
        b.add_super_type(derived, "p.Base");
        b.add_super_type(derived, "p.Iface");
        let caller = b.add_method(derived, "go", "void", &[] as &[&str], IrModifiers::empty());
        let call = b.add_invocation(caller, "p.Derived", "run", "void", &["int"], Some(3));
        let pool = b.finish().pool;

        assert_eq!(
            resolve_invocation_target(&pool, pool.invocation(call)),
            "<p.Base: void run(int)>"
        );
    }

    #[test]
    fn test_unresolved_target_keeps_descriptor() {
        let mut b = IrPoolBuilder::new();
        let a = b.add_type("p.A");
        let m = b.add_method(a, "m", "void", &[] as &[&str], IrModifiers::empty());
        let call = b.add_invocation(m, "java.lang.String", "format", "java.lang.String", &["java.lang.String", "java.lang.Object[]"], None);
        let pool = b.finish().pool;

        assert_eq!(
            resolve_invocation_target(&pool, pool.invocation(call)),
            "<java.lang.String: java.lang.String format(java.lang.String,java.lang.Object[])>"
        );
    }

    #[test]
    fn test_cyclic_hierarchy_terminates() {
        let mut b = IrPoolBuilder::new();
        let a = b.add_type("p.A");
        let c = b.add_type("p.C");
        b.add_super_type(a, "p.C");
        b.add_super_type(c, "p.A");
        let m = b.add_method(a, "m", "void", &[] as &[&str], IrModifiers::empty());
        let call = b.add_invocation(m, "p.A", "missing", "void", &[] as &[&str], None);
        let pool = b.finish().pool;

        assert_eq!(resolve_invocation_target(&pool, pool.invocation(call)), "<p.A: void missing()>");
    }
}
