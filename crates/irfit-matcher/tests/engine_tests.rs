use super::*;
use irfit_common::{AccessKind, Position};
use irfit_ir::{IrModifiers, IrPoolBuilder};
use irfit_source::Import;

const NO_PARAMS: &[&str] = &[];

struct Outcome {
    states: Vec<TypeMatchState>,
    diagnostics: DiagnosticCollector,
    aliases: AliasRecorder,
}

fn run_with(pool: &IrPool, file: &mut SourceFile, options: MatchOptions) -> Outcome {
    let varargs = VarargTable::build(pool, &options.extra_vararg_methods);
    let mut registry = IdMapper::new(pool);
    let mut aliases = AliasRecorder::new();
    let mut diagnostics = DiagnosticCollector::new();
    let ctx = MatchContext {
        pool,
        options: &options,
        varargs: &varargs,
        registry: &mut registry,
        aliases: &mut aliases,
        diagnostics: &mut diagnostics,
    };
    let states = FileMatcher::new(ctx, FileId(0), file).match_file();
    Outcome {
        states,
        diagnostics,
        aliases,
    }
}

fn run(pool: &IrPool, file: &mut SourceFile) -> Outcome {
    run_with(pool, file, MatchOptions::default())
}

fn linked(file: &SourceFile, element: impl Into<SourceElementRef>) -> Option<&str> {
    file.meta(element.into()).link.as_ref().map(|link| link.ir_id.as_str())
}

fn at(line: u32) -> Option<Position> {
    Some(Position::new(line, 1, line, 20))
}

// =============================================================================
// Members
// =============================================================================

#[test]
fn test_type_pipeline_reaches_finalized() {
    let mut b = IrPoolBuilder::new();
    b.add_type("p.A");
    let pool = b.finish().pool;

    let mut file = SourceFile::new("p/A.src.json", "p");
    let a = file.add_type("A", None, at(1));
    let b_ty = file.add_type("B", None, at(9));

    let outcome = run(&pool, &mut file);
    assert_eq!(outcome.states, vec![TypeMatchState::Finalized, TypeMatchState::Unseen]);
    assert_eq!(linked(&file, a), Some("p.A"));
    assert_eq!(linked(&file, b_ty), None);
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn test_fields_match_by_name_and_leftovers_become_placeholders() {
    let mut b = IrPoolBuilder::new();
    let ty = b.add_type("p.A");
    b.add_field(ty, "x", "int");
    b.add_field(ty, "hidden", "java.lang.String");
    let pool = b.finish().pool;

    let mut file = SourceFile::new("p/A.src.json", "p");
    let a = file.add_type("A", None, at(1));
    let x = file.add_field(a, "x", "int", at(2));
    let y = file.add_field(a, "y", "int", at(3));

    run(&pool, &mut file);
    assert_eq!(linked(&file, x), Some("<p.A: int x>"));
    assert_eq!(linked(&file, y), None);

    let fields = &file.ty(a).fields;
    assert_eq!(fields.len(), 3);
    let placeholder = file.field(fields[2]);
    assert_eq!(placeholder.name, "hidden");
    assert!(!placeholder.meta.authoritative);
    assert_eq!(placeholder.meta.pos, at(1));
    assert_eq!(linked(&file, fields[2]), Some("<p.A: java.lang.String hidden>"));
}

#[test]
fn test_overloads_resolved_by_arity() {
    let mut b = IrPoolBuilder::new();
    let ty = b.add_type("p.A");
    b.add_method(ty, "f", "void", &["int"], IrModifiers::empty());
    b.add_method(ty, "f", "void", NO_PARAMS, IrModifiers::empty());
    let pool = b.finish().pool;

    let mut file = SourceFile::new("p/A.src.json", "p");
    let a = file.add_type("A", None, None);
    let f0 = file.add_method(a, "f", Some("void"), false, None);
    let f1 = file.add_method(a, "f", Some("void"), false, None);
    file.add_param(f1, "x", Some("int"), None);

    let outcome = run(&pool, &mut file);
    assert_eq!(linked(&file, f0), Some("<p.A: void f()>"));
    assert_eq!(linked(&file, f1), Some("<p.A: void f(int)>"));
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn test_overloads_resolved_by_simple_parameter_types() {
    let mut b = IrPoolBuilder::new();
    let ty = b.add_type("p.A");
    b.add_method(ty, "f", "void", &["int"], IrModifiers::empty());
    b.add_method(ty, "f", "void", &["java.lang.String"], IrModifiers::empty());
    let pool = b.finish().pool;

    let mut file = SourceFile::new("p/A.src.json", "p");
    let a = file.add_type("A", None, None);
    let by_string = file.add_method(a, "f", Some("void"), false, None);
    file.add_param(by_string, "s", Some("String"), None);
    let by_int = file.add_method(a, "f", Some("void"), false, None);
    file.add_param(by_int, "i", Some("int"), None);

    run(&pool, &mut file);
    assert_eq!(linked(&file, by_string), Some("<p.A: void f(java.lang.String)>"));
    assert_eq!(linked(&file, by_int), Some("<p.A: void f(int)>"));
}

#[test]
fn test_overloads_resolved_by_signature_candidates() {
    let mut b = IrPoolBuilder::new();
    let ty = b.add_type("p.A");
    b.add_method(ty, "f", "void", &["p.List"], IrModifiers::empty());
    b.add_method(ty, "f", "void", &["java.util.List"], IrModifiers::empty());
    let pool = b.finish().pool;

    let mut file = SourceFile::new("p/A.src.json", "p");
    file.add_import(Import::parse("java.util.List", false, None));
    let a = file.add_type("A", None, None);
    let f = file.add_method(a, "f", Some("void"), false, None);
    file.add_param(f, "xs", Some("List<String>"), None);

    let outcome = run(&pool, &mut file);
    assert_eq!(linked(&file, f), Some("<p.A: void f(java.util.List)>"));
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn test_inner_constructors_skip_captured_outer_instance() {
    let mut b = IrPoolBuilder::new();
    b.add_type("p.Outer");
    let inner = b.add_type("p.Outer$Inner");
    b.add_field(inner, "this$0", "p.Outer");
    b.add_method(inner, "<init>", "void", &["p.Outer", "int"], IrModifiers::empty());
    b.add_method(inner, "<init>", "void", &["p.Outer", "int", "int"], IrModifiers::empty());
    let pool = b.finish().pool;

    let mut file = SourceFile::new("p/Outer.src.json", "p");
    let outer = file.add_type("Outer", None, None);
    let inner_ty = file.add_type("Inner", Some(outer), None);
    let one = file.add_constructor(inner_ty, None);
    file.add_param(one, "a", Some("int"), None);
    let two = file.add_constructor(inner_ty, None);
    file.add_param(two, "a", Some("int"), None);
    file.add_param(two, "b", Some("int"), None);

    let outcome = run(&pool, &mut file);
    assert_eq!(linked(&file, one), Some("<p.Outer$Inner: void <init>(p.Outer,int)>"));
    assert_eq!(linked(&file, two), Some("<p.Outer$Inner: void <init>(p.Outer,int,int)>"));

    // Parameters are shifted past the captured outer instance.
    let a = file.method(one).params[0];
    assert_eq!(
        linked(&file, a),
        Some("<p.Outer$Inner: void <init>(p.Outer,int)>/@parameter1")
    );
    let slot = outcome
        .aliases
        .get("<p.Outer$Inner: void <init>(p.Outer,int)>/@parameter1")
        .unwrap();
    assert!(slot.contains("p.Outer$Inner.<init>/a"));
}

#[test]
fn test_bridge_methods_are_not_candidates() {
    let mut b = IrPoolBuilder::new();
    let ty = b.add_type("p.A");
    b.add_method(
        ty,
        "compareTo",
        "int",
        &["java.lang.Object"],
        IrModifiers::BRIDGE | IrModifiers::SYNTHETIC,
    );
    b.add_method(ty, "compareTo", "int", &["p.A"], IrModifiers::PUBLIC);
    let pool = b.finish().pool;

    let mut file = SourceFile::new("p/A.src.json", "p");
    let a = file.add_type("A", None, None);
    let cmp = file.add_method(a, "compareTo", Some("int"), false, None);
    file.add_param(cmp, "other", Some("A"), None);

    run(&pool, &mut file);
    assert_eq!(linked(&file, cmp), Some("<p.A: int compareTo(p.A)>"));
}

#[test]
fn test_method_missing_from_ir_is_diagnosed_except_constructors() {
    let mut b = IrPoolBuilder::new();
    b.add_type("p.A");
    let pool = b.finish().pool;

    let mut file = SourceFile::new("p/A.src.json", "p");
    let a = file.add_type("A", None, None);
    file.add_constructor(a, at(2));
    file.add_method(a, "gone", Some("void"), false, at(3));

    let outcome = run(&pool, &mut file);
    assert_eq!(outcome.diagnostics.len(), 1);
    let diag = outcome.diagnostics.iter().next().unwrap();
    assert_eq!(diag.kind, DiagnosticKind::StructuralMismatch);
    assert_eq!(diag.line, Some(3));
}

#[test]
fn test_untyped_overload_is_ambiguous() {
    let mut b = IrPoolBuilder::new();
    let ty = b.add_type("p.A");
    b.add_method(ty, "f", "void", &["p.X"], IrModifiers::empty());
    b.add_method(ty, "f", "void", &["q.X"], IrModifiers::empty());
    let pool = b.finish().pool;

    let mut file = SourceFile::new("p/A.src.json", "p");
    let a = file.add_type("A", None, None);
    let f = file.add_method(a, "f", Some("void"), false, at(4));
    file.add_param(f, "x", None, None);

    let outcome = run(&pool, &mut file);
    assert_eq!(linked(&file, f), None);
    assert_eq!(outcome.diagnostics.count(DiagnosticKind::Ambiguity), 1);
}

// =============================================================================
// Bodies
// =============================================================================

/// `p.A.m()` on the IR side plus the matching empty source method.
fn method_fixture(build: impl FnOnce(&mut IrPoolBuilder, IrMethodId)) -> (IrPool, SourceFile, SrcMethodId) {
    let mut b = IrPoolBuilder::new();
    let ty = b.add_type("p.A");
    let m = b.add_method(ty, "m", "void", NO_PARAMS, IrModifiers::empty());
    build(&mut b, m);
    let pool = b.finish().pool;

    let mut file = SourceFile::new("p/A.src.json", "p");
    let a = file.add_type("A", None, at(1));
    let sm = file.add_method(a, "m", Some("void"), false, at(2));
    (pool, file, sm)
}

#[test]
fn test_receiver_is_matched_and_aliased() {
    let (pool, mut file, sm) = method_fixture(|_, _| {});
    let outcome = run(&pool, &mut file);
    let receiver = file.method(sm).receiver.unwrap();
    assert_eq!(linked(&file, receiver), Some("<p.A: void m()>/@this"));
    assert!(
        outcome
            .aliases
            .get("<p.A: void m()>/@this")
            .unwrap()
            .contains("p.A.m/this")
    );
}

#[test]
fn test_bases_of_matched_calls_are_aliased() {
    let (pool, mut file, sm) = method_fixture(|b, m| {
        b.add_invocation(m, "p.B", "g", "void", NO_PARAMS, Some(3));
        b.add_invocation(m, "p.A", "h", "void", NO_PARAMS, Some(4));
    });
    let receiver = file.method(sm).receiver.unwrap();
    let local = file.add_local(sm, "b", Some("B"), at(3));
    let other = file.add_local(sm, "c", Some("C"), at(5));
    let g = file.add_invocation(sm, "g", 0, at(3));
    file.invocation_mut(g).base = Some(local);
    let h = file.add_invocation(sm, "h", 0, at(4));
    file.invocation_mut(h).base = Some(receiver);
    let missing = file.add_invocation(sm, "close", 0, at(5));
    file.invocation_mut(missing).base = Some(other);

    let outcome = run(&pool, &mut file);
    assert_eq!(linked(&file, missing), None);
    assert!(
        outcome
            .aliases
            .get("<p.A: void m()>/b")
            .unwrap()
            .contains("p.A.m/b")
    );
    // A receiver base maps to the receiver slot.
    assert_eq!(outcome.aliases.get("<p.A: void m()>/@this").unwrap().len(), 1);
    assert!(outcome.aliases.get("<p.A: void m()>/c").is_none());
}

#[test]
fn test_calls_pair_positionally_within_groups() {
    let (pool, mut file, sm) = method_fixture(|b, m| {
        b.add_invocation(m, "p.B", "g", "void", NO_PARAMS, Some(3));
        b.add_invocation(m, "p.B", "g", "void", NO_PARAMS, Some(4));
        b.add_invocation(m, "p.B", "h", "void", &["int"], Some(5));
    });
    let g1 = file.add_invocation(sm, "g", 0, at(3));
    let g2 = file.add_invocation(sm, "g", 0, at(4));
    let h = file.add_invocation(sm, "h", 1, at(5));

    let outcome = run(&pool, &mut file);
    assert_eq!(linked(&file, g1), Some("<p.A: void m()>/p.B.g/0"));
    assert_eq!(linked(&file, g2), Some("<p.A: void m()>/p.B.g/1"));
    assert_eq!(linked(&file, h), Some("<p.A: void m()>/p.B.h/0"));
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn test_ordering_violation_abandons_group() {
    let build = |b: &mut IrPoolBuilder, m: IrMethodId| {
        b.add_invocation(m, "p.B", "g", "void", NO_PARAMS, Some(4));
        b.add_invocation(m, "p.B", "g", "void", NO_PARAMS, Some(3));
    };

    let (pool, mut file, sm) = method_fixture(build);
    let first = file.add_invocation(sm, "g", 0, at(3));
    let second = file.add_invocation(sm, "g", 0, at(4));
    let outcome = run(&pool, &mut file);
    assert_eq!(outcome.diagnostics.count(DiagnosticKind::OrderingViolation), 1);
    assert_eq!(linked(&file, first), None);
    assert_eq!(linked(&file, second), None);

    let (pool, mut file, sm) = method_fixture(build);
    let first = file.add_invocation(sm, "g", 0, at(3));
    file.add_invocation(sm, "g", 0, at(4));
    let options = MatchOptions {
        verify_ordering: false,
        ..MatchOptions::default()
    };
    let outcome = run_with(&pool, &mut file, options);
    assert_eq!(outcome.diagnostics.count(DiagnosticKind::OrderingViolation), 0);
    assert_eq!(linked(&file, first), Some("<p.A: void m()>/p.B.g/0"));
}

#[test]
fn test_field_access_kind_disagreement_aborts_group() {
    let (pool, mut file, sm) = method_fixture(|b, m| {
        b.add_field_access(m, "x", Some("int"), AccessKind::Read, Some(3));
        b.add_field_access(m, "x", Some("int"), AccessKind::Write, Some(4));
    });
    let write = file.add_field_access(sm, "x", AccessKind::Write, at(3));
    let read = file.add_field_access(sm, "x", AccessKind::Read, at(4));

    let outcome = run(&pool, &mut file);
    assert_eq!(linked(&file, write), None);
    assert_eq!(linked(&file, read), None);
    assert_eq!(outcome.diagnostics.count(DiagnosticKind::StructuralMismatch), 1);
}

#[test]
fn test_field_access_groups_split_by_kind_when_sizes_differ() {
    let (pool, mut file, sm) = method_fixture(|b, m| {
        b.add_field_access(m, "x", Some("int"), AccessKind::Read, Some(3));
        b.add_field_access(m, "x", Some("int"), AccessKind::Read, Some(4));
        b.add_field_access(m, "x", Some("int"), AccessKind::Write, Some(5));
    });
    let read = file.add_field_access(sm, "x", AccessKind::Read, at(3));
    let write = file.add_field_access(sm, "x", AccessKind::Write, at(5));

    run(&pool, &mut file);
    assert_eq!(linked(&file, write), Some("<p.A: void m()>/write-field-x/0"));
    assert_eq!(linked(&file, read), None);
}

#[test]
fn test_casts_and_method_refs() {
    let (pool, mut file, sm) = method_fixture(|b, m| {
        b.add_cast(m, "java.lang.String", Some(3));
        b.add_method_ref(m, Some("java.io.PrintStream"), "println", Some(4));
    });
    let cast = file.add_cast(sm, "String", at(3));
    let method_ref = file.add_method_ref(sm, "println", Some("System.out"), at(4));

    run(&pool, &mut file);
    assert_eq!(linked(&file, cast), Some("<p.A: void m()>/assign-cast/0"));
    assert_eq!(linked(&file, method_ref), Some("<p.A: void m()>/<method-ref-println>/0"));
}

#[test]
fn test_lambda_matches_implementation_with_capture_shift() {
    let mut b = IrPoolBuilder::new();
    let ty = b.add_type("p.A");
    let run_m = b.add_method(ty, "run", "void", &["int"], IrModifiers::empty());
    let impl_id = "<p.A: void lambda$run$0(int,java.lang.String)>";
    b.add_lambda(run_m, impl_id, Some(5));
    let body = b.add_method(
        ty,
        "lambda$run$0",
        "void",
        &["int", "java.lang.String"],
        IrModifiers::PRIVATE | IrModifiers::STATIC | IrModifiers::SYNTHETIC,
    );
    b.add_invocation(body, "p.B", "use", "void", &["java.lang.String"], Some(6));
    let pool = b.finish().pool;

    let mut file = SourceFile::new("p/A.src.json", "p");
    let a = file.add_type("A", None, None);
    let sm = file.add_method(a, "run", Some("void"), false, at(4));
    file.add_param(sm, "n", Some("int"), None);
    let lambda = file.add_lambda(sm, at(5));
    let s = file.add_param(lambda, "s", None, None);
    let call = file.add_invocation(lambda, "use", 1, at(6));

    let outcome = run(&pool, &mut file);
    assert_eq!(linked(&file, lambda), Some(impl_id));
    assert_eq!(linked(&file, s), Some(format!("{impl_id}/@parameter1").as_str()));
    assert_eq!(linked(&file, call), Some(format!("{impl_id}/p.B.use/0").as_str()));
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn test_lambda_without_implementation_is_missing_input() {
    let (pool, mut file, sm) = method_fixture(|b, m| {
        b.add_lambda(m, "<p.A: void lambda$m$0()>", Some(3));
    });
    let lambda = file.add_lambda(sm, at(3));

    let outcome = run(&pool, &mut file);
    assert_eq!(linked(&file, lambda), None);
    assert_eq!(outcome.diagnostics.count(DiagnosticKind::MissingInput), 1);
}

#[test]
fn test_outer_this_reads_captured_field() {
    let mut b = IrPoolBuilder::new();
    b.add_type("p.Outer");
    let inner = b.add_type("p.Outer$Inner");
    b.add_field(inner, "this$0", "p.Outer");
    let peek = b.add_method(inner, "peek", "p.Outer", NO_PARAMS, IrModifiers::empty());
    b.add_field_access(peek, "this$0", Some("p.Outer"), AccessKind::Read, Some(5));
    let pool = b.finish().pool;

    let mut file = SourceFile::new("p/Outer.src.json", "p");
    let outer = file.add_type("Outer", None, None);
    let inner_ty = file.add_type("Inner", Some(outer), None);
    let sm = file.add_method(inner_ty, "peek", Some("Outer"), false, at(4));
    let access = file.add_outer_this_access(sm, "Outer", at(5));

    run(&pool, &mut file);
    assert_eq!(
        linked(&file, access),
        Some("<p.Outer$Inner: p.Outer peek()>/read-field-this$0/0")
    );
}

#[test]
fn test_multi_dimensional_array_matches_reflective_factory() {
    let (pool, mut file, sm) = method_fixture(|b, m| {
        b.add_invocation(
            m,
            "java.lang.reflect.Array",
            "newInstance",
            "java.lang.Object",
            &["java.lang.Class", "int[]"],
            Some(3),
        );
    });
    let alloc = file.add_allocation(sm, "int", 2, at(3));

    let outcome = run(&pool, &mut file);
    assert_eq!(
        linked(&file, alloc),
        Some("<p.A: void m()>/java.lang.reflect.Array.newInstance/0")
    );
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn test_lossy_allocation_pairs_by_line() {
    let build = |b: &mut IrPoolBuilder, m: IrMethodId| {
        b.add_allocation(m, "p.B", Some(3));
        b.add_allocation(m, "p.B", Some(5));
    };

    let (pool, mut file, sm) = method_fixture(build);
    let alloc = file.add_allocation(sm, "B", 0, at(5));
    let outcome = run(&pool, &mut file);
    assert_eq!(linked(&file, alloc), None);
    assert_eq!(outcome.diagnostics.count(DiagnosticKind::StructuralMismatch), 1);

    let (pool, mut file, sm) = method_fixture(build);
    let alloc = file.add_allocation(sm, "B", 0, at(5));
    let options = MatchOptions {
        lossy: true,
        ..MatchOptions::default()
    };
    run_with(&pool, &mut file, options);
    assert_eq!(linked(&file, alloc), Some("<p.A: void m()>/new p.B/1"));
    // The other site is attributed through a placeholder.
    let allocations = &file.method(sm).allocations;
    assert_eq!(allocations.len(), 2);
    assert_eq!(linked(&file, allocations[1]), Some("<p.A: void m()>/new p.B/0"));
}

#[test]
fn test_lossy_allocation_ignores_other_types_on_the_line() {
    // `new B(new C())` on line 5, another `new B()` on line 7 that the IR
    // does not have.
    let (pool, mut file, sm) = method_fixture(|b, m| {
        b.add_allocation(m, "p.B", Some(5));
        b.add_allocation(m, "p.C", Some(5));
    });
    let outer = file.add_allocation(sm, "B", 0, at(5));
    let inner = file.add_allocation(sm, "C", 0, at(5));
    let extra = file.add_allocation(sm, "B", 0, at(7));
    let options = MatchOptions {
        lossy: true,
        ..MatchOptions::default()
    };

    let outcome = run_with(&pool, &mut file, options);
    assert_eq!(linked(&file, inner), Some("<p.A: void m()>/new p.C/0"));
    assert_eq!(linked(&file, outer), Some("<p.A: void m()>/new p.B/0"));
    assert_eq!(linked(&file, extra), None);
    assert_eq!(outcome.diagnostics.count(DiagnosticKind::StructuralMismatch), 1);
    // No IR allocation was left for a placeholder.
    assert_eq!(file.method(sm).allocations.len(), 3);
}

#[test]
fn test_placeholders_for_unconsumed_sites_with_lines() {
    let (pool, mut file, sm) = method_fixture(|b, m| {
        b.add_allocation(m, "p.C", Some(7));
        b.add_invocation(m, "p.C", "close", "void", NO_PARAMS, Some(8));
        b.add_invocation(m, "p.C", "hidden", "void", NO_PARAMS, None);
    });

    run(&pool, &mut file);
    let method = file.method(sm);
    assert_eq!(method.allocations.len(), 1);
    assert_eq!(method.invocations.len(), 1);

    let alloc = file.allocation(method.allocations[0]);
    assert!(!alloc.meta.authoritative);
    assert_eq!(alloc.meta.start_line(), Some(7));
    assert_eq!(alloc.ty, "p.C");
    assert_eq!(linked(&file, method.allocations[0]), Some("<p.A: void m()>/new p.C/0"));

    let call = file.invocation(method.invocations[0]);
    assert_eq!(call.name, "close");
    assert!(!call.meta.authoritative);
}

#[test]
fn test_statements_of_unmatched_methods_stay_unmatched() {
    let (pool, mut file, _) = method_fixture(|b, m| {
        b.add_invocation(m, "p.B", "g", "void", NO_PARAMS, Some(3));
    });
    let a = SrcTypeId(0);
    let other = file.add_method(a, "other", Some("void"), false, at(10));
    let call = file.add_invocation(other, "g", 0, at(11));

    run(&pool, &mut file);
    assert_eq!(linked(&file, call), None);
}
