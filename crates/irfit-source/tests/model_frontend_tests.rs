use super::*;
use crate::elements::{MethodKind, VariableKind};
use crate::frontend::FrontendRegistry;

const SAMPLE: &str = r#"{
    "package": "p",
    "imports": [ { "name": "java.util.*" }, { "name": "java.lang.Math.max", "static": true } ],
    "types": [
        {
            "name": "Outer",
            "pos": [1, 1, 30, 1],
            "fields": [ { "name": "count", "type": "int", "pos": [2, 5, 2, 15] } ],
            "initializers": [
                { "static": true, "pos": [3, 5, 5, 5], "body": [ { "kind": "call", "name": "init", "args": 0 } ] },
                { "pos": [6, 5, 6, 20], "body": [] }
            ],
            "methods": [
                { "name": "Outer", "constructor": true, "pos": [7, 5, 7, 20] },
                {
                    "name": "run",
                    "returnType": "void",
                    "params": [ { "name": "items", "type": "List<String>" } ],
                    "pos": [8, 5, 20, 5],
                    "body": [
                        { "kind": "local", "name": "sb", "type": "StringBuilder" },
                        { "kind": "new", "type": "StringBuilder", "assignTo": "sb", "pos": [9, 9, 9, 30] },
                        { "kind": "call", "name": "append", "args": 1, "base": "sb", "pos": [10, 9, 10, 30] },
                        { "kind": "field", "name": "count", "access": "write", "pos": [11, 9, 11, 20] },
                        { "kind": "cast", "type": "String", "pos": [12, 9, 12, 20] },
                        { "kind": "methodRef", "name": "println", "targetType": "System.out" },
                        { "kind": "string", "value": "\"hi\"" },
                        {
                            "kind": "lambda",
                            "params": [ { "name": "x" } ],
                            "pos": [14, 9, 16, 9],
                            "body": [ { "kind": "call", "name": "accept", "args": 1, "base": "items" } ]
                        }
                    ]
                }
            ],
            "typeUses": [ { "name": "List" } ],
            "types": [
                {
                    "name": "Inner",
                    "methods": [
                        {
                            "name": "peek",
                            "returnType": "int",
                            "body": [ { "kind": "outerThis", "qualifier": "Outer" } ]
                        }
                    ]
                },
                { "pos": [25, 5, 28, 5] }
            ]
        }
    ]
}"#;

fn parse(text: &str) -> Result<SourceFile, FrontendError> {
    ModelFrontend.parse("p/Outer.src.json", text)
}

#[test]
fn test_parse_sample_model() {
    let file = parse(SAMPLE).unwrap();
    assert_eq!(file.package, "p");
    assert_eq!(file.imports.len(), 2);
    assert!(file.imports[0].is_wildcard);
    assert!(file.imports[1].is_static);

    let types: Vec<&str> = file.type_ids().map(|t| file.ty(t).binary_name.as_str()).collect();
    assert_eq!(types, vec!["p.Outer", "p.Outer$Inner", "p.Outer$1"]);

    let outer = file.type_ids().next().unwrap();
    let outer_ty = file.ty(outer);
    assert_eq!(outer_ty.fields.len(), 1);
    assert_eq!(outer_ty.type_usages.len(), 1);

    let names: Vec<&str> = outer_ty.methods.iter().map(|&m| file.method(m).name.as_str()).collect();
    assert_eq!(names, vec!["<clinit>", "<init>-block", "<init>", "run"]);

    let clinit = file.method(outer_ty.class_initializer);
    assert!(!clinit.implicit);
    assert_eq!(clinit.invocations.len(), 1);
}

#[test]
fn test_method_body_in_visit_order() {
    let file = parse(SAMPLE).unwrap();
    let outer = file.type_ids().next().unwrap();
    let run = file
        .ty(outer)
        .methods
        .iter()
        .copied()
        .find(|&m| file.method(m).name == "run")
        .unwrap();
    let method = file.method(run);
    assert_eq!(method.return_type.as_deref(), Some("void"));
    assert_eq!(method.arity(), 1);
    assert_eq!(file.variable(method.params[0]).kind, VariableKind::Parameter(0));

    let alloc = file.allocation(method.allocations[0]);
    let sb = file.find_variable(run, "sb");
    assert!(sb.is_some());
    assert_eq!(alloc.target, sb);

    let call = file.invocation(method.invocations[0]);
    assert_eq!(call.name, "append");
    assert_eq!(call.base, sb);
    assert_eq!(call.meta.start_line(), Some(10));

    assert_eq!(file.field_access(method.field_accesses[0]).kind, AccessKind::Write);
    assert_eq!(method.casts.len(), 1);
    assert_eq!(method.method_refs.len(), 1);
    assert_eq!(method.string_constants.len(), 1);

    let lambda = file.method(method.lambdas[0]);
    assert_eq!(lambda.kind, MethodKind::Lambda);
    assert_eq!(lambda.arity(), 1);
    // Lambda body sees the enclosing method's parameter.
    let inner_call = file.invocation(lambda.invocations[0]);
    assert_eq!(inner_call.base, Some(method.params[0]));
}

#[test]
fn test_outer_this_access() {
    let file = parse(SAMPLE).unwrap();
    let inner = file.type_ids().nth(1).unwrap();
    let peek = file.ty(inner).methods[1];
    let access = file.field_access(file.method(peek).field_accesses[0]);
    assert_eq!(access.outer_this.as_deref(), Some("Outer"));
    assert_eq!(access.kind, AccessKind::Read);
}

#[test]
fn test_malformed_documents_are_syntax_errors() {
    assert!(matches!(parse("{"), Err(FrontendError::Syntax { .. })));
    assert!(matches!(
        parse(r#"{ "package": "p", "bogus": 1 }"#),
        Err(FrontendError::Syntax { .. })
    ));
    let unnamed = r#"{ "types": [ { "fields": [] } ] }"#;
    let err = parse(unnamed).unwrap_err();
    assert!(err.to_string().contains("top-level type without a name"));
}

#[test]
fn test_registry_selects_by_suffix() {
    let registry = FrontendRegistry::new();
    assert!(registry.supports("A.src.json"));
    assert!(registry.supports("A.SRC.JSON"));
    assert!(!registry.supports("A.java"));
    assert_eq!(registry.select("x/A.src.json").map(|f| f.name()), Some("model"));
}

#[test]
fn test_registry_reads_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("A.src.json");
    std::fs::write(&path, SAMPLE).unwrap();
    let registry = FrontendRegistry::new();
    let file = registry.parse_file(&path, "A.src.json").unwrap();
    assert_eq!(file.path, "A.src.json");

    let other = dir.path().join("A.java");
    std::fs::write(&other, "class A {}").unwrap();
    assert!(matches!(
        registry.parse_file(&other, "A.java"),
        Err(FrontendError::Unsupported { .. })
    ));
    assert!(matches!(
        registry.parse_file(&dir.path().join("Missing.src.json"), "Missing.src.json"),
        Err(FrontendError::Io { .. })
    ));
}
