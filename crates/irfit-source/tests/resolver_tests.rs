use super::*;
use crate::imports::Import;

fn sample_file() -> SourceFile {
    let mut file = SourceFile::new("p/A.java", "p");
    file.add_import(Import::parse("java.util.List", false, None));
    file.add_import(Import::parse("java.util.Map", false, None));
    file.add_import(Import::parse("java.io.*", false, None));
    file.add_import(Import::parse("java.lang.Math.max", true, None));
    let a = file.add_type("A", None, None);
    file.add_type("Inner", Some(a), None);
    file.add_anonymous_type(a, None);
    file
}

fn resolved(file: &SourceFile, ty: Option<&str>) -> Vec<String> {
    FuzzyTypeResolver::new(file).resolve(ty).into_iter().collect()
}

#[test]
fn test_absent_type_is_void() {
    let file = sample_file();
    assert_eq!(resolved(&file, None), vec!["void"]);
}

#[test]
fn test_primitives_resolve_to_themselves() {
    let file = sample_file();
    assert_eq!(resolved(&file, Some("int")), vec!["int"]);
    assert_eq!(resolved(&file, Some("byte[][]")), vec!["byte[][]"]);
    assert_eq!(resolved(&file, Some("long...")), vec!["long[]"]);
}

#[test]
fn test_local_declaration_wins() {
    let file = sample_file();
    assert_eq!(resolved(&file, Some("Inner")), vec!["p.A$Inner"]);
    assert_eq!(resolved(&file, Some("A[]")), vec!["p.A[]"]);
    // Anonymous types are never resolved by name.
    assert_ne!(resolved(&file, Some("1")), vec!["p.A$1"]);
}

#[test]
fn test_explicit_import_and_nested_access() {
    let file = sample_file();
    assert_eq!(resolved(&file, Some("List<String>")), vec!["java.util.List"]);
    assert_eq!(resolved(&file, Some("Map.Entry<K, V>")), vec!["java.util.Map$Entry"]);
    assert_eq!(resolved(&file, Some("Map$Entry")), vec!["java.util.Map$Entry"]);
}

#[test]
fn test_fuzzy_candidates_in_priority_order() {
    let file = sample_file();
    assert_eq!(
        resolved(&file, Some("String?")),
        vec!["String", "p.String", "java.io.String"]
    );
    // Static imports do not contribute packages.
    assert!(!resolved(&file, Some("Foo")).iter().any(|c| c.starts_with("java.lang.Math")));
}

#[test]
fn test_fuzzy_candidates_without_package() {
    let file = SourceFile::new("A.java", "");
    assert_eq!(resolved(&file, Some("Outer.Inner")), vec!["Outer$Inner"]);
}

#[test]
fn test_method_candidates_cartesian_product() {
    let file = sample_file();
    let resolver = FuzzyTypeResolver::new(&file);
    let candidates = resolver.method_candidates("p.A", Some("void"), "m", &[Some("int"), Some("Foo")]);
    let ids: Vec<&str> = candidates.ids.iter().map(String::as_str).collect();
    assert_eq!(
        ids,
        vec!["<p.A: void m(int,Foo)>", "<p.A: void m(int,p.Foo)>", "<p.A: void m(int,java.io.Foo)>"]
    );
    assert!(!candidates.truncated);

    let ctor = resolver.method_candidates("p.A", None, "<init>", &[]);
    assert_eq!(ctor.ids.len(), 1);
    assert!(ctor.ids.contains("<p.A: void <init>()>"));
}

#[test]
fn test_method_candidates_are_capped() {
    let mut file = SourceFile::new("p/A.java", "p");
    for i in 0..10 {
        file.add_import(Import::parse(&format!("pkg{i}.*"), false, None));
    }
    let resolver = FuzzyTypeResolver::new(&file);
    // 12 candidates per parameter, 5 parameters: far beyond the cap.
    let params = [Some("X"); 5];
    let candidates = resolver.method_candidates("p.A", Some("void"), "m", &params);
    assert!(candidates.truncated);
    assert!(candidates.ids.len() <= MAX_SIGNATURE_CANDIDATES);
}
