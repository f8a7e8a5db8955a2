//! Type-name normalization shared by the source and IR models.
//!
//! Source types are spelled the way a programmer wrote them (`List<String>`,
//! `Map.Entry`, `String?`, `Object...`) while IR types are erased binary
//! names (`java.util.List`, `java.util.Map$Entry`, `java.lang.Object[]`).
//! The helpers here bring both spellings to comparable forms.

/// Primitive type names of the JVM family of languages.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// Boxed representations that may be referenced by compiled code even when
/// the source never names them (autoboxing).
pub const BOXED_REPRESENTATIONS: &[&str] = &[
    "java.lang.Boolean",
    "java.lang.Byte",
    "java.lang.Character",
    "java.lang.Double",
    "java.lang.Float",
    "java.lang.Integer",
    "java.lang.Long",
    "java.lang.Short",
];

/// Remove the parts of a type that do not matter for matching: generic
/// argument lists (at any nesting depth) and a trailing nullability marker.
/// A trailing varargs ellipsis is rewritten to an array suffix.
///
/// `Map<K, List<V>>[]` becomes `Map[]`, `String?` becomes `String` and
/// `Object...` becomes `Object[]`.
pub fn simplify_type(ty: &str) -> String {
    let mut out = String::with_capacity(ty.len());
    let mut depth = 0usize;
    for ch in ty.chars() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 && !ch.is_whitespace() => out.push(ch),
            _ => {}
        }
    }
    if let Some(stripped) = out.strip_suffix("...") {
        out = format!("{stripped}[]");
    }
    while out.ends_with('?') {
        out.pop();
    }
    out
}

/// Rewrite nested-type separators to binary-name form: once a segment that
/// starts with an upper-case letter has been seen, the following `.`
/// separators denote nesting and become `$`.
///
/// `java.util.Map.Entry` becomes `java.util.Map$Entry`.
pub fn dots_to_dollars(name: &str) -> String {
    if !name.contains('.') {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len());
    let mut seen_type_segment = false;
    for (i, segment) in name.split('.').enumerate() {
        if i > 0 {
            out.push(if seen_type_segment { '$' } else { '.' });
        }
        out.push_str(segment);
        if segment.chars().next().is_some_and(char::is_uppercase) {
            seen_type_segment = true;
        }
    }
    out
}

/// The part of a qualified type after the last package separator.
pub fn simple_type(ty: &str) -> &str {
    match ty.rfind('.') {
        Some(idx) => &ty[idx + 1..],
        None => ty,
    }
}

/// Innermost simple name: the part after the last `.` or `$`.
fn innermost_name(ty: &str) -> &str {
    let simple = simple_type(ty);
    match simple.rfind('$') {
        Some(idx) if idx + 1 < simple.len() => &simple[idx + 1..],
        _ => simple,
    }
}

/// Simplify a source type (`a.b.C<D>` becomes `C`, `Outer.Inner` becomes `Inner`).
pub fn simple_source_type(src_type: &str) -> String {
    innermost_name(&simplify_type(src_type)).to_string()
}

/// Simplify an IR type (`a.B$C` becomes `C`).
pub fn simple_ir_type(ir_type: &str) -> &str {
    innermost_name(ir_type)
}

/// Compare a source type against an IR type by their innermost simple names.
pub fn simple_types_equal(src_type: &str, ir_type: &str) -> bool {
    simple_source_type(src_type) == simple_ir_type(ir_type)
}

/// True for primitive types, including arrays of primitives.
pub fn is_primitive_type(ty: &str) -> bool {
    let base = ty.trim_end_matches("[]");
    PRIMITIVE_TYPES.contains(&base)
}

/// True for the boxed types autoboxing may introduce.
pub fn is_boxed_representation(ty: &str) -> bool {
    BOXED_REPRESENTATIONS.contains(&ty)
}

/// Combine a partial source type and an erased IR type into a more
/// informative spelling: when the IR type ends with the source simple name,
/// the IR prefix is glued onto the source spelling (keeping its generics).
/// Otherwise the IR type is returned unchanged.
pub fn synthesize_type(src_type: &str, ir_type: &str) -> String {
    let src_simple = simple_type(&simplify_type(src_type)).to_string();
    match ir_type.strip_suffix(src_simple.as_str()) {
        Some(prefix) if !src_simple.is_empty() => format!("{prefix}{src_type}"),
        _ => ir_type.to_string(),
    }
}

/// Strip matching single or double quotes around a literal.
pub fn strip_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplify_type_strips_generics_and_nullability() {
        assert_eq!(simplify_type("List<String>"), "List");
        assert_eq!(simplify_type("Map<K, List<V>>[]"), "Map[]");
        assert_eq!(simplify_type("String?"), "String");
        assert_eq!(simplify_type("Object..."), "Object[]");
        assert_eq!(simplify_type("int"), "int");
    }

    #[test]
    fn test_dots_to_dollars_nested_types() {
        assert_eq!(dots_to_dollars("java.util.Map.Entry"), "java.util.Map$Entry");
        assert_eq!(dots_to_dollars("p.Outer.Inner.Deep"), "p.Outer$Inner$Deep");
        assert_eq!(dots_to_dollars("java.lang.String"), "java.lang.String");
        assert_eq!(dots_to_dollars("Outer.Inner"), "Outer$Inner");
        assert_eq!(dots_to_dollars("int"), "int");
    }

    #[test]
    fn test_simple_type_comparison() {
        assert!(simple_types_equal("List<String>", "java.util.List"));
        assert!(simple_types_equal("Map.Entry", "java.util.Map$Entry"));
        assert!(simple_types_equal("int", "int"));
        assert!(!simple_types_equal("Set", "java.util.List"));
    }

    #[test]
    fn test_primitive_detection() {
        assert!(is_primitive_type("int"));
        assert!(is_primitive_type("byte[][]"));
        assert!(!is_primitive_type("Integer"));
    }

    #[test]
    fn test_synthesize_type_keeps_source_generics() {
        assert_eq!(
            synthesize_type("List<String>", "java.util.List"),
            "java.util.List<String>"
        );
        assert_eq!(synthesize_type("Foo", "a.Bar"), "a.Bar");
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"abc\""), "abc");
        assert_eq!(strip_quotes("'x'"), "x");
        assert_eq!(strip_quotes("plain"), "plain");
        assert_eq!(strip_quotes("\""), "\"");
    }
}
