//! Low-level names of compiler-generated methods and fields.

/// Low-level name of constructors.
pub const CONSTRUCTOR: &str = "<init>";

/// Low-level name of class (static) initializers.
pub const CLASS_INITIALIZER: &str = "<clinit>";

/// Pseudo-method name for instance initializer blocks and instance field
/// initializers. Compiled code inlines these into every constructor, so the
/// name never appears in the IR.
pub const INSTANCE_INITIALIZER: &str = "<init>-block";

/// Prefix of the synthesized field holding the enclosing instance of an
/// inner class (`this$0`, `this$1`, ...).
pub const OUTER_THIS_FIELD_PREFIX: &str = "this$";

/// Naming id of the reflective array factory multi-dimensional array
/// creation may compile to.
pub const REFLECTIVE_ARRAY_FACTORY: &str = "java.lang.reflect.Array.newInstance";

/// Last segment of receiver variable ids (`<method-id>/@this`).
pub const RECEIVER_VARIABLE: &str = "@this";

/// Prefix of the last segment of parameter variable ids
/// (`<method-id>/@parameter0`, ...).
pub const PARAMETER_VARIABLE_PREFIX: &str = "@parameter";

/// The method slot an IR variable id names, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodSlot {
    Receiver,
    /// IR parameter index, captured values included.
    Parameter(usize),
}

/// Classify a variable id by its last `/` segment.
pub fn method_slot(variable_id: &str) -> Option<MethodSlot> {
    let name = variable_id.rsplit('/').next()?;
    if name == RECEIVER_VARIABLE {
        return Some(MethodSlot::Receiver);
    }
    name.strip_prefix(PARAMETER_VARIABLE_PREFIX)?
        .parse()
        .ok()
        .map(MethodSlot::Parameter)
}

/// True for class/instance initializer names.
pub fn is_initializer_name(name: &str) -> bool {
    name == CLASS_INITIALIZER || name == INSTANCE_INITIALIZER
}

/// True for names that may legitimately have no same-named IR method before
/// matching: constructors and initializers.
pub fn is_constructor_or_initializer(name: &str) -> bool {
    name == CONSTRUCTOR || is_initializer_name(name)
}

/// True for the synthesized outer-instance field of inner classes.
pub fn is_outer_this_field(name: &str) -> bool {
    name.strip_prefix(OUTER_THIS_FIELD_PREFIX)
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outer_this_field_detection() {
        assert!(is_outer_this_field("this$0"));
        assert!(is_outer_this_field("this$12"));
        assert!(!is_outer_this_field("this$"));
        assert!(!is_outer_this_field("this$x"));
        assert!(!is_outer_this_field("value"));
    }

    #[test]
    fn test_method_slots() {
        assert_eq!(method_slot("<p.A: void m(int)>/@this"), Some(MethodSlot::Receiver));
        assert_eq!(
            method_slot("<p.A: void m(int)>/@parameter0"),
            Some(MethodSlot::Parameter(0))
        );
        assert_eq!(method_slot("<p.A: void m(int)>/@parameterX"), None);
        assert_eq!(method_slot("<p.A: void m(int)>/b#_3"), None);
    }

    #[test]
    fn test_initializer_names() {
        assert!(is_initializer_name("<clinit>"));
        assert!(is_initializer_name("<init>-block"));
        assert!(!is_initializer_name("<init>"));
        assert!(is_constructor_or_initializer("<init>"));
    }
}
