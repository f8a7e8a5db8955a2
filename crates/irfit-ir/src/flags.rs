//! Access and property flags of IR types and members.

use bitflags::bitflags;

bitflags! {
    /// Modifiers recorded for IR types, fields and methods.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct IrModifiers: u32 {
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const ABSTRACT = 1 << 5;
        const SYNTHETIC = 1 << 6;
        const BRIDGE = 1 << 7;
        /// The method takes a trailing variable-arity array parameter.
        const VARARGS = 1 << 8;
        const INTERFACE = 1 << 9;
        const ENUM = 1 << 10;
    }
}

impl IrModifiers {
    /// Parse a lower-case modifier keyword as written in IR model files.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let flag = match keyword {
            "public" => Self::PUBLIC,
            "private" => Self::PRIVATE,
            "protected" => Self::PROTECTED,
            "static" => Self::STATIC,
            "final" => Self::FINAL,
            "abstract" => Self::ABSTRACT,
            "synthetic" => Self::SYNTHETIC,
            "bridge" => Self::BRIDGE,
            "varargs" => Self::VARARGS,
            "interface" => Self::INTERFACE,
            "enum" => Self::ENUM,
            _ => return None,
        };
        Some(flag)
    }

    #[inline]
    pub fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    #[inline]
    pub fn is_varargs(self) -> bool {
        self.contains(Self::VARARGS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_keywords() {
        assert_eq!(IrModifiers::from_keyword("varargs"), Some(IrModifiers::VARARGS));
        assert_eq!(IrModifiers::from_keyword("native"), None);
        let mods = IrModifiers::STATIC | IrModifiers::VARARGS;
        assert!(mods.is_static());
        assert!(mods.is_varargs());
        assert!(!IrModifiers::PUBLIC.is_varargs());
    }
}
