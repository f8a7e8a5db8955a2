//! Import declarations.

use irfit_common::Position;
use irfit_common::type_names::simple_type;

/// One import declaration. Wildcard imports store the imported package
/// (or type) without the trailing `.*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub name: String,
    pub is_static: bool,
    pub is_wildcard: bool,
    pub pos: Option<Position>,
}

impl Import {
    /// Parse an import as written (`java.util.List`, `java.util.*`).
    pub fn parse(text: &str, is_static: bool, pos: Option<Position>) -> Self {
        let text = text.trim();
        match text.strip_suffix(".*") {
            Some(package) => Import {
                name: package.to_string(),
                is_static,
                is_wildcard: true,
                pos,
            },
            None => Import {
                name: text.to_string(),
                is_static,
                is_wildcard: false,
                pos,
            },
        }
    }

    /// Last segment of a single-type import.
    pub fn simple_name(&self) -> &str {
        simple_type(&self.name)
    }

    /// A plain single-type import (neither static nor wildcard).
    pub fn is_single_type(&self) -> bool {
        !self.is_static && !self.is_wildcard
    }
}
