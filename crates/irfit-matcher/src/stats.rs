//! Match statistics per element kind.

use irfit_common::ElementKind;
use irfit_source::{MethodKind, SourceElementRef, SourceFile};
use std::fmt::Write as _;

/// Kinds that take part in statistics and in the unmatched count.
pub const COUNTED_KINDS: [ElementKind; 9] = [
    ElementKind::Type,
    ElementKind::Field,
    ElementKind::Method,
    ElementKind::Lambda,
    ElementKind::Invocation,
    ElementKind::Allocation,
    ElementKind::FieldAccess,
    ElementKind::MethodRef,
    ElementKind::Cast,
];

/// True for source elements whose failure to match is worth counting:
/// authoritative elements, except the implicit class initializer and
/// instance initializer blocks, which have no IR method of their own.
pub fn counts_toward_unmatched(file: &SourceFile, element: SourceElementRef) -> bool {
    if !file.meta(element).authoritative {
        return false;
    }
    match element {
        SourceElementRef::Method(m) => {
            let method = file.method(m);
            !method.implicit && method.kind != MethodKind::InstanceInitializer
        }
        _ => true,
    }
}

/// All vs matched counts of one kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindStats {
    pub all: usize,
    pub matched: usize,
}

impl KindStats {
    pub fn percentage(&self) -> f64 {
        if self.all == 0 {
            100.0
        } else {
            self.matched as f64 * 100.0 / self.all as f64
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchStats {
    per_kind: Vec<(ElementKind, KindStats)>,
}

impl MatchStats {
    pub fn collect(files: &[SourceFile]) -> Self {
        let per_kind = COUNTED_KINDS
            .iter()
            .map(|&kind| {
                let mut stats = KindStats::default();
                for file in files {
                    for element in file.elements(kind) {
                        if counts_toward_unmatched(file, element) {
                            stats.all += 1;
                            if file.meta(element).is_matched() {
                                stats.matched += 1;
                            }
                        }
                    }
                }
                (kind, stats)
            })
            .collect();
        MatchStats { per_kind }
    }

    pub fn get(&self, kind: ElementKind) -> KindStats {
        self.per_kind
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, stats)| *stats)
            .unwrap_or_default()
    }

    /// Counted elements that stayed unmatched.
    pub fn unmatched(&self) -> usize {
        self.per_kind.iter().map(|(_, s)| s.all - s.matched).sum()
    }

    /// One line per kind: `kind: matched/all (pct%)`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (kind, stats) in &self.per_kind {
            let _ = writeln!(
                out,
                "{:<14} {:>6}/{:<6} ({:.1}%)",
                format!("{kind}:"),
                stats.matched,
                stats.all,
                stats.percentage()
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implicit_initializers_are_not_counted() {
        let mut file = SourceFile::new("p/A.src.json", "p");
        let a = file.add_type("A", None, None);
        file.add_instance_initializer(a, None);
        let m = file.add_method(a, "m", Some("void"), false, None);
        let clinit = file.ty(a).class_initializer;

        assert!(!counts_toward_unmatched(&file, clinit.into()));
        assert!(counts_toward_unmatched(&file, m.into()));
        let stats = MatchStats::collect(std::slice::from_ref(&file));
        assert_eq!(stats.get(ElementKind::Method), KindStats { all: 1, matched: 0 });
        assert_eq!(stats.get(ElementKind::Type), KindStats { all: 1, matched: 0 });
        assert_eq!(stats.unmatched(), 2);
    }

    #[test]
    fn test_placeholders_are_not_counted() {
        let mut file = SourceFile::new("p/A.src.json", "p");
        let a = file.add_type("A", None, None);
        let m = file.add_method(a, "m", Some("void"), false, None);
        let placeholder = file.add_placeholder_allocation(m, "p.B", 4);
        assert!(!counts_toward_unmatched(&file, placeholder.into()));
        assert_eq!(MatchStats::collect(&[file]).get(ElementKind::Allocation).all, 0);
    }

    #[test]
    fn test_render_and_percentage() {
        let stats = KindStats { all: 4, matched: 3 };
        assert!((stats.percentage() - 75.0).abs() < f64::EPSILON);
        assert!((KindStats::default().percentage() - 100.0).abs() < f64::EPSILON);
        let file = SourceFile::new("empty.src.json", "");
        let text = MatchStats::collect(&[file]).render();
        assert!(text.starts_with("type:"));
        assert_eq!(text.lines().count(), COUNTED_KINDS.len());
    }
}
