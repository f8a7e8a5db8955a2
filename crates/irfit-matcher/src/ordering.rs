//! Ordering consistency of positional pairings.
//!
//! Positional pairing assumes the IR appearance order of a group equals the
//! source visit order. Where both sides carry line information the
//! assumption can be checked: the relative order of any two pairs must not
//! be inverted between source start lines and IR line hints.

use irfit_ir::{IrElementRef, IrPool};
use irfit_source::{SourceElementRef, SourceFile};

/// First pair of indices whose source and IR line orders contradict.
pub fn first_inversion(
    file: &SourceFile,
    pool: &IrPool,
    sources: &[SourceElementRef],
    irs: &[IrElementRef],
) -> Option<(usize, usize)> {
    let lines: Vec<(usize, u32, u32)> = sources
        .iter()
        .zip(irs)
        .enumerate()
        .filter_map(|(i, (&src, &ir))| {
            let src_line = file.meta(src).start_line()?;
            let ir_line = pool.element_line(ir)?;
            Some((i, src_line, ir_line))
        })
        .collect();

    for (a, &(i, src_a, ir_a)) in lines.iter().enumerate() {
        for &(j, src_b, ir_b) in &lines[a + 1..] {
            if (src_a < src_b && ir_a > ir_b) || (src_a > src_b && ir_a < ir_b) {
                return Some((i, j));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use irfit_common::Position;
    use irfit_ir::{IrModifiers, IrPoolBuilder};

    fn fixture(ir_lines: &[Option<u32>], src_lines: &[Option<u32>]) -> (IrPool, SourceFile, Vec<IrElementRef>, Vec<SourceElementRef>) {
        let mut b = IrPoolBuilder::new();
        let ty = b.add_type("p.A");
        let m = b.add_method(ty, "m", "void", &[] as &[&str], IrModifiers::empty());
        let irs: Vec<IrElementRef> = ir_lines
            .iter()
            .map(|&line| b.add_invocation(m, "p.A", "f", "void", &[] as &[&str], line).into())
            .collect();
        let pool = b.finish().pool;

        let mut file = SourceFile::new("p/A.src.json", "p");
        let a = file.add_type("A", None, None);
        let sm = file.add_method(a, "m", Some("void"), false, None);
        let srcs: Vec<SourceElementRef> = src_lines
            .iter()
            .map(|&line| file.add_invocation(sm, "f", 0, line.map(Position::line)).into())
            .collect();
        (pool, file, irs, srcs)
    }

    #[test]
    fn test_consistent_order() {
        let (pool, file, irs, srcs) = fixture(&[Some(3), Some(4), Some(4)], &[Some(3), Some(4), Some(4)]);
        assert_eq!(first_inversion(&file, &pool, &srcs, &irs), None);
    }

    #[test]
    fn test_inverted_order_detected() {
        let (pool, file, irs, srcs) = fixture(&[Some(9), Some(3)], &[Some(3), Some(9)]);
        assert_eq!(first_inversion(&file, &pool, &srcs, &irs), Some((0, 1)));
    }

    #[test]
    fn test_unknown_lines_are_not_checked() {
        let (pool, file, irs, srcs) = fixture(&[None, Some(3)], &[Some(9), Some(3)]);
        assert_eq!(first_inversion(&file, &pool, &srcs, &irs), None);
    }
}
