use crate::core::shape::Shape;

/// Conservative pair pruner over cached world bounds.
///
/// Sound by construction: an oriented box always lies inside its bounds, so
/// overlapping shapes always have overlapping bounds. Distant pairs are
/// rejected in O(1) before the exact test runs.
pub struct BroadPhase;

impl BroadPhase {
    /// Noclip shapes never pass.
    pub fn test(a: &Shape, b: &Shape) -> bool {
        if a.noclip || b.noclip {
            return false;
        }
        a.overlaps_broad(b)
    }

    /// Every `(i, j)` with `i < j` whose bounds overlap, in sweep order.
    pub fn potential_pairs(shapes: &[Shape]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for i in 0..shapes.len() {
            for j in (i + 1)..shapes.len() {
                if Self::test(&shapes[i], &shapes[j]) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}
