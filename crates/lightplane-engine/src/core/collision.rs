//! Overlap detection between two typed entity sets.
//!
//! The broad phase is a sweep and prune along the x axis: both sets are
//! ordered by their left edge and swept together while an "active" list keeps
//! the rectangles whose x-interval still reaches the sweep position. Only
//! rectangles whose x-intervals intersect are tested on y.
//!
//! # Example
//!
//! ```
//! use lightplane_engine::{Rect, collision};
//!
//! let bullets = [Rect::new(0.0, 0.0, 2.0, 2.0), Rect::new(50.0, 50.0, 2.0, 2.0)];
//! let enemies = [Rect::new(51.0, 49.0, 10.0, 10.0)];
//! assert_eq!(collision::overlapping_pairs(&bullets, &enemies), vec![(1, 0)]);
//! ```

use crate::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    A,
    B,
}

/// Returns every `(index_in_a, index_in_b)` pair whose rectangles overlap.
///
/// The result is sorted and contains no duplicates, so it is identical to the
/// output of a brute-force double loop.
#[must_use]
pub fn overlapping_pairs(a: &[Rect], b: &[Rect]) -> Vec<(usize, usize)> {
    let mut pairs = vec![];
    if a.is_empty() || b.is_empty() {
        return pairs;
    }

    let mut order = Vec::with_capacity(a.len() + b.len());
    order.extend((0..a.len()).map(|i| (Side::A, i, a[i].left())));
    order.extend((0..b.len()).map(|i| (Side::B, i, b[i].left())));
    order.sort_by(|x, y| x.2.total_cmp(&y.2));

    let mut active_a: Vec<usize> = vec![];
    let mut active_b: Vec<usize> = vec![];
    for (side, index, left) in order {
        // Drop rectangles whose right edge no longer reaches the sweep line.
        active_a.retain(|&i| a[i].right() > left);
        active_b.retain(|&j| b[j].right() > left);
        match side {
            Side::A => {
                let rect = &a[index];
                pairs.extend(
                    active_b
                        .iter()
                        .filter(|&&j| rect.overlaps(&b[j]))
                        .map(|&j| (index, j)),
                );
                active_a.push(index);
            }
            Side::B => {
                let rect = &b[index];
                pairs.extend(
                    active_a
                        .iter()
                        .filter(|&&i| a[i].overlaps(rect))
                        .map(|&i| (i, index)),
                );
                active_b.push(index);
            }
        }
    }

    pairs.sort_unstable();
    pairs
}
