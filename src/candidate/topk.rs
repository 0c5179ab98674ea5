//! Best-N retention for corner candidates.

use std::cmp::Ordering;

/// Corner candidate in the pixel grid of one pyramid level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corner {
    /// X coordinate (column) of the corner.
    pub x: usize,
    /// Y coordinate (row) of the corner.
    pub y: usize,
    /// Ranking response; higher is stronger.
    pub response: f32,
}

fn corner_cmp_desc(a: &Corner, b: &Corner) -> Ordering {
    b.response
        .total_cmp(&a.response)
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
}

/// Sorts corners by descending response with deterministic tie-breaking.
pub(crate) fn sort_corners_desc(corners: &mut [Corner]) {
    corners.sort_by(corner_cmp_desc);
}

/// Keeps the `k` strongest corners, sorted by descending response.
pub(crate) fn retain_best(corners: &mut Vec<Corner>, k: usize) {
    sort_corners_desc(corners);
    corners.truncate(k);
}

#[cfg(test)]
mod tests {
    use super::{retain_best, Corner};

    fn corner(x: usize, y: usize, response: f32) -> Corner {
        Corner { x, y, response }
    }

    #[test]
    fn retain_best_keeps_strongest_with_stable_ties() {
        let mut corners = vec![
            corner(5, 5, 1.0),
            corner(2, 9, 3.0),
            corner(7, 1, 3.0),
            corner(0, 0, 0.5),
        ];
        retain_best(&mut corners, 3);
        assert_eq!(
            corners,
            vec![corner(7, 1, 3.0), corner(2, 9, 3.0), corner(5, 5, 1.0)]
        );
    }

    #[test]
    fn retain_best_with_zero_budget_is_empty() {
        let mut corners = vec![corner(1, 1, 1.0)];
        retain_best(&mut corners, 0);
        assert!(corners.is_empty());
    }
}
