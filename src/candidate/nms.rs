//! Non-maximum suppression for corner candidates.

use crate::candidate::topk::{sort_corners_desc, Corner};
use std::collections::HashMap;

/// Applies 2D non-maximum suppression using Chebyshev distance.
///
/// Corners are sorted by descending response and kept if they are farther
/// than `radius` in Chebyshev distance from all previously kept corners.
/// Kept corners are bucketed into cells of side `radius + 1`, so only the
/// 3x3 neighbouring cells need to be inspected per candidate.
pub(crate) fn nms_2d(corners: &mut [Corner], radius: usize) -> Vec<Corner> {
    sort_corners_desc(corners);
    if radius == 0 {
        return corners.to_owned();
    }

    let cell = radius + 1;
    let mut buckets: HashMap<(usize, usize), Vec<(usize, usize)>> = HashMap::new();
    let mut kept: Vec<Corner> = Vec::new();
    'outer: for corner in corners.iter().copied() {
        let cx = corner.x / cell;
        let cy = corner.y / cell;
        for ny in cy.saturating_sub(1)..=cy + 1 {
            for nx in cx.saturating_sub(1)..=cx + 1 {
                let Some(bucket) = buckets.get(&(nx, ny)) else {
                    continue;
                };
                for &(kx, ky) in bucket {
                    if corner.x.abs_diff(kx).max(corner.y.abs_diff(ky)) <= radius {
                        continue 'outer;
                    }
                }
            }
        }
        buckets
            .entry((cx, cy))
            .or_default()
            .push((corner.x, corner.y));
        kept.push(corner);
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::nms_2d;
    use crate::candidate::Corner;

    #[test]
    fn suppresses_weaker_neighbors() {
        let mut corners = vec![
            Corner { x: 10, y: 10, response: 5.0 },
            Corner { x: 11, y: 10, response: 7.0 },
            Corner { x: 30, y: 30, response: 1.0 },
            Corner { x: 12, y: 12, response: 2.0 },
        ];
        let kept = nms_2d(&mut corners, 1);
        let coords: Vec<_> = kept.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(coords, vec![(11, 10), (12, 12), (30, 30)]);
    }

    #[test]
    fn suppression_reaches_across_cell_borders() {
        let mut corners = vec![
            Corner { x: 5, y: 5, response: 3.0 },
            Corner { x: 8, y: 7, response: 2.0 },
            Corner { x: 9, y: 9, response: 1.0 },
        ];
        let kept = nms_2d(&mut corners, 3);
        let coords: Vec<_> = kept.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(coords, vec![(5, 5), (9, 9)]);
    }

    #[test]
    fn zero_radius_only_sorts() {
        let mut corners = vec![
            Corner { x: 0, y: 0, response: 1.0 },
            Corner { x: 1, y: 0, response: 2.0 },
        ];
        let kept = nms_2d(&mut corners, 0);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].x, 1);
    }
}
