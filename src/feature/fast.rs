//! FAST-9 segment test corner detection.
//!
//! Each pixel is compared with the 16 pixels of a radius-3 Bresenham circle.
//! It is a corner when at least 9 contiguous circle pixels are all brighter
//! than `center + threshold` or all darker than `center - threshold`. The
//! contiguity test wraps around the circle.

use crate::candidate::nms::nms_2d;
use crate::candidate::Corner;
use crate::image::ImageView;

/// Bresenham circle of radius 3, clockwise from 12 o'clock.
const CIRCLE_OFFSETS: [(isize, isize); 16] = [
    (0, -3),
    (1, -3),
    (2, -2),
    (3, -1),
    (3, 0),
    (3, 1),
    (2, 2),
    (1, 3),
    (0, 3),
    (-1, 3),
    (-2, 2),
    (-3, 1),
    (-3, 0),
    (-3, -1),
    (-2, -2),
    (-1, -3),
];

const ARC_LENGTH: usize = 9;
const CIRCLE_RADIUS: usize = 3;

/// Returns true when the circular 16-bit mask has `ARC_LENGTH` contiguous bits.
fn has_arc(mask: u16) -> bool {
    if (mask.count_ones() as usize) < ARC_LENGTH {
        return false;
    }
    let doubled = (mask as u32) | ((mask as u32) << 16);
    let mut acc = doubled;
    for _ in 1..ARC_LENGTH {
        acc &= acc >> 1;
    }
    acc != 0
}

/// Detects FAST-9 corners at least `border` pixels away from every edge.
///
/// The response is the summed excess `|p - center| - threshold` over the
/// circle pixels of the winning polarity. A 3x3 non-maximum suppression on
/// that response is applied before returning.
pub(crate) fn detect_fast9(image: ImageView<'_, u8>, threshold: u8, border: usize) -> Vec<Corner> {
    let (width, height) = image.dimensions();
    let border = border.max(CIRCLE_RADIUS);
    if width <= 2 * border || height <= 2 * border {
        return Vec::new();
    }

    let thresh = threshold as i16;
    let mut corners = Vec::new();
    for y in border..height - border {
        let center_row = image.row(y).expect("row within bounds");
        for x in border..width - border {
            let center = center_row[x] as i16;

            let mut bright_mask = 0u16;
            let mut dark_mask = 0u16;
            let mut diffs = [0i16; 16];
            for (i, &(dx, dy)) in CIRCLE_OFFSETS.iter().enumerate() {
                let px = (x as isize + dx) as usize;
                let py = (y as isize + dy) as usize;
                let value = *image.get(px, py).expect("circle within bounds") as i16;
                let diff = value - center;
                diffs[i] = diff;
                if diff > thresh {
                    bright_mask |= 1 << i;
                } else if diff < -thresh {
                    dark_mask |= 1 << i;
                }
            }

            let mut response = -1.0f32;
            for mask in [bright_mask, dark_mask] {
                if !has_arc(mask) {
                    continue;
                }
                let score: i32 = (0..16)
                    .filter(|i| mask & (1 << i) != 0)
                    .map(|i| (diffs[i].abs() - thresh) as i32)
                    .sum();
                response = response.max(score as f32);
            }
            if response >= 0.0 {
                corners.push(Corner { x, y, response });
            }
        }
    }

    nms_2d(&mut corners, 1)
}
