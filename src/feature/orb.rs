//! Keypoint orientation and steered binary descriptors.

use crate::feature::pattern::BIT_PATTERN;
use crate::feature::Descriptor;
use crate::image::ImageView;
use crate::util::math::sin_cos_deg;

/// Orientation of the intensity centroid inside a disc of `radius` pixels.
///
/// Returns the angle of the vector from `(x, y)` to the centroid in degrees,
/// in `[0, 360)`. The disc is `u^2 + v^2 <= radius^2`; the caller guarantees it
/// lies inside the image.
pub(crate) fn intensity_centroid_angle(
    image: ImageView<'_, u8>,
    x: usize,
    y: usize,
    radius: usize,
) -> f32 {
    let r = radius as isize;
    let r2 = r * r;
    let mut m10 = 0i64;
    let mut m01 = 0i64;
    for v in -r..=r {
        let row = image
            .row((y as isize + v) as usize)
            .expect("orientation disc within bounds");
        for u in -r..=r {
            if u * u + v * v > r2 {
                continue;
            }
            let value = row[(x as isize + u) as usize] as i64;
            m10 += u as i64 * value;
            m01 += v as i64 * value;
        }
    }

    let angle = (m01 as f64).atan2(m10 as f64).to_degrees();
    let angle = if angle < 0.0 { angle + 360.0 } else { angle };
    if angle >= 360.0 {
        0.0
    } else {
        angle as f32
    }
}

/// Computes a 256-bit descriptor by steering the sampling pattern by `angle_deg`.
///
/// Sample offsets are rotated and rounded to the nearest pixel, then read from
/// `smoothed`. Samples are clamped to the image so the call never panics, but
/// callers keep keypoints far enough from the border for this not to matter.
pub(crate) fn steered_descriptor(
    smoothed: ImageView<'_, u8>,
    x: usize,
    y: usize,
    angle_deg: f32,
) -> Descriptor {
    let (sin_a, cos_a) = sin_cos_deg(angle_deg);
    let max_x = smoothed.width() as isize - 1;
    let max_y = smoothed.height() as isize - 1;
    let sample = |px: i8, py: i8| -> u8 {
        let (px, py) = (px as f32, py as f32);
        let dx = (px * cos_a - py * sin_a).round() as isize;
        let dy = (px * sin_a + py * cos_a).round() as isize;
        let sx = (x as isize + dx).clamp(0, max_x) as usize;
        let sy = (y as isize + dy).clamp(0, max_y) as usize;
        *smoothed.get(sx, sy).expect("clamped sample in bounds")
    };

    let mut bits = [0u8; 32];
    for (byte_idx, chunk) in BIT_PATTERN.chunks(8).enumerate() {
        let mut byte = 0u8;
        for (bit_idx, &(x1, y1, x2, y2)) in chunk.iter().enumerate() {
            if sample(x1, y1) < sample(x2, y2) {
                byte |= 1 << bit_idx;
            }
        }
        bits[byte_idx] = byte;
    }
    Descriptor(bits)
}

#[cfg(test)]
mod tests {
    use super::{intensity_centroid_angle, steered_descriptor};
    use crate::image::Image;

    #[test]
    fn centroid_points_toward_bright_side() {
        let right = Image::from_fn(41, 41, |x, _| if x > 20 { 255 } else { 0 }).unwrap();
        let angle = intensity_centroid_angle(right.view(), 20, 20, 15);
        assert!(angle < 1.0 || angle > 359.0, "angle {angle}");

        let below = Image::from_fn(41, 41, |_, y| if y > 20 { 255 } else { 0 }).unwrap();
        let angle = intensity_centroid_angle(below.view(), 20, 20, 15);
        assert!((angle - 90.0).abs() < 1.0, "angle {angle}");
    }

    #[test]
    fn descriptor_is_deterministic_and_sensitive() {
        let a = Image::from_fn(64, 64, |x, y| ((x * 31 + y * 17 + x * y) % 251) as u8).unwrap();
        let b = Image::from_fn(64, 64, |x, y| ((x * 5 + y * 97 + 3 * x * y) % 241) as u8).unwrap();
        let da = steered_descriptor(a.view(), 32, 32, 0.0);
        assert_eq!(da, steered_descriptor(a.view(), 32, 32, 0.0));
        let db = steered_descriptor(b.view(), 32, 32, 0.0);
        assert!(da.hamming(&db) > 0);
    }
}
