//! Harris corner response used to rank FAST candidates.

use crate::image::ImageView;

/// Harris sensitivity parameter.
const HARRIS_K: f64 = 0.04;

/// Side of the structure-tensor accumulation window.
pub(crate) const HARRIS_BLOCK: usize = 7;

/// Computes `det(M) - k * trace(M)^2` of the structure tensor accumulated
/// over a `HARRIS_BLOCK`-sided window centered at `(x, y)`.
///
/// Gradients are 3x3 Sobel responses. The caller guarantees that the window
/// plus one pixel of gradient support lies inside the image.
pub(crate) fn harris_response(image: ImageView<'_, u8>, x: usize, y: usize) -> f32 {
    let half = HARRIS_BLOCK / 2;
    let px = |xx: usize, yy: usize| -> f64 {
        *image.get(xx, yy).expect("harris support in bounds") as f64
    };

    let mut a = 0.0f64;
    let mut b = 0.0f64;
    let mut c = 0.0f64;
    for yy in y - half..=y + half {
        for xx in x - half..=x + half {
            let gx = (px(xx + 1, yy - 1) + 2.0 * px(xx + 1, yy) + px(xx + 1, yy + 1))
                - (px(xx - 1, yy - 1) + 2.0 * px(xx - 1, yy) + px(xx - 1, yy + 1));
            let gy = (px(xx - 1, yy + 1) + 2.0 * px(xx, yy + 1) + px(xx + 1, yy + 1))
                - (px(xx - 1, yy - 1) + 2.0 * px(xx, yy - 1) + px(xx + 1, yy - 1));
            a += gx * gx;
            b += gy * gy;
            c += gx * gy;
        }
    }

    // Normalize to the u8 Sobel range so responses stay comfortably in f32.
    let scale = 1.0 / (4.0 * HARRIS_BLOCK as f64 * 255.0);
    let (a, b, c) = (a * scale * scale, b * scale * scale, c * scale * scale);
    (a * b - c * c - HARRIS_K * (a + b) * (a + b)) as f32
}
