//! Grayscale image storage and borrowed views.
//!
//! `Image` owns a contiguous single-channel `u8` buffer and is never mutated
//! after construction. `ImageView` is a borrowed 2D view into a 1D buffer with
//! an explicit stride; the stride counts elements between the starts of
//! consecutive rows, so a stride larger than the width represents padded rows.
//! Scorers only ever see views.

use crate::util::{LabelMatchError, LabelMatchResult};

pub(crate) mod filter;
#[cfg(feature = "image-io")]
pub mod io;
pub(crate) mod pyramid;
pub mod resize;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> LabelMatchResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(
        data: &'a [T],
        width: usize,
        height: usize,
        stride: usize,
    ) -> LabelMatchResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(LabelMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Iterates over all rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> + '_ {
        (0..self.height).filter_map(move |y| self.row(y))
    }
}

impl<'a> ImageView<'a, u8> {
    /// Copies the view into an owned contiguous image.
    pub fn to_image(&self) -> Image {
        let mut data = Vec::with_capacity(self.width * self.height);
        for row in self.rows() {
            data.extend_from_slice(row);
        }
        Image {
            data,
            width: self.width,
            height: self.height,
        }
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> LabelMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(LabelMatchError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(LabelMatchError::InvalidStride { width, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(LabelMatchError::InvalidDimensions { width, height })?;
    Ok(needed)
}

/// Owned contiguous grayscale image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Image {
    /// Creates an image from a row-major buffer of exactly `width * height` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> LabelMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(LabelMatchError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(LabelMatchError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(LabelMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(LabelMatchError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> LabelMatchResult<Self>
    where
        F: FnMut(usize, usize) -> u8,
    {
        let len = width
            .checked_mul(height)
            .ok_or(LabelMatchError::InvalidDimensions { width, height })?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self::new(data, width, height)
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major pixel buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Image, ImageView};
    use crate::util::LabelMatchError;

    #[test]
    fn image_rejects_mismatched_buffer() {
        let err = Image::new(vec![0u8; 5], 2, 2).unwrap_err();
        assert_eq!(err, LabelMatchError::InvalidDimensions { width: 2, height: 2 });
        let err = Image::new(vec![0u8; 3], 2, 2).unwrap_err();
        assert_eq!(err, LabelMatchError::BufferTooSmall { needed: 4, got: 3 });
    }

    #[test]
    fn padded_view_copies_only_visible_pixels() {
        let data = [1u8, 2, 9, 3, 4, 9];
        let view = ImageView::new(&data, 2, 2, 3).unwrap();
        let owned = view.to_image();
        assert_eq!(owned.data(), &[1, 2, 3, 4]);
        assert_eq!(view.get(1, 1).copied(), Some(4));
        assert!(view.get(2, 0).is_none());
    }
}
