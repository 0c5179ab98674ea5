//! Image acquisition and decoding via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Remote sources are
//! fetched with a blocking HTTP client when the `http` feature is enabled.
//! Color payloads are converted to a single luminance channel on load.

use crate::image::Image;
use crate::trace::{trace_event, trace_span};
use crate::util::{LabelMatchError, LabelMatchResult};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where an image comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// A file on the local filesystem.
    Path(PathBuf),
    /// An `http://` or `https://` URL.
    Url(String),
}

impl ImageSource {
    /// Classifies a raw source string; URL schemes are matched case-insensitively.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.trim_start().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(raw.trim().to_string())
        } else {
            Self::Path(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

impl From<&str> for ImageSource {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl Image {
    /// Creates an owned image from a grayscale image buffer.
    pub fn from_gray_image(img: &image::GrayImage) -> LabelMatchResult<Self> {
        let width = img.width() as usize;
        let height = img.height() as usize;
        Image::new(img.as_raw().clone(), width, height)
    }

    /// Creates an owned grayscale image from a dynamic image.
    pub fn from_dynamic_image(img: &image::DynamicImage) -> LabelMatchResult<Self> {
        let gray = img.to_luma8();
        Self::from_gray_image(&gray)
    }
}

/// Loads and converts an image from any supported source.
pub fn load(source: &ImageSource) -> LabelMatchResult<Image> {
    let _span = trace_span!("load_image", source = %source).entered();
    let img = match source {
        ImageSource::Path(path) => load_path(path)?,
        ImageSource::Url(url) => load_url(url)?,
    };
    trace_event!("image_loaded", width = img.width(), height = img.height());
    Ok(img)
}

/// Loads an image from disk and converts it to grayscale.
pub fn load_path<P: AsRef<Path>>(path: P) -> LabelMatchResult<Image> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|err| LabelMatchError::load(&origin, err))?;
    decode(&bytes, origin)
}

/// Decodes an in-memory payload (PNG, JPEG) into a grayscale image.
pub fn load_bytes(bytes: &[u8]) -> LabelMatchResult<Image> {
    decode(bytes, "<memory>".to_string())
}

fn decode(bytes: &[u8], origin: String) -> LabelMatchResult<Image> {
    if bytes.is_empty() {
        return Err(LabelMatchError::load(origin, "empty payload"));
    }
    let dynamic =
        image::load_from_memory(bytes).map_err(|err| LabelMatchError::load(&origin, err))?;
    if dynamic.width() == 0 || dynamic.height() == 0 {
        return Err(LabelMatchError::load(origin, "decoded an empty frame"));
    }
    Image::from_dynamic_image(&dynamic).map_err(|err| LabelMatchError::load(origin, err))
}

#[cfg(feature = "http")]
fn load_url(url: &str) -> LabelMatchResult<Image> {
    let response = reqwest::blocking::get(url)
        .and_then(|resp| resp.error_for_status())
        .map_err(|err| LabelMatchError::load(url, err))?;
    let bytes = response
        .bytes()
        .map_err(|err| LabelMatchError::load(url, err))?;
    decode(&bytes, url.to_string())
}

#[cfg(not(feature = "http"))]
fn load_url(url: &str) -> LabelMatchResult<Image> {
    Err(LabelMatchError::load(
        url,
        "remote sources require the `http` feature",
    ))
}

#[cfg(test)]
mod tests {
    use super::ImageSource;
    use std::path::PathBuf;

    #[test]
    fn parse_distinguishes_urls_from_paths() {
        assert_eq!(
            ImageSource::parse("https://example.com/a.png"),
            ImageSource::Url("https://example.com/a.png".to_string())
        );
        assert_eq!(
            ImageSource::parse("HTTP://example.com/a.png"),
            ImageSource::Url("HTTP://example.com/a.png".to_string())
        );
        assert_eq!(
            ImageSource::parse("labels/http_ref.png"),
            ImageSource::Path(PathBuf::from("labels/http_ref.png"))
        );
    }
}
