//! Upload format detection and pixel decoding.

use dominant_colors::Rgb;
use image::imageops::FilterType;
use image::ImageFormat;
use std::path::Path;

use crate::error::AnalysisError;

const EXPECTED: &str = "expected PNG or JPEG";

/// Raster formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpg",
        }
    }

    pub fn format(self) -> ImageFormat {
        match self {
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Jpeg => ImageFormat::Jpeg,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageKind::Png),
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            _ => None,
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Decide the format of an upload from its client file name and content.
    ///
    /// A file name with a foreign extension is rejected outright; otherwise
    /// the content signature decides.
    pub fn detect(file_name: Option<&str>, bytes: &[u8]) -> Result<Self, AnalysisError> {
        if bytes.is_empty() {
            return Err(AnalysisError::InvalidImage("upload is empty".to_string()));
        }

        if let Some(ext) = file_name
            .map(Path::new)
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
        {
            if Self::from_extension(ext).is_none() {
                return Err(AnalysisError::UnsupportedFormat(format!(".{ext} ({EXPECTED})")));
            }
        }

        match image::guess_format(bytes) {
            Ok(ImageFormat::Png) => Ok(ImageKind::Png),
            Ok(ImageFormat::Jpeg) => Ok(ImageKind::Jpeg),
            Ok(other) => Err(AnalysisError::UnsupportedFormat(format!(
                "{other:?} ({EXPECTED})"
            ))),
            Err(_) => Err(AnalysisError::UnsupportedFormat(format!(
                "unrecognized image data ({EXPECTED})"
            ))),
        }
    }
}

/// Pixels ready for clustering plus the dimensions they came from.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Size of the uploaded image
    pub width: u32,
    pub height: u32,
    /// Size of the (possibly downscaled) image the pixels were taken from
    pub sample_width: u32,
    pub sample_height: u32,
    pub pixels: Vec<Rgb>,
}

/// Decode an upload to RGB pixels, downscaling so neither side exceeds
/// `max_dimension` (0 disables downscaling). Alpha is dropped.
///
/// Data that fails to decode as the detected format is unsupported; only a
/// decoded image without pixels is invalid.
pub fn decode_pixels(
    bytes: &[u8],
    kind: ImageKind,
    max_dimension: u32,
) -> Result<DecodedImage, AnalysisError> {
    let img = image::load_from_memory_with_format(bytes, kind.format())
        .map_err(|e| AnalysisError::UnsupportedFormat(format!("cannot decode image: {e}")))?;

    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(AnalysisError::InvalidImage("image has no pixels".to_string()));
    }

    let sample = if max_dimension > 0 && (width > max_dimension || height > max_dimension) {
        let resized = img.resize(max_dimension, max_dimension, FilterType::Lanczos3);
        tracing::debug!(
            from = %format!("{width}x{height}"),
            to = %format!("{}x{}", resized.width(), resized.height()),
            "Downscaled image for clustering"
        );
        resized
    } else {
        img
    };

    let rgb = sample.to_rgb8();
    let pixels = rgb.pixels().map(|p| Rgb::from_bytes(p.0)).collect();

    Ok(DecodedImage {
        width,
        height,
        sample_width: rgb.width(),
        sample_height: rgb.height(),
        pixels,
    })
}
