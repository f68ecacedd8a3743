//! One-pass photo downscaling
//!
//! Photos whose data URL is estimated at 0.3 MB or less are kept byte for
//! byte. Anything larger is decoded, shrunk so its longer side is at most
//! 512 pixels, and re-encoded once at quality 0.5 in its original format.
//! The result is not measured again, so a dense image can still end up
//! above 0.3 MB.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use serde::Serialize;
use tracing::{debug, info};

use crate::data_url::{encode_data_url, estimate_data_url_bytes};
use crate::error::IntakeError;

/// Estimated size (in MB) up to which a photo is kept untouched
pub const COMPRESSION_THRESHOLD_MB: f64 = 0.3;

/// Upper bound for the longer side of a re-encoded photo
pub const MAX_DIMENSION: u32 = 512;

/// Quality factor 0.5 on the 1-100 JPEG scale
pub const JPEG_QUALITY: u8 = 50;

/// A user-selected image file
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl ImageFile {
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
        }
    }

    /// Build from raw bytes, sniffing the MIME type from the content
    pub fn detect(bytes: Vec<u8>) -> Self {
        let mime = image::guess_format(&bytes)
            .map(|f| f.to_mime_type())
            .unwrap_or("application/octet-stream");
        Self::new(bytes, mime)
    }
}

/// Result of running a photo through intake
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeOutcome {
    pub data_url: String,
    /// Whether the photo was resized and re-encoded
    pub compressed: bool,
    /// Output dimensions; only known when the photo was decoded
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// `data_url.len() * 3 / 4`
    pub estimated_bytes: u64,
}

/// Format a resized photo is written back in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Formats without a lossy encoder fall back to PNG, like a canvas does
    fn for_mime(mime: &str) -> Self {
        match mime.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => OutputFormat::Jpeg,
            _ => OutputFormat::Png,
        }
    }

    fn mime(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }
}

/// Whether a data URL is over the compression threshold
pub fn needs_compression(data_url: &str) -> bool {
    estimate_data_url_bytes(data_url) / (1024.0 * 1024.0) > COMPRESSION_THRESHOLD_MB
}

/// Bounding box for a resize: the longer side is clamped to `max_dim`,
/// the shorter one scaled proportionally. Never upscales.
///
/// Square images take the height branch.
pub fn target_dimensions(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    let scale = |short: u32, long: u32| -> u32 {
        let scaled = (short as f64 * max_dim as f64 / long as f64).round() as u32;
        scaled.max(1)
    };

    if width > height {
        if width > max_dim {
            return (max_dim, scale(height, width));
        }
    } else if height > max_dim {
        return (scale(width, height), max_dim);
    }
    (width, height)
}

/// Run one photo through intake
pub fn compress_image(file: &ImageFile) -> Result<IntakeOutcome, IntakeError> {
    let original = encode_data_url(&file.bytes, &file.mime);
    if !needs_compression(&original) {
        debug!(
            "Keeping {} photo as-is ({} bytes)",
            file.mime,
            file.bytes.len()
        );
        return Ok(IntakeOutcome {
            estimated_bytes: estimate_data_url_bytes(&original) as u64,
            data_url: original,
            compressed: false,
            width: None,
            height: None,
        });
    }

    let decoded = image::load_from_memory(&file.bytes).map_err(IntakeError::Decode)?;
    let (width, height) = target_dimensions(decoded.width(), decoded.height(), MAX_DIMENSION);
    let resized = if (width, height) == (decoded.width(), decoded.height()) {
        decoded
    } else {
        decoded.resize_exact(width, height, FilterType::Triangle)
    };

    let format = OutputFormat::for_mime(&file.mime);
    let bytes = encode(&resized, format)?;
    let data_url = encode_data_url(&bytes, format.mime());

    info!(
        "Compressed {} photo: {} -> {} bytes, {}x{}",
        file.mime,
        file.bytes.len(),
        bytes.len(),
        width,
        height
    );

    Ok(IntakeOutcome {
        estimated_bytes: estimate_data_url_bytes(&data_url) as u64,
        data_url,
        compressed: true,
        width: Some(width),
        height: Some(height),
    })
}

/// Intake for an optional file selection; nothing selected attaches nothing
pub fn intake(file: Option<&ImageFile>) -> Result<Option<IntakeOutcome>, IntakeError> {
    file.map(compress_image).transpose()
}

fn encode(img: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>, IntakeError> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
            rgb.write_with_encoder(encoder)
                .map_err(IntakeError::Encode)?;
        }
        OutputFormat::Png => {
            img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
                .map_err(IntakeError::Encode)?;
        }
    }
    Ok(buf)
}
