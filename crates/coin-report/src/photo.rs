//! Photo decoding for embedding as PDF image XObjects

use std::io::Write;

use coin_intake::parse_data_url;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::ImageFormat;

use crate::error::ReportError;

/// Stream filter of an embedded photo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoFilter {
    /// JPEG bytes passed through unchanged
    Dct,
    /// Zlib-compressed raw samples
    Flate,
}

impl PhotoFilter {
    pub fn pdf_name(&self) -> &'static [u8] {
        match self {
            PhotoFilter::Dct => b"DCTDecode",
            PhotoFilter::Flate => b"FlateDecode",
        }
    }
}

/// A photo ready to be written as an image XObject
#[derive(Debug, Clone)]
pub struct ReportPhoto {
    pub width: u32,
    pub height: u32,
    pub color_space: &'static [u8],
    pub filter: PhotoFilter,
    pub data: Vec<u8>,
}

impl ReportPhoto {
    /// Decode a `data:` URL photo as stored on a coin record
    pub fn from_data_url(data_url: &str) -> Result<Self, ReportError> {
        let parsed = parse_data_url(data_url)?;
        Self::from_bytes(&parsed.bytes)
    }

    /// JPEG with one or three components is embedded as-is; anything else
    /// (CMYK JPEG, PNG, GIF, ...) is decoded and stored as Flate RGB.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReportError> {
        let decoded = image::load_from_memory(bytes)?;
        let (width, height) = (decoded.width(), decoded.height());

        let passthrough = match image::guess_format(bytes) {
            Ok(ImageFormat::Jpeg) => jpeg_components(bytes).and_then(dct_color_space),
            _ => None,
        };
        if let Some(color_space) = passthrough {
            return Ok(Self {
                width,
                height,
                color_space,
                filter: PhotoFilter::Dct,
                data: bytes.to_vec(),
            });
        }

        // Alpha is dropped; the report background is plain white paper
        let rgb = decoded.to_rgb8();
        Ok(Self {
            width,
            height,
            color_space: b"DeviceRGB",
            filter: PhotoFilter::Flate,
            data: flate_compress(rgb.as_raw())?,
        })
    }
}

/// Color space for a DCT stream with `components` channels, if a viewer can
/// show it without a Decode array
fn dct_color_space(components: u8) -> Option<&'static [u8]> {
    match components {
        1 => Some(b"DeviceGray"),
        3 => Some(b"DeviceRGB"),
        _ => None,
    }
}

/// Component count from the first SOFn frame header of a JPEG stream
fn jpeg_components(bytes: &[u8]) -> Option<u8> {
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        // Fill bytes
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        let length = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        let is_frame = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            // Lf(2) P(1) Y(2) X(2) Nf(1)
            return bytes.get(pos + 9).copied();
        }
        pos += 2 + length;
    }
    None
}

fn flate_compress(data: &[u8]) -> Result<Vec<u8>, ReportError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
