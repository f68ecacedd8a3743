//! Photo intake for coin records
//!
//! Turns a selected image file into a `data:` URL small enough to embed in
//! a coin record:
//! - [`compress_image`]: one-pass downscale of photos over 0.3 MB
//! - [`intake`]: the same for an optional selection
//! - [`parse_data_url`] / [`encode_data_url`]: data URL helpers, also used
//!   when photos are embedded into reports

pub mod compress;
pub mod data_url;
pub mod error;

pub use compress::{
    compress_image, intake, needs_compression, target_dimensions, ImageFile, IntakeOutcome,
    COMPRESSION_THRESHOLD_MB, JPEG_QUALITY, MAX_DIMENSION,
};
pub use data_url::{encode_data_url, estimate_data_url_bytes, parse_data_url, DataUrl};
pub use error::IntakeError;
