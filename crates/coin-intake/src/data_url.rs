//! `data:` URL encoding and parsing

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::error::IntakeError;

/// A decoded data URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Encode bytes as `data:<mime>;base64,<payload>`
pub fn encode_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// Estimated decoded size of a data URL in bytes.
///
/// Inverse of the base64 expansion applied to the whole string, header
/// included, so it slightly overestimates.
pub fn estimate_data_url_bytes(data_url: &str) -> f64 {
    data_url.len() as f64 * 3.0 / 4.0
}

/// Split a data URL into its MIME type and decoded payload
pub fn parse_data_url(data_url: &str) -> Result<DataUrl, IntakeError> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| IntakeError::InvalidDataUrl(truncate(data_url)))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| IntakeError::InvalidDataUrl(truncate(data_url)))?;

    let mime = header
        .split(';')
        .next()
        .filter(|m| !m.is_empty())
        .unwrap_or("application/octet-stream")
        .to_string();

    let bytes = if header.ends_with(";base64") {
        BASE64.decode(payload.trim())?
    } else {
        payload.as_bytes().to_vec()
    };

    Ok(DataUrl { mime, bytes })
}

fn truncate(s: &str) -> String {
    s.chars().take(32).collect()
}
