//! Coin record model
//!
//! A record moves through three shapes:
//! - [`CoinDraft`]: the submitted form fields plus encoded photos
//! - [`CoinDocument`]: a draft stamped with its creation time, the body
//!   that is size-guarded and persisted
//! - [`CoinRecord`]: a stored document with its store-assigned id

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of photos attached to one record (front and back)
pub const MAX_PHOTOS: usize = 2;

/// Form fields submitted when adding a coin.
///
/// Absent keys read as empty so they surface through validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoinDraft {
    pub coin_no: String,
    pub value: String,
    pub material: String,
    pub country: String,
    pub year: String,
    pub mint: String,
    pub coin_present_value: String,
    pub description: String,
    pub remark: String,
    /// Encoded photos (data URLs), front first
    pub photos: Vec<String>,
}

impl CoinDraft {
    /// Stamp the draft with its creation time
    pub fn into_document(self, created_at: DateTime<Utc>) -> CoinDocument {
        CoinDocument {
            coin_no: self.coin_no,
            value: self.value,
            material: self.material,
            country: self.country,
            year: self.year,
            mint: self.mint,
            coin_present_value: self.coin_present_value,
            description: self.description,
            remark: self.remark,
            photos: self.photos,
            created_at: format_timestamp(created_at),
        }
    }

    /// Required fields paired with their form labels
    pub fn required_fields(&self) -> [(&'static str, &str); 8] {
        [
            ("coinNo", &self.coin_no),
            ("value", &self.value),
            ("material", &self.material),
            ("country", &self.country),
            ("year", &self.year),
            ("mint", &self.mint),
            ("coinPresentValue", &self.coin_present_value),
            ("description", &self.description),
        ]
    }
}

/// The persisted body of a coin record.
///
/// Field order here is the serialization order, so the measured size of a
/// document is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinDocument {
    pub coin_no: String,
    pub value: String,
    pub material: String,
    pub country: String,
    pub year: String,
    pub mint: String,
    pub coin_present_value: String,
    pub description: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub photos: Vec<String>,
    pub created_at: String,
}

/// A stored coin record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinRecord {
    pub id: String,
    #[serde(flatten)]
    pub document: CoinDocument,
}

impl CoinRecord {
    /// Wrap a document with a freshly generated id
    pub fn new(document: CoinDocument) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            document,
        }
    }

    pub fn coin_no(&self) -> &str {
        &self.document.coin_no
    }

    pub fn photos(&self) -> &[String] {
        &self.document.photos
    }
}

/// ISO-8601 timestamp with millisecond precision and a `Z` suffix
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
