//! Data models for the coin catalog API

use coin_types::{CoinDocument, CoinRecord, SortField, SortOrder};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Coin row as stored in the database
#[derive(Debug, Clone, FromRow)]
pub struct DbCoin {
    pub id: String,
    pub coin_no: String,
    pub value: String,
    pub material: String,
    pub country: String,
    pub year: String,
    pub mint: String,
    pub coin_present_value: String,
    pub description: String,
    pub remark: String,
    pub photos_json: String,
    pub created_at: String,
}

impl DbCoin {
    pub fn into_record(self) -> Result<CoinRecord, serde_json::Error> {
        let photos: Vec<String> = serde_json::from_str(&self.photos_json)?;
        Ok(CoinRecord {
            id: self.id,
            document: CoinDocument {
                coin_no: self.coin_no,
                value: self.value,
                material: self.material,
                country: self.country,
                year: self.year,
                mint: self.mint,
                coin_present_value: self.coin_present_value,
                description: self.description,
                remark: self.remark,
                photos,
                created_at: self.created_at,
            },
        })
    }
}

/// Query for the keystroke duplicate check
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistsQuery {
    #[serde(default)]
    pub coin_no: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistsResponse {
    pub coin_no: String,
    pub exists: bool,
}

/// Listing query: store-side ordering, in-memory search and paging
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default)]
    pub search: String,
    pub page: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub coins: Vec<CoinRecord>,
    pub page: usize,
    pub total_pages: usize,
    pub total_count: usize,
}

/// Report query: same ordering and search as the listing, no paging
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default)]
    pub search: String,
}
