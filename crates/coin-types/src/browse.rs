//! Listing, search and pagination over fetched coin records
//!
//! Ordering is done by the store ([`SortField`] / [`SortOrder`] name the
//! column and direction). Everything here operates on the already-ordered
//! list in memory.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::record::CoinRecord;

/// Records shown per page of the listing
pub const COINS_PER_PAGE: usize = 6;

/// Field the listing is ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    Year,
    CoinPresentValue,
}

impl SortField {
    /// Storage column backing this field
    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::Year => "year",
            SortField::CoinPresentValue => "coin_present_value",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortField::CreatedAt => write!(f, "createdAt"),
            SortField::Year => write!(f, "year"),
            SortField::CoinPresentValue => write!(f, "coinPresentValue"),
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(SortField::CreatedAt),
            "year" => Ok(SortField::Year),
            "coinPresentValue" => Ok(SortField::CoinPresentValue),
            other => Err(format!("Unknown sort field: {}", other)),
        }
    }
}

/// Listing direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Case-insensitive substring match on coin number, country or material
pub fn matches_search(record: &CoinRecord, term: &str) -> bool {
    let term = term.to_lowercase();
    let doc = &record.document;
    [&doc.coin_no, &doc.country, &doc.material]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
}

/// Number of pages needed for `count` records
pub fn total_pages(count: usize) -> usize {
    count.div_ceil(COINS_PER_PAGE)
}

/// Direction for page and photo navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Prev,
}

/// Browsing state over a fetched, store-ordered list of records.
///
/// The current page is 1-based and goes back to 1 whenever the search term
/// or the record set changes. The listing endpoint only searches, clamps and
/// slices; step navigation and the photo carousel serve UI clients that keep
/// a browser alive between interactions.
#[derive(Debug, Clone)]
pub struct RecordBrowser {
    records: Vec<CoinRecord>,
    search_term: String,
    filtered: Vec<usize>,
    current_page: usize,
    photo_cursors: HashMap<String, usize>,
}

impl RecordBrowser {
    pub fn new(records: Vec<CoinRecord>) -> Self {
        let mut browser = Self {
            records,
            search_term: String::new(),
            filtered: Vec::new(),
            current_page: 1,
            photo_cursors: HashMap::new(),
        };
        browser.refilter();
        browser
    }

    /// Replace the record set (e.g. after a re-fetch with a new ordering)
    pub fn set_records(&mut self, records: Vec<CoinRecord>) {
        self.records = records;
        self.refilter();
    }

    pub fn set_search(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.refilter();
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    fn refilter(&mut self) {
        self.filtered = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| matches_search(r, &self.search_term))
            .map(|(i, _)| i)
            .collect();
        self.current_page = 1;
    }

    /// All records matching the current search, in listing order
    pub fn filtered(&self) -> Vec<&CoinRecord> {
        self.filtered.iter().map(|&i| &self.records[i]).collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered.len())
    }

    /// Records on the current page
    pub fn page_items(&self) -> Vec<&CoinRecord> {
        let start = (self.current_page - 1) * COINS_PER_PAGE;
        self.filtered
            .iter()
            .skip(start)
            .take(COINS_PER_PAGE)
            .map(|&i| &self.records[i])
            .collect()
    }

    /// Step one page; no-op at either bound
    pub fn turn_page(&mut self, direction: Direction) {
        match direction {
            Direction::Next if self.current_page < self.total_pages() => {
                self.current_page += 1
            }
            Direction::Prev if self.current_page > 1 => self.current_page -= 1,
            _ => {}
        }
    }

    /// Jump to a page, clamped to the valid range
    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages().max(1));
    }

    /// Move the photo carousel of a record, wrapping at either end.
    ///
    /// Returns the new photo index, or `None` for unknown records and
    /// records without photos.
    pub fn cycle_photo(&mut self, coin_id: &str, direction: Direction) -> Option<usize> {
        let count = self
            .records
            .iter()
            .find(|r| r.id == coin_id)
            .map(|r| r.photos().len())?;
        if count == 0 {
            return None;
        }

        let current = self.photo_cursors.get(coin_id).copied().unwrap_or(0);
        let next = match direction {
            Direction::Next => (current + 1) % count,
            Direction::Prev => (current + count - 1) % count,
        };
        self.photo_cursors.insert(coin_id.to_string(), next);
        Some(next)
    }

    /// Photo currently shown for a record
    pub fn current_photo(&self, coin_id: &str) -> Option<&str> {
        let record = self.records.iter().find(|r| r.id == coin_id)?;
        let index = self.photo_cursors.get(coin_id).copied().unwrap_or(0);
        record.photos().get(index).map(String::as_str)
    }
}
