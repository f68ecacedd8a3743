pub mod browse;
pub mod error;
pub mod guard;
pub mod record;

pub use browse::{matches_search, Direction, RecordBrowser, SortField, SortOrder, COINS_PER_PAGE};
pub use error::GuardError;
pub use guard::{check_document_size, document_size, validate_draft, MAX_DOCUMENT_BYTES};
pub use record::{format_timestamp, CoinDocument, CoinDraft, CoinRecord, MAX_PHOTOS};
