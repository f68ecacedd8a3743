//! Printable PDF report of coin records
//!
//! Two stages:
//! - [`layout_report`]: places the title, field lines and photos on A4
//!   pages (millimetres, top-down), breaking pages between records
//! - [`render_pdf`]: writes the layout as a PDF with lopdf
//!
//! A photo that cannot be decoded is replaced by a text placeholder for its
//! record instead of failing the whole report.

pub mod error;
pub mod layout;
pub mod metrics;
pub mod photo;
pub mod render;

use chrono::NaiveDate;
use coin_types::CoinRecord;
use tracing::info;

pub use error::ReportError;
pub use layout::{layout_report, LayoutItem, LayoutPage, ReportLayout};
pub use metrics::FontStyle;
pub use photo::ReportPhoto;
pub use render::render_pdf;

/// Lay out and render a report for `records`, in the given order
pub fn export_report(records: &[CoinRecord]) -> Result<Vec<u8>, ReportError> {
    let layout = layout_report(records);
    let bytes = render_pdf(&layout)?;
    info!(
        "Exported {} records on {} pages ({} bytes)",
        records.len(),
        layout.pages.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Download name of a report exported on `date`
pub fn report_file_name(date: NaiveDate) -> String {
    format!("coin-records-{}.pdf", date.format("%Y-%m-%d"))
}
