//! Report layout
//!
//! Coordinates are millimetres on an A4 page measured from the top-left
//! corner; text `y` is the baseline. A record block is placed whole: the
//! page break check happens only before a record starts.

use coin_types::CoinRecord;
use tracing::warn;

use crate::metrics::{line_height, styled_text_width, wrap_text, FontStyle};
use crate::photo::ReportPhoto;

pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;
pub const TOP_MARGIN: f64 = 20.0;
pub const LEFT_MARGIN: f64 = 20.0;
/// A record starting below this line moves to a new page
pub const PAGE_BREAK_Y: f64 = 260.0;

pub const TITLE: &str = "Coin Records";
pub const TITLE_SIZE: f64 = 20.0;
pub const HEADING_SIZE: f64 = 14.0;
pub const BODY_SIZE: f64 = 10.0;

const TITLE_ADVANCE: f64 = 15.0;
const HEADING_ADVANCE: f64 = 10.0;
const FIELD_ADVANCE: f64 = 6.0;
const PARAGRAPH_ADVANCE: f64 = 10.0;
const BLOCK_GAP: f64 = 10.0;

pub const DESCRIPTION_MAX_WIDTH: f64 = 170.0;
pub const PHOTO_SIZE: f64 = 50.0;
pub const SECOND_PHOTO_X: f64 = 80.0;
const PHOTO_ADVANCE: f64 = 60.0;

pub const PHOTO_PLACEHOLDER: &str = "Image unavailable";

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutItem {
    Text {
        x: f64,
        y: f64,
        size: f64,
        style: FontStyle,
        text: String,
    },
    /// `photo` indexes [`ReportLayout::photos`]; `(x, y)` is the top-left corner
    Photo {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        photo: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct LayoutPage {
    pub items: Vec<LayoutItem>,
}

impl LayoutPage {
    /// Text strings placed on this page, in placement order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            LayoutItem::Text { text, .. } => Some(text.as_str()),
            LayoutItem::Photo { .. } => None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ReportLayout {
    pub pages: Vec<LayoutPage>,
    pub photos: Vec<ReportPhoto>,
}

/// Vertical cursor over a growing list of pages
struct Cursor {
    pages: Vec<LayoutPage>,
    photos: Vec<ReportPhoto>,
    y: f64,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![LayoutPage::default()],
            photos: Vec::new(),
            y: TOP_MARGIN,
        }
    }

    fn page(&mut self) -> &mut LayoutPage {
        // The page list always holds at least one page
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn break_page(&mut self) {
        self.pages.push(LayoutPage::default());
        self.y = TOP_MARGIN;
    }

    fn text(&mut self, x: f64, size: f64, text: impl Into<String>) {
        self.styled_text(x, size, FontStyle::Regular, text);
    }

    fn styled_text(&mut self, x: f64, size: f64, style: FontStyle, text: impl Into<String>) {
        let y = self.y;
        self.page().items.push(LayoutItem::Text {
            x,
            y,
            size,
            style,
            text: text.into(),
        });
    }

    fn field(&mut self, label: &str, value: &str) {
        self.text(LEFT_MARGIN, BODY_SIZE, format!("{}: {}", label, value));
        self.y += FIELD_ADVANCE;
    }

    fn photo(&mut self, x: f64, photo: ReportPhoto) {
        let index = self.photos.len();
        self.photos.push(photo);
        let y = self.y;
        self.page().items.push(LayoutItem::Photo {
            x,
            y,
            width: PHOTO_SIZE,
            height: PHOTO_SIZE,
            photo: index,
        });
    }
}

fn or_na(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}

/// Lay out the title page and one block per record
pub fn layout_report(records: &[CoinRecord]) -> ReportLayout {
    let mut cursor = Cursor::new();

    let title_x = PAGE_WIDTH / 2.0 - styled_text_width(TITLE, TITLE_SIZE, FontStyle::Bold) / 2.0;
    cursor.styled_text(title_x, TITLE_SIZE, FontStyle::Bold, TITLE);
    cursor.y += TITLE_ADVANCE;

    for (index, record) in records.iter().enumerate() {
        if cursor.y > PAGE_BREAK_Y {
            cursor.break_page();
        }
        layout_record(&mut cursor, index + 1, record);
    }

    ReportLayout {
        pages: cursor.pages,
        photos: cursor.photos,
    }
}

fn layout_record(cursor: &mut Cursor, number: usize, record: &CoinRecord) {
    let doc = &record.document;

    cursor.styled_text(
        LEFT_MARGIN,
        HEADING_SIZE,
        FontStyle::Bold,
        format!("Coin {}", number),
    );
    cursor.y += HEADING_ADVANCE;

    cursor.field("Coin No", or_na(&doc.coin_no));
    cursor.field("Value", &doc.value);
    cursor.field("Material", or_na(&doc.material));
    cursor.field("Country", or_na(&doc.country));
    cursor.field("Year", &doc.year);
    cursor.field("Mint", &doc.mint);
    cursor.field("Present Value", &doc.coin_present_value);

    let description = format!("Description: {}", doc.description);
    let lines = wrap_text(&description, DESCRIPTION_MAX_WIDTH, BODY_SIZE);
    let extra_lines = lines.len().saturating_sub(1);
    let top = cursor.y;
    for (i, line) in lines.into_iter().enumerate() {
        cursor.y = top + i as f64 * line_height(BODY_SIZE);
        cursor.text(LEFT_MARGIN, BODY_SIZE, line);
    }
    cursor.y = top + PARAGRAPH_ADVANCE + extra_lines as f64 * line_height(BODY_SIZE);

    cursor.text(
        LEFT_MARGIN,
        BODY_SIZE,
        format!("Remark: {}", or_na(&doc.remark)),
    );
    cursor.y += PARAGRAPH_ADVANCE;

    if !doc.photos.is_empty() {
        let decoded: Result<Vec<ReportPhoto>, _> = doc
            .photos
            .iter()
            .take(2)
            .map(|url| ReportPhoto::from_data_url(url))
            .collect();

        match decoded {
            Ok(photos) => {
                for (photo, x) in photos.into_iter().zip([LEFT_MARGIN, SECOND_PHOTO_X]) {
                    cursor.photo(x, photo);
                }
                cursor.y += PHOTO_ADVANCE;
            }
            Err(e) => {
                warn!("Photo of coin {} could not be embedded: {}", doc.coin_no, e);
                cursor.text(LEFT_MARGIN, BODY_SIZE, PHOTO_PLACEHOLDER);
                cursor.y += PARAGRAPH_ADVANCE;
            }
        }
    }

    cursor.y += BLOCK_GAP;
}
