//! Helvetica text metrics used for wrapping and centring

/// Millimetres per PDF point
pub const MM_PER_PT: f64 = 25.4 / 72.0;

/// Line height as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f64 = 1.15;

/// Advance widths (1/1000 em) of Helvetica for ASCII 32..=126
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// Advance widths (1/1000 em) of Helvetica-Bold for ASCII 32..=126
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0..?
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // P.._
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // `..o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // p..~
];

const DEFAULT_WIDTH: u16 = 556;

/// Weight of the standard Helvetica face used for a run of text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
}

impl FontStyle {
    fn widths(&self) -> &'static [u16; 95] {
        match self {
            FontStyle::Regular => &HELVETICA_WIDTHS,
            FontStyle::Bold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// PostScript name of the face
    pub fn base_font(&self) -> &'static [u8] {
        match self {
            FontStyle::Regular => b"Helvetica",
            FontStyle::Bold => b"Helvetica-Bold",
        }
    }
}

fn char_width(c: char, style: FontStyle) -> u16 {
    match c as u32 {
        code @ 32..=126 => style.widths()[(code - 32) as usize],
        _ => DEFAULT_WIDTH,
    }
}

/// Width of `text` set at `font_size` points in `style`, in millimetres
pub fn styled_text_width(text: &str, font_size: f64, style: FontStyle) -> f64 {
    let units: u32 = text.chars().map(|c| char_width(c, style) as u32).sum();
    units as f64 / 1000.0 * font_size * MM_PER_PT
}

/// Width of regular `text` set at `font_size` points, in millimetres
pub fn text_width(text: &str, font_size: f64) -> f64 {
    styled_text_width(text, font_size, FontStyle::Regular)
}

/// Distance between baselines at `font_size`, in millimetres
pub fn line_height(font_size: f64) -> f64 {
    font_size * LINE_HEIGHT_FACTOR * MM_PER_PT
}

/// Greedy word wrap to `max_width` millimetres.
///
/// Words wider than a whole line are split by character.
pub fn wrap_text(text: &str, max_width: f64, font_size: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if text_width(&candidate, font_size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width(word, font_size) <= max_width {
            current = word.to_string();
        } else {
            for c in word.chars() {
                current.push(c);
                if text_width(&current, font_size) > max_width {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
