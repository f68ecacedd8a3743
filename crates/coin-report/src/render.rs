//! PDF rendering of a [`ReportLayout`] with lopdf

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::error::ReportError;
use crate::layout::{LayoutItem, LayoutPage, ReportLayout, PAGE_HEIGHT, PAGE_WIDTH};
use crate::metrics::{FontStyle, MM_PER_PT};
use crate::photo::ReportPhoto;

fn font_name(style: FontStyle) -> &'static [u8] {
    match style {
        FontStyle::Regular => b"F1",
        FontStyle::Bold => b"F2",
    }
}

fn font_dictionary(style: FontStyle) -> Dictionary {
    Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(style.base_font().to_vec())),
        ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
    ])
}

fn pt(mm: f64) -> f32 {
    (mm / MM_PER_PT) as f32
}

/// Text as WinAnsi bytes; characters outside Latin-1 become `?`
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            code @ 0x20..=0x7e | code @ 0xa0..=0xff => code as u8,
            _ => b'?',
        })
        .collect()
}

fn photo_name(index: usize) -> String {
    format!("Im{}", index + 1)
}

/// Render the layout to PDF bytes
pub fn render_pdf(layout: &ReportLayout) -> Result<Vec<u8>, ReportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for style in [FontStyle::Regular, FontStyle::Bold] {
        let font_id = doc.add_object(font_dictionary(style));
        fonts.set(font_name(style).to_vec(), Object::Reference(font_id));
    }

    let photo_ids: Vec<ObjectId> = layout
        .photos
        .iter()
        .map(|photo| doc.add_object(photo_stream(photo)))
        .collect();

    let mut page_ids = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let page_id = add_page(&mut doc, pages_id, &fonts, &photo_ids, page)?;
        page_ids.push(page_id);
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(page_ids.len() as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ReportError::OperationError(format!("Save failed: {}", e)))?;
    Ok(buffer)
}

fn photo_stream(photo: &ReportPhoto) -> Stream {
    let dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(photo.width as i64)),
        ("Height", Object::Integer(photo.height as i64)),
        ("ColorSpace", Object::Name(photo.color_space.to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
        ("Filter", Object::Name(photo.filter.pdf_name().to_vec())),
    ]);
    // Data is already encoded for its filter
    Stream::new(dict, photo.data.clone()).with_compression(false)
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    fonts: &Dictionary,
    photo_ids: &[ObjectId],
    page: &LayoutPage,
) -> Result<ObjectId, ReportError> {
    let mut operations = Vec::new();
    let mut xobjects = Dictionary::new();

    for item in &page.items {
        match item {
            LayoutItem::Text {
                x,
                y,
                size,
                style,
                text,
            } => {
                operations.extend([
                    Operation::new("BT", vec![]),
                    Operation::new(
                        "Tf",
                        vec![
                            Object::Name(font_name(*style).to_vec()),
                            Object::Real(*size as f32),
                        ],
                    ),
                    Operation::new(
                        "Td",
                        vec![Object::Real(pt(*x)), Object::Real(pt(PAGE_HEIGHT - y))],
                    ),
                    Operation::new(
                        "Tj",
                        vec![Object::String(encode_text(text), StringFormat::Literal)],
                    ),
                    Operation::new("ET", vec![]),
                ]);
            }
            LayoutItem::Photo {
                x,
                y,
                width,
                height,
                photo,
            } => {
                let object_id = photo_ids.get(*photo).copied().ok_or_else(|| {
                    ReportError::OperationError(format!("Unknown photo index {}", photo))
                })?;
                let name = photo_name(*photo);
                xobjects.set(name.as_bytes().to_vec(), Object::Reference(object_id));

                operations.extend([
                    Operation::new("q", vec![]),
                    Operation::new(
                        "cm",
                        vec![
                            Object::Real(pt(*width)),
                            Object::Integer(0),
                            Object::Integer(0),
                            Object::Real(pt(*height)),
                            Object::Real(pt(*x)),
                            Object::Real(pt(PAGE_HEIGHT - y - height)),
                        ],
                    ),
                    Operation::new("Do", vec![Object::Name(name.into_bytes())]),
                    Operation::new("Q", vec![]),
                ]);
            }
        }
    }

    let content = Content { operations };
    let encoded = content
        .encode()
        .map_err(|e| ReportError::OperationError(format!("Content encoding failed: {}", e)))?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts.clone()));
    if !xobjects.is_empty() {
        resources.set("XObject", Object::Dictionary(xobjects));
    }

    let page = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(pt(PAGE_WIDTH)),
                Object::Real(pt(PAGE_HEIGHT)),
            ]),
        ),
        ("Resources", Object::Dictionary(resources)),
        ("Contents", Object::Reference(content_id)),
    ]);
    Ok(doc.add_object(page))
}
