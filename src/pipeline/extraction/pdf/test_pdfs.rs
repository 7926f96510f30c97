//! Builders for small valid PDFs, shared by the unit tests and the
//! integration tests.

use lopdf::dictionary;
use lopdf::{Document, Object, Stream};

/// Build a valid PDF with one page per entry; `None` produces a page with
/// no text operators at all.
pub fn make_pdf(pages: &[Option<&str>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.4");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let pages_id = doc.new_object_id();
    let mut kids = Vec::with_capacity(pages.len());

    for text in pages {
        let content = match text {
            Some(text) => format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET"),
            None => "q Q".to_string(),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => font_id,
                },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

pub fn make_text_pdf(text: &str) -> Vec<u8> {
    make_pdf(&[Some(text)])
}
