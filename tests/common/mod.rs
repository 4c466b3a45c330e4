//! Shared helpers: build small multi-page decks with lopdf.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Build a PDF with one page per entry; each line becomes its own text block.
///
/// Lines must be ASCII and non-empty (the font is Helvetica/WinAnsi).
pub fn deck(pages: &[&[&str]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for lines in pages {
        let mut operations = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            let y = 740 - 28 * i as i64;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 20.into()]));
            operations.push(Operation::new("Td", vec![60.into(), y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 842.into(), 595.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Full lecture"),
        "Author" => Object::string_literal("Lecturer"),
    });
    doc.trailer.set("Info", info_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// The 10-page lecture: outlines on pages 1 and 6, a break slide on page 4.
pub fn lecture() -> Vec<u8> {
    deck(&[
        &["Outline", "Overview", "Recursion", "Sorting"],
        &["Recursion", "Base case first"],
        &["Call stack"],
        &["Coffee Break"],
        &["Tail calls"],
        &["Outline", "Overview", "Recursion", "Sorting"],
        &["Sorting", "Comparison sorts"],
        &["Quicksort (pivot)"],
        &["Merge sort"],
        &["Questions"],
    ])
}

/// Page texts of `bytes` as seen by the lopdf engine, one string per page.
pub fn page_texts(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    let count = doc.get_pages().len() as u32;
    (1..=count)
        .map(|p| doc.extract_text(&[p]).unwrap())
        .collect()
}

/// Mark `bytes` as encrypted by adding a standard-handler `/Encrypt` entry.
pub fn encrypted(bytes: &[u8]) -> Vec<u8> {
    let mut doc = Document::load_mem(bytes).unwrap();
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "O" => Object::string_literal(vec![0x41u8; 32]),
        "U" => Object::string_literal(vec![0x42u8; 32]),
        "P" => -4,
    });
    doc.trailer.set("Encrypt", encrypt_id);
    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}
