//! Document information (`/Info`) handling on serialised PDFs.
//!
//! pdfium can read but not write the information dictionary, so the title
//! override is applied to the serialised bytes with lopdf for both engines.
//! The unit gets a fresh dictionary holding only `/Title`; nothing from the
//! source deck's information dictionary is carried over.

use crate::error::SegmentError;
use lopdf::{dictionary, Document, Object, StringFormat};

/// Replace the document information dictionary of `bytes` with `{ /Title title }`.
pub fn set_title(bytes: &[u8], title: &str) -> Result<Vec<u8>, SegmentError> {
    let mut document = Document::load_mem(bytes).map_err(|e| SegmentError::Metadata {
        detail: e.to_string(),
    })?;

    let info_id = document.add_object(dictionary! {
        "Title" => encode_text_string(title),
    });
    document.trailer.set("Info", info_id);

    let mut out = Vec::with_capacity(bytes.len());
    document
        .save_to(&mut out)
        .map_err(|e| SegmentError::Metadata {
            detail: e.to_string(),
        })?;
    Ok(out)
}

/// Read the `/Title` entry of `bytes`, if any.
pub fn read_title(bytes: &[u8]) -> Result<Option<String>, SegmentError> {
    let document = Document::load_mem(bytes).map_err(|e| SegmentError::Metadata {
        detail: e.to_string(),
    })?;

    let info = match document.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => match document.get_dictionary(*id) {
            Ok(dict) => dict,
            Err(_) => return Ok(None),
        },
        Ok(Object::Dictionary(dict)) => dict,
        _ => return Ok(None),
    };

    match info.get(b"Title") {
        Ok(Object::String(raw, _)) => Ok(Some(decode_text_string(raw))),
        _ => Ok(None),
    }
}

/// PDF text string: literal for ASCII, UTF-16BE with BOM otherwise.
fn encode_text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut raw = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        raw.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(raw, StringFormat::Hexadecimal)
}

fn decode_text_string(raw: &[u8]) -> String {
    match raw.strip_prefix(&[0xFE, 0xFF]) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        // PDFDocEncoding agrees with Latin-1 for everything a title needs
        None => raw.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_string_roundtrip_non_ascii() {
        let obj = encode_text_string("Bäume & Graphen");
        match obj {
            Object::String(raw, StringFormat::Hexadecimal) => {
                assert_eq!(&raw[..2], &[0xFE, 0xFF]);
                assert_eq!(decode_text_string(&raw), "Bäume & Graphen");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn ascii_title_is_literal() {
        assert!(matches!(
            encode_text_string("Sorting"),
            Object::String(_, StringFormat::Literal)
        ));
        assert_eq!(decode_text_string(b"Sorting"), "Sorting");
    }

    #[test]
    fn garbage_bytes_fail_with_metadata_error() {
        assert!(matches!(
            set_title(b"not a pdf", "x"),
            Err(SegmentError::Metadata { .. })
        ));
    }
}
