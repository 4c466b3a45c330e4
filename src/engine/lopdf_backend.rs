//! Pure-Rust engine via `lopdf`.
//!
//! Works without any native library, which makes it the engine of choice for
//! tests and minimal deployments. Text comes from lopdf's content-stream text
//! extraction, so decks whose fonts lack a usable encoding yield less text
//! than pdfium would. Encrypted decks are rejected.

use crate::engine::{check_page, Deck, PdfEngine};
use crate::error::SegmentError;
use crate::output::PageRange;
use lopdf::Document;
use tracing::debug;

/// Stateless lopdf engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfEngine;

/// A deck parsed into lopdf's object model.
#[derive(Debug, Clone)]
pub struct LopdfDeck {
    document: Document,
}

impl Deck for LopdfDeck {
    fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    fn page_text(&self, page: usize) -> Result<String, SegmentError> {
        check_page(page, self.page_count())?;
        self.document
            .extract_text(&[page as u32])
            .map_err(|e| SegmentError::PageExtraction {
                page,
                detail: e.to_string(),
            })
    }

    fn remove_page(&mut self, page: usize) -> Result<(), SegmentError> {
        check_page(page, self.page_count()).map_err(|e| SegmentError::PageRemoval {
            page,
            detail: e.to_string(),
        })?;
        self.document.delete_pages(&[page as u32]);
        Ok(())
    }

    fn to_bytes(&mut self) -> Result<Vec<u8>, SegmentError> {
        self.document.prune_objects();
        let mut buf = Vec::new();
        self.document
            .save_to(&mut buf)
            .map_err(|e| SegmentError::DocumentWrite {
                detail: e.to_string(),
            })?;
        Ok(buf)
    }
}

impl PdfEngine for LopdfEngine {
    type Document<'a>
        = LopdfDeck
    where
        Self: 'a;

    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn load<'a>(&'a self, bytes: &'a [u8]) -> Result<LopdfDeck, SegmentError> {
        let document = Document::load_mem(bytes).map_err(|e| SegmentError::DocumentLoad {
            detail: e.to_string(),
        })?;

        if document.is_encrypted() {
            return Err(SegmentError::DocumentLoad {
                detail: "encrypted documents require the pdfium backend".into(),
            });
        }

        Ok(LopdfDeck { document })
    }

    fn extract_range<'a>(
        &'a self,
        source: &LopdfDeck,
        range: PageRange,
    ) -> Result<LopdfDeck, SegmentError> {
        let total = source.page_count();
        let outside: Vec<u32> = (1..=total)
            .filter(|p| !range.contains(*p))
            .map(|p| p as u32)
            .collect();

        let mut document = source.document.clone();
        document.delete_pages(&outside);
        document.prune_objects();

        let extracted = LopdfDeck { document };
        if extracted.page_count() != range.len() {
            return Err(SegmentError::RangeExtraction {
                start: range.start,
                end: range.end,
                detail: format!(
                    "expected {} pages, page tree has {}",
                    range.len(),
                    extracted.page_count()
                ),
            });
        }

        debug!(
            "Extracted pages {}-{} ({} removed)",
            range.start,
            range.end,
            outside.len()
        );
        Ok(extracted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Object};

    fn blank_deck(pages: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let kids: Vec<Object> = (0..pages)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), 842.into(), 595.into()],
                })
                .into()
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
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

    #[test]
    fn remove_page_rejects_out_of_range() {
        let bytes = blank_deck(2);
        let mut deck = LopdfEngine.load(&bytes).unwrap();

        for page in [0, 3] {
            match deck.remove_page(page) {
                Err(SegmentError::PageRemoval { page: p, detail }) => {
                    assert_eq!(p, page);
                    assert!(detail.contains("2 pages"), "got: {detail}");
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(deck.page_count(), 2);
    }

    #[test]
    fn remove_page_shifts_later_pages() {
        let bytes = blank_deck(3);
        let mut deck = LopdfEngine.load(&bytes).unwrap();
        deck.remove_page(2).unwrap();
        assert_eq!(deck.page_count(), 2);
    }

    #[test]
    fn extract_range_is_independent_copy() {
        let bytes = blank_deck(4);
        let source = LopdfEngine.load(&bytes).unwrap();
        let mut unit = LopdfEngine
            .extract_range(&source, PageRange::new(2, 3))
            .unwrap();
        assert_eq!(unit.page_count(), 2);
        unit.remove_page(1).unwrap();
        assert_eq!(unit.page_count(), 1);
        assert_eq!(source.page_count(), 4);
    }
}
