//! Document engines: the capabilities the segmentation pipeline consumes.
//!
//! The pipeline never touches a PDF library directly. It sees a loaded deck
//! through [`Deck`] (page count, per-page text, page removal, serialisation)
//! and obtains decks through [`PdfEngine`] (load from bytes, copy a page
//! range into a new independent deck).
//!
//! Two engines ship:
//!
//! | Engine | Crate | Notes |
//! |--------|-------|-------|
//! | [`PdfiumEngine`] | pdfium-render | Default. Needs libpdfium at runtime, opens encrypted decks |
//! | [`LopdfEngine`]  | lopdf | Pure Rust, no native dependency |
//!
//! Decks are RAII handles: dropping one releases the underlying document,
//! so every exit path of a request (including `?` early returns) closes what
//! it opened.

pub mod lopdf_backend;
pub mod pdfium_backend;

pub use lopdf_backend::LopdfEngine;
pub use pdfium_backend::PdfiumEngine;

use crate::error::SegmentError;
use crate::output::PageRange;

/// A loaded, page-addressable document. Pages are 1-based.
pub trait Deck {
    /// Number of pages currently in the deck.
    fn page_count(&self) -> usize;

    /// Plain text of page `page`.
    ///
    /// Fails with [`SegmentError::PageExtraction`]; never returns partial text.
    fn page_text(&self, page: usize) -> Result<String, SegmentError>;

    /// Remove page `page`; later pages shift down by one.
    fn remove_page(&mut self, page: usize) -> Result<(), SegmentError>;

    /// Serialise the deck to PDF bytes.
    fn to_bytes(&mut self) -> Result<Vec<u8>, SegmentError>;
}

/// Loads decks and cuts page ranges out of them.
pub trait PdfEngine {
    /// The deck type; may borrow from the engine and the source bytes.
    type Document<'a>: Deck
    where
        Self: 'a;

    /// Short engine name for logs.
    fn name(&self) -> &'static str;

    /// Parse `bytes` into a deck.
    ///
    /// Fails with [`SegmentError::DocumentLoad`] (or a password error).
    fn load<'a>(&'a self, bytes: &'a [u8]) -> Result<Self::Document<'a>, SegmentError>;

    /// Copy pages `range` of `source` into a new deck.
    ///
    /// The result shares nothing with `source`: either can be modified or
    /// dropped without affecting the other. `range` must already be validated
    /// against `source.page_count()`.
    fn extract_range<'a>(
        &'a self,
        source: &Self::Document<'a>,
        range: PageRange,
    ) -> Result<Self::Document<'a>, SegmentError>;

    /// Override the title of a serialised document.
    ///
    /// Both shipped engines rewrite `/Info` with lopdf; see [`crate::metadata`].
    fn retitle(&self, bytes: Vec<u8>, title: &str) -> Result<Vec<u8>, SegmentError> {
        crate::metadata::set_title(&bytes, title)
    }
}

/// Guard used by engines before indexing into a deck.
pub(crate) fn check_page(page: usize, total: usize) -> Result<(), SegmentError> {
    if page == 0 || page > total {
        return Err(SegmentError::PageExtraction {
            page,
            detail: format!("page out of range (document has {total} pages)"),
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory engine for pipeline unit tests.
    //!
    //! A deck is a list of page texts; "bytes" are the texts joined with a
    //! form feed, optionally preceded by `title` and `\u{1}` once retitled.
    //! Pages whose text is `"<corrupt>"` fail extraction.

    use super::*;

    pub const CORRUPT: &str = "<corrupt>";

    #[derive(Debug, Clone, PartialEq)]
    pub struct MemoryDeck {
        pub pages: Vec<String>,
    }

    impl MemoryDeck {
        pub fn new<S: Into<String>>(pages: impl IntoIterator<Item = S>) -> Self {
            Self {
                pages: pages.into_iter().map(Into::into).collect(),
            }
        }

        pub fn encode(&self) -> Vec<u8> {
            self.pages.join("\u{c}").into_bytes()
        }

        pub fn decode(bytes: &[u8]) -> Self {
            Self::decode_titled(bytes).1
        }

        pub fn decode_titled(bytes: &[u8]) -> (Option<String>, Self) {
            let text = String::from_utf8_lossy(bytes);
            let (title, body) = match text.split_once('\u{1}') {
                Some((t, b)) => (Some(t.to_string()), b),
                None => (None, &*text),
            };
            if body.is_empty() {
                return (title, Self { pages: Vec::new() });
            }
            (title, Self::new(body.split('\u{c}')))
        }
    }

    impl Deck for MemoryDeck {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn page_text(&self, page: usize) -> Result<String, SegmentError> {
            check_page(page, self.pages.len())?;
            let text = &self.pages[page - 1];
            if text == CORRUPT {
                return Err(SegmentError::PageExtraction {
                    page,
                    detail: "corrupt content stream".into(),
                });
            }
            Ok(text.clone())
        }

        fn remove_page(&mut self, page: usize) -> Result<(), SegmentError> {
            check_page(page, self.pages.len()).map_err(|e| SegmentError::PageRemoval {
                page,
                detail: e.to_string(),
            })?;
            self.pages.remove(page - 1);
            Ok(())
        }

        fn to_bytes(&mut self) -> Result<Vec<u8>, SegmentError> {
            Ok(self.encode())
        }
    }

    /// Engine over [`MemoryDeck`]. `fail_extract_from` makes `extract_range`
    /// fail for ranges starting at that page.
    #[derive(Debug, Default)]
    pub struct MemoryEngine {
        pub fail_extract_from: Option<usize>,
    }

    impl PdfEngine for MemoryEngine {
        type Document<'a>
            = MemoryDeck
        where
            Self: 'a;

        fn name(&self) -> &'static str {
            "memory"
        }

        fn load<'a>(&'a self, bytes: &'a [u8]) -> Result<MemoryDeck, SegmentError> {
            if bytes.starts_with(b"%garbage") {
                return Err(SegmentError::DocumentLoad {
                    detail: "unparseable".into(),
                });
            }
            Ok(MemoryDeck::decode(bytes))
        }

        fn extract_range<'a>(
            &'a self,
            source: &MemoryDeck,
            range: PageRange,
        ) -> Result<MemoryDeck, SegmentError> {
            if self.fail_extract_from == Some(range.start) {
                return Err(SegmentError::RangeExtraction {
                    start: range.start,
                    end: range.end,
                    detail: "injected failure".into(),
                });
            }
            Ok(MemoryDeck {
                pages: source.pages[range.start - 1..range.end].to_vec(),
            })
        }

        fn retitle(&self, bytes: Vec<u8>, title: &str) -> Result<Vec<u8>, SegmentError> {
            let mut out = format!("{title}\u{1}").into_bytes();
            out.extend_from_slice(&bytes);
            Ok(out)
        }
    }
}
