//! Document splitting: cut one confirmed page range into its own PDF.

use crate::engine::{Deck, PdfEngine};
use crate::error::SegmentError;
use crate::output::PageRange;
use crate::pipeline::breaks::BreakSlideFilter;
use tracing::debug;

/// A serialised unit document.
#[derive(Debug, Clone)]
pub struct SplitUnit {
    /// PDF bytes with the title overridden.
    pub bytes: Vec<u8>,
    /// Pages in the unit after break removal.
    pub page_count: usize,
    /// Unit-relative page number of the removed break slide, if any.
    pub removed_break: Option<usize>,
}

/// Cuts page ranges out of a loaded source deck.
pub struct DocumentSplitter<'a, E: PdfEngine> {
    engine: &'a E,
}

impl<'a, E: PdfEngine> DocumentSplitter<'a, E> {
    pub fn new(engine: &'a E) -> Self {
        Self { engine }
    }

    /// Produce the unit for `range` of `source`, titled `title`.
    ///
    /// The range is copied into a new deck, the optional break filter runs on
    /// that copy, and the copy is serialised and retitled. The source is never
    /// modified. The intermediate deck is dropped before returning on every
    /// path.
    pub fn split(
        &self,
        source: &E::Document<'a>,
        range: PageRange,
        title: &str,
        break_filter: Option<&BreakSlideFilter<'_>>,
    ) -> Result<SplitUnit, SegmentError> {
        let mut unit = self.engine.extract_range(source, range)?;

        let removed_break = match break_filter {
            Some(filter) => filter.apply(&mut unit)?,
            None => None,
        };

        let page_count = unit.page_count();
        let raw = unit.to_bytes()?;
        drop(unit);

        let bytes = self.engine.retitle(raw, title)?;
        debug!(
            "Split pages {}-{} into '{}' ({} pages, {} bytes)",
            range.start,
            range.end,
            title,
            page_count,
            bytes.len()
        );

        Ok(SplitUnit {
            bytes,
            page_count,
            removed_break,
        })
    }
}
