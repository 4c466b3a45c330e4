//! Break-slide removal for one extracted unit.
//!
//! Runs on the unit's own sub-document, never on the full deck. The first
//! page whose text contains a break marker is removed and the scan stops, so
//! at most one page goes per unit.

use crate::config::SegmentationConfig;
use crate::engine::Deck;
use crate::error::SegmentError;
use tracing::{debug, warn};

pub struct BreakSlideFilter<'c> {
    config: &'c SegmentationConfig,
}

impl<'c> BreakSlideFilter<'c> {
    pub fn new(config: &'c SegmentationConfig) -> Self {
        Self { config }
    }

    /// Remove the first break page of `deck`.
    ///
    /// Returns the removed page number (in the unit's own numbering), or
    /// `None` when no page matched. Extraction failures surface as
    /// [`SegmentError::BreakSlideScan`].
    pub fn apply<D: Deck>(&self, deck: &mut D) -> Result<Option<usize>, SegmentError> {
        let total = deck.page_count();

        for page in 1..=total {
            let text = deck.page_text(page).map_err(|e| match e {
                SegmentError::PageExtraction { page, detail } => {
                    SegmentError::BreakSlideScan { page, detail }
                }
                other => other,
            })?;

            if self.config.is_break_text(&text) {
                deck.remove_page(page)?;
                debug!("Removed break slide at unit page {}", page);
                if total == 1 {
                    warn!("Break slide was the only page of its unit; unit is now empty");
                }
                return Ok(Some(page));
            }
        }

        Ok(None)
    }
}
