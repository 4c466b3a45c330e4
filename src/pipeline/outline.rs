//! Outline detection: find outline pages and derive unit names from them.
//!
//! Lecture decks repeat a cumulative outline slide at the start of every
//! unit. The k-th outline page (k is 1-based) lists the units seen so far and
//! the one being introduced, so the new unit's title is the line at
//! zero-based index `k + 1` of that page's text. This positional rule is
//! taken literally. When a page does not have that many lines the scan fails
//! with [`SegmentError::OutlineNameMissing`] rather than picking some other
//! line.

use crate::config::SegmentationConfig;
use crate::engine::Deck;
use crate::error::SegmentError;
use crate::pipeline::boundary::{BoundaryResolver, UnitBoundary};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static RE_LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").unwrap());

/// Everything except letters, digits, space, parentheses, underscore, hyphen.
static RE_DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N} ()_-]").unwrap());

/// A leading list label such as `2)` or `(2)`.
static RE_ENUMERATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(?\d+\)\s*").unwrap());

/// Split page text on `\r\n`, `\r` or `\n`. Trailing empty lines are dropped.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = RE_LINE_BREAK.split(text).collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Reduce a raw outline line to a unit name.
///
/// Disallowed characters are removed, then a leading list label, then
/// surrounding spaces. A label is only removed when text remains after it.
///
/// ```rust
/// use slidecut::pipeline::outline::sanitize_unit_name;
///
/// assert_eq!(sanitize_unit_name("2) Intro to Testing!!"), "Intro to Testing");
/// assert_eq!(sanitize_unit_name("\t  Sorting & Searching"), "Sorting  Searching");
/// ```
pub fn sanitize_unit_name(raw: &str) -> String {
    let kept = RE_DISALLOWED.replace_all(raw, "");
    let kept = kept.trim_start();
    let unlabelled = RE_ENUMERATOR.replace(kept, "");
    if unlabelled.trim().is_empty() {
        kept.trim().to_string()
    } else {
        unlabelled.trim().to_string()
    }
}

/// Derive the unit name from the text of the `occurrence`-th outline page.
pub fn unit_name_from_outline(
    text: &str,
    occurrence: usize,
    page: usize,
) -> Result<String, SegmentError> {
    let lines = split_lines(text);
    let raw = lines
        .get(occurrence + 1)
        .ok_or(SegmentError::OutlineNameMissing {
            page,
            occurrence,
            line_count: lines.len(),
        })?;
    Ok(sanitize_unit_name(raw))
}

/// Scans a deck's pages in order and feeds outline hits to a resolver.
pub struct OutlineDetector<'c> {
    config: &'c SegmentationConfig,
}

impl<'c> OutlineDetector<'c> {
    pub fn new(config: &'c SegmentationConfig) -> Self {
        Self { config }
    }

    /// Scan every page of `deck` and return the resolved unit boundaries.
    ///
    /// The deck is only read. Any page whose text cannot be extracted aborts
    /// the scan.
    pub fn detect<D: Deck>(&self, deck: &D) -> Result<Vec<UnitBoundary>, SegmentError> {
        let total_pages = deck.page_count();
        let mut resolver = BoundaryResolver::new(total_pages);

        for page in 1..=total_pages {
            let text = deck.page_text(page)?;
            if !self.config.is_outline_text(&text) {
                continue;
            }

            let occurrence = resolver.len() + 1;
            let name = unit_name_from_outline(&text, occurrence, page)?;
            if name.is_empty() {
                warn!(
                    "Outline page {} (occurrence {}) yields an empty unit name",
                    page, occurrence
                );
            }
            debug!("Outline #{} on page {}: '{}'", occurrence, page, name);
            resolver.open_unit(name, page);
        }

        Ok(resolver.finish())
    }
}
