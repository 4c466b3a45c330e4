//! Boundary resolution: turn outline hits into contiguous page ranges.
//!
//! Boundaries are discovered while scanning forward, so a unit's end page is
//! not known when the unit is opened. Each new unit starts provisionally
//! running to the last page; opening the next unit closes the previous one
//! at the page before. The last unit keeps `total_pages` as its end.

use crate::output::PageRange;

/// One resolved unit: 1-based ordinal, name and inclusive page range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitBoundary {
    pub ordinal: usize,
    pub name: String,
    pub start_page: usize,
    pub end_page: usize,
}

impl UnitBoundary {
    pub fn range(&self) -> PageRange {
        PageRange::new(self.start_page, self.end_page)
    }
}

/// Ordered boundary records, updated in place as outline pages are found.
#[derive(Debug)]
pub struct BoundaryResolver {
    total_pages: usize,
    boundaries: Vec<UnitBoundary>,
}

impl BoundaryResolver {
    pub fn new(total_pages: usize) -> Self {
        Self {
            total_pages,
            boundaries: Vec::new(),
        }
    }

    /// Open a unit whose outline page is `page`, closing the previous unit.
    ///
    /// The first unit always starts at page 1 so that title slides before the
    /// first outline belong to it. Pages must be passed in increasing order.
    /// Returns the new unit's ordinal.
    pub fn open_unit(&mut self, name: String, page: usize) -> usize {
        let ordinal = self.boundaries.len() + 1;
        let start_page = if ordinal == 1 { 1 } else { page };

        if let Some(previous) = self.boundaries.last_mut() {
            previous.end_page = page - 1;
            tracing::debug!(
                "Closed unit {} at page {}",
                previous.ordinal,
                previous.end_page
            );
        }

        self.boundaries.push(UnitBoundary {
            ordinal,
            name,
            start_page,
            end_page: self.total_pages,
        });
        ordinal
    }

    /// Number of units opened so far.
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    pub fn boundaries(&self) -> &[UnitBoundary] {
        &self.boundaries
    }

    /// Fix all boundaries and return them in ordinal order.
    pub fn finish(self) -> Vec<UnitBoundary> {
        self.boundaries
    }
}
