//! Error types for the slidecut library.
//!
//! Every failure is fatal for the request that raised it: a detect or split
//! call either returns its complete result or a single [`SegmentError`].
//! There is no partial result type. When one unit of a split batch fails, the
//! cause is wrapped in [`SegmentError::UnitFailed`] so the caller still sees
//! which unit broke and why.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the slidecut library.
#[derive(Debug, Error)]
pub enum SegmentError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The bytes do not start with the `%PDF` header.
    #[error("Input is not a PDF document\nFirst bytes: {magic:?}")]
    NotAPdf { magic: Vec<u8> },

    // ── Document errors ───────────────────────────────────────────────────
    /// The bytes could not be parsed as a document.
    #[error("Failed to load document: {detail}")]
    DocumentLoad { detail: String },

    /// The deck is encrypted and no password was configured.
    #[error("Document is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired,

    /// A password was configured but it does not open the deck.
    #[error("Wrong password for encrypted document")]
    WrongPassword,

    /// Text extraction failed for one page.
    #[error("Text extraction failed for page {page}: {detail}")]
    PageExtraction { page: usize, detail: String },

    /// Text extraction failed while looking for a break slide.
    #[error("Break-slide scan failed on page {page}: {detail}")]
    BreakSlideScan { page: usize, detail: String },

    /// The k-th outline page has no line at index `k + 1` to name the unit.
    #[error(
        "Outline page {page} (occurrence {occurrence}) has only {line_count} lines; \
         expected the unit name on line {}",
        .occurrence + 2
    )]
    OutlineNameMissing {
        page: usize,
        occurrence: usize,
        line_count: usize,
    },

    /// A confirmed unit range is empty, reversed, or outside the deck.
    #[error("Unit '{unit}' has invalid page range {start}-{end} (document has {total} pages)")]
    SplitRangeInvalid {
        unit: String,
        start: usize,
        end: usize,
        total: usize,
    },

    /// A page could not be removed from an extracted unit.
    #[error("Failed to remove page {page}: {detail}")]
    PageRemoval { page: usize, detail: String },

    /// A page range could not be copied into a new document.
    #[error("Failed to extract pages {start}-{end}: {detail}")]
    RangeExtraction {
        start: usize,
        end: usize,
        detail: String,
    },

    /// Serialising a document to bytes failed.
    #[error("Failed to serialise document: {detail}")]
    DocumentWrite { detail: String },

    /// Rewriting the document information dictionary failed.
    #[error("Failed to update document metadata: {detail}")]
    Metadata { detail: String },

    /// One unit of a split batch failed; the whole batch is discarded.
    #[error("Unit {ordinal} ('{name}') failed: {source}")]
    UnitFailed {
        ordinal: usize,
        name: String,
        #[source]
        source: Box<SegmentError>,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write a unit file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Install pdfium system-wide so it is found on the library search path.\n\
  • Use the pure-Rust engine with --backend lopdf.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SegmentError {
    /// Wrap this error as the failure of unit `ordinal`.
    pub fn in_unit(self, ordinal: usize, name: impl Into<String>) -> Self {
        SegmentError::UnitFailed {
            ordinal,
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// The innermost cause, skipping [`SegmentError::UnitFailed`] wrappers.
    pub fn root_cause(&self) -> &SegmentError {
        match self {
            SegmentError::UnitFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn split_range_display() {
        let e = SegmentError::SplitRangeInvalid {
            unit: "Sorting".into(),
            start: 7,
            end: 3,
            total: 10,
        };
        let msg = e.to_string();
        assert!(msg.contains("Sorting"), "got: {msg}");
        assert!(msg.contains("7-3"), "got: {msg}");
        assert!(msg.contains("10 pages"), "got: {msg}");
    }

    #[test]
    fn outline_name_missing_reports_expected_line() {
        let e = SegmentError::OutlineNameMissing {
            page: 4,
            occurrence: 2,
            line_count: 3,
        };
        let msg = e.to_string();
        assert!(msg.contains("page 4"), "got: {msg}");
        assert!(msg.contains("line 4"), "got: {msg}");
    }

    #[test]
    fn unit_failed_keeps_source() {
        let e = SegmentError::PageExtraction {
            page: 2,
            detail: "bad stream".into(),
        }
        .in_unit(2, "Sorting");

        assert!(e.to_string().contains("Unit 2 ('Sorting')"));
        let source = e.source().expect("source should be preserved");
        assert!(source.to_string().contains("page 2"));
        assert!(matches!(
            e.root_cause(),
            SegmentError::PageExtraction { page: 2, .. }
        ));
    }
}
