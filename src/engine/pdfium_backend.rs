//! PDFium engine via `pdfium-render`.
//!
//! pdfium is not async-safe: every call here is blocking, and the async entry
//! points in [`crate::segment`] move the whole request onto
//! `tokio::task::spawn_blocking`. A [`PdfiumEngine`] is created per request,
//! inside that blocking task.

use crate::engine::{check_page, Deck, PdfEngine};
use crate::error::SegmentError;
use crate::output::PageRange;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an existing pdfium library (file or directory).
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Engine backed by a bound pdfium library.
pub struct PdfiumEngine {
    pdfium: Pdfium,
    password: Option<String>,
}

impl PdfiumEngine {
    /// Bind pdfium and build an engine.
    ///
    /// Discovery order:
    /// 1. `library` (file, or directory holding the platform library)
    /// 2. `PDFIUM_LIB_PATH` env var
    /// 3. System library search paths
    pub fn new(library: Option<&Path>, password: Option<String>) -> Result<Self, SegmentError> {
        let explicit = library
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(PDFIUM_LIB_PATH_ENV).map(PathBuf::from));

        let bindings = match explicit {
            Some(path) => {
                let lib_path = if path.is_dir() {
                    PathBuf::from(Pdfium::pdfium_platform_library_name_at_path(
                        path.to_string_lossy().as_ref(),
                    ))
                } else {
                    path
                };
                debug!("Binding pdfium from {}", lib_path.display());
                Pdfium::bind_to_library(&lib_path).map_err(|e| {
                    SegmentError::PdfiumBindingFailed(format!("{}: {e:?}", lib_path.display()))
                })?
            }
            None => Pdfium::bind_to_system_library()
                .map_err(|e| SegmentError::PdfiumBindingFailed(format!("{e:?}")))?,
        };

        Ok(Self {
            pdfium: Pdfium::new(bindings),
            password,
        })
    }
}

/// A deck held open by pdfium. Dropping it closes the pdfium document.
pub struct PdfiumDeck<'a> {
    document: PdfDocument<'a>,
}

fn page_index(page: usize) -> PdfPageIndex {
    (page - 1) as PdfPageIndex
}

impl Deck for PdfiumDeck<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_text(&self, page: usize) -> Result<String, SegmentError> {
        check_page(page, self.page_count())?;

        let pdf_page = self
            .document
            .pages()
            .get(page_index(page))
            .map_err(|e| SegmentError::PageExtraction {
                page,
                detail: format!("{e:?}"),
            })?;

        let text = pdf_page.text().map_err(|e| SegmentError::PageExtraction {
            page,
            detail: format!("{e:?}"),
        })?;

        Ok(text.all())
    }

    fn remove_page(&mut self, page: usize) -> Result<(), SegmentError> {
        check_page(page, self.page_count()).map_err(|e| SegmentError::PageRemoval {
            page,
            detail: e.to_string(),
        })?;

        self.document
            .pages()
            .get(page_index(page))
            .and_then(|p| p.delete())
            .map_err(|e| SegmentError::PageRemoval {
                page,
                detail: format!("{e:?}"),
            })
    }

    fn to_bytes(&mut self) -> Result<Vec<u8>, SegmentError> {
        self.document
            .save_to_bytes()
            .map_err(|e| SegmentError::DocumentWrite {
                detail: format!("{e:?}"),
            })
    }
}

impl PdfEngine for PdfiumEngine {
    type Document<'a>
        = PdfiumDeck<'a>
    where
        Self: 'a;

    fn name(&self) -> &'static str {
        "pdfium"
    }

    fn load<'a>(&'a self, bytes: &'a [u8]) -> Result<PdfiumDeck<'a>, SegmentError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, self.password.as_deref())
            .map_err(|e| {
                let err_str = format!("{e:?}");
                if err_str.contains("Password") || err_str.contains("password") {
                    if self.password.is_some() {
                        SegmentError::WrongPassword
                    } else {
                        SegmentError::PasswordRequired
                    }
                } else {
                    SegmentError::DocumentLoad { detail: err_str }
                }
            })?;

        Ok(PdfiumDeck { document })
    }

    fn extract_range<'a>(
        &'a self,
        source: &PdfiumDeck<'a>,
        range: PageRange,
    ) -> Result<PdfiumDeck<'a>, SegmentError> {
        let range_err = |e: PdfiumError| SegmentError::RangeExtraction {
            start: range.start,
            end: range.end,
            detail: format!("{e:?}"),
        };

        let mut document = self.pdfium.create_new_pdf().map_err(range_err)?;
        document
            .pages_mut()
            .copy_page_range_from_document(
                &source.document,
                page_index(range.start)..=page_index(range.end),
                0,
            )
            .map_err(range_err)?;

        Ok(PdfiumDeck { document })
    }
}
