//! Input resolution: read a deck from disk and check it looks like a PDF.
//!
//! Both engines fail with opaque parser messages on non-PDF input, so the
//! `%PDF` header is checked up front to give callers a clear
//! [`SegmentError::NotAPdf`].

use crate::error::SegmentError;
use std::path::Path;
use tracing::debug;

const PDF_MAGIC: &[u8] = b"%PDF";

/// Check that `bytes` start with the `%PDF` header.
pub fn ensure_pdf_magic(bytes: &[u8]) -> Result<(), SegmentError> {
    if bytes.starts_with(PDF_MAGIC) {
        Ok(())
    } else {
        Err(SegmentError::NotAPdf {
            magic: bytes.iter().take(PDF_MAGIC.len()).copied().collect(),
        })
    }
}

/// Read a local PDF into memory, validating existence, permissions and header.
pub fn read_pdf(path: impl AsRef<Path>) -> Result<Vec<u8>, SegmentError> {
    let path = path.as_ref();

    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(SegmentError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(SegmentError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    };

    ensure_pdf_magic(&bytes)?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}
