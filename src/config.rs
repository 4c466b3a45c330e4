//! Configuration types for deck segmentation.
//!
//! All detect/split behaviour is controlled through [`SegmentationConfig`],
//! built via its [`SegmentationConfigBuilder`]. The config carries no document
//! state, so one instance can be shared by any number of concurrent requests.

use crate::error::SegmentError;
use crate::progress::SplitProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Marker tokens that identify an outline slide.
pub const DEFAULT_OUTLINE_MARKERS: &[&str] = &["Outline", "Gliederung"];

/// Marker tokens that identify a break (filler) slide.
pub const DEFAULT_BREAK_MARKERS: &[&str] = &["Break", "Pause"];

/// Configuration for detect and split requests.
///
/// Built via [`SegmentationConfig::builder()`] or using
/// [`SegmentationConfig::default()`].
///
/// # Example
/// ```rust
/// use slidecut::{Backend, SegmentationConfig};
///
/// let config = SegmentationConfig::builder()
///     .backend(Backend::Lopdf)
///     .outline_markers(["Agenda", "Outline"])
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct SegmentationConfig {
    /// Document engine used to read and cut decks. Default: [`Backend::Pdfium`].
    pub backend: Backend,

    /// Explicit path to the pdfium shared library.
    ///
    /// When `None`, `PDFIUM_LIB_PATH` is consulted and then the system library
    /// search path. Ignored by [`Backend::Lopdf`].
    pub pdfium_library: Option<PathBuf>,

    /// User password for encrypted decks (pdfium only).
    pub password: Option<String>,

    /// A page whose text contains any of these tokens is an outline page.
    /// Matching is a case-sensitive substring test.
    pub outline_markers: Vec<String>,

    /// A page whose text contains any of these tokens is a break page.
    pub break_markers: Vec<String>,

    /// Per-unit progress events during split. Default: None.
    pub progress_callback: Option<Arc<dyn SplitProgressCallback>>,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            pdfium_library: None,
            password: None,
            outline_markers: DEFAULT_OUTLINE_MARKERS.iter().map(|s| s.to_string()).collect(),
            break_markers: DEFAULT_BREAK_MARKERS.iter().map(|s| s.to_string()).collect(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SegmentationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentationConfig")
            .field("backend", &self.backend)
            .field("pdfium_library", &self.pdfium_library)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("outline_markers", &self.outline_markers)
            .field("break_markers", &self.break_markers)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn SplitProgressCallback>"),
            )
            .finish()
    }
}

impl SegmentationConfig {
    /// Create a new builder for `SegmentationConfig`.
    pub fn builder() -> SegmentationConfigBuilder {
        SegmentationConfigBuilder {
            config: Self::default(),
        }
    }

    /// True if `text` contains any outline marker.
    pub fn is_outline_text(&self, text: &str) -> bool {
        contains_any(text, &self.outline_markers)
    }

    /// True if `text` contains any break marker.
    pub fn is_break_text(&self, text: &str) -> bool {
        contains_any(text, &self.break_markers)
    }
}

fn contains_any(text: &str, markers: &[String]) -> bool {
    markers.iter().any(|m| text.contains(m.as_str()))
}

/// Builder for [`SegmentationConfig`].
#[derive(Debug)]
pub struct SegmentationConfigBuilder {
    config: SegmentationConfig,
}

impl SegmentationConfigBuilder {
    pub fn backend(mut self, backend: Backend) -> Self {
        self.config.backend = backend;
        self
    }

    pub fn pdfium_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library = Some(path.into());
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    /// Replace the outline marker list.
    pub fn outline_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.outline_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the break marker list.
    pub fn break_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.break_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    pub fn progress_callback(mut self, cb: Arc<dyn SplitProgressCallback>) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SegmentationConfig, SegmentError> {
        validate_markers("outline", &self.config.outline_markers)?;
        validate_markers("break", &self.config.break_markers)?;
        Ok(self.config)
    }
}

fn validate_markers(kind: &str, markers: &[String]) -> Result<(), SegmentError> {
    if markers.is_empty() {
        return Err(SegmentError::InvalidConfig(format!(
            "at least one {kind} marker is required"
        )));
    }
    if markers.iter().any(|m| m.is_empty()) {
        return Err(SegmentError::InvalidConfig(format!(
            "{kind} markers must not be empty strings"
        )));
    }
    Ok(())
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which document engine reads and cuts the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Google PDFium via pdfium-render (default). Needs the shared library at runtime.
    #[default]
    Pdfium,
    /// Pure-Rust lopdf engine. No native dependency; no encrypted decks.
    Lopdf,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Pdfium => f.write_str("pdfium"),
            Backend::Lopdf => f.write_str("lopdf"),
        }
    }
}
