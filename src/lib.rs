//! # slidecut
//!
//! Split lecture slide decks into per-unit PDFs.
//!
//! Lecture decks usually repeat an outline slide at the start of every
//! teaching unit. This crate finds those outline pages, proposes a unit per
//! outline (name plus page range) for a human to confirm or edit, then cuts
//! the deck into one PDF per confirmed unit, optionally dropping a break
//! slide from each.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ detect  outline scan → boundary resolution → DetectionReport
//!  │          (human confirms / edits → SplitSpec)
//!  └─ split   per unit: copy range → drop break slide → serialise → set title
//!                                                               → UnitBundle
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use slidecut::{detect_file, split_file, write_bundles, SegmentationConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SegmentationConfig::default();
//!     let report = detect_file("lecture.pdf", &config)?;
//!     for unit in &report.units {
//!         println!("{}: pages {}-{}", unit.unit_name, unit.start_page, unit.end_page);
//!     }
//!
//!     let spec = report.into_split_spec(true);
//!     let bundles = split_file("lecture.pdf", &spec, &config)?;
//!     write_bundles("units", &bundles)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `slidecut` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! slidecut = { version = "0.1", default-features = false }
//! ```
//!
//! ## Engines
//!
//! The default [`Backend::Pdfium`] needs the pdfium shared library at runtime
//! (see [`engine::pdfium_backend`]). [`Backend::Lopdf`] is pure Rust and needs
//! nothing installed, but cannot open encrypted decks.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod segment;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{Backend, SegmentationConfig, SegmentationConfigBuilder};
pub use engine::{Deck, LopdfEngine, PdfEngine, PdfiumEngine};
pub use error::SegmentError;
pub use output::{
    write_bundles, AttachmentType, BundleManifestEntry, DetectedUnit, DetectionReport, PageRange,
    SplitSpec, UnitBundle, UnitSplit,
};
pub use progress::{NoopProgressCallback, ProgressCallback, SplitProgressCallback};
pub use segment::{
    detect, detect_async, detect_file, detect_with, split, split_async, split_file, split_with,
};
