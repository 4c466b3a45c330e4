//! Detect and split entry points.
//!
//! Each request loads the source deck once, uses it for that single operation
//! and drops it before returning. Nothing is cached between requests.
//!
//! The generic [`detect_with`] / [`split_with`] run against any
//! [`PdfEngine`]. [`detect`] / [`split`] pick the engine from
//! [`SegmentationConfig::backend`]; the `_async` variants move that work onto
//! a blocking worker, and the `_file` variants read the deck from disk first.

use crate::config::{Backend, SegmentationConfig};
use crate::engine::{Deck, LopdfEngine, PdfEngine, PdfiumEngine};
use crate::error::SegmentError;
use crate::input::{ensure_pdf_magic, read_pdf};
use crate::output::{DetectedUnit, DetectionReport, SplitSpec, UnitBundle};
use crate::pipeline::assemble::UnitAssembler;
use crate::pipeline::outline::OutlineDetector;
use chrono::Utc;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Propose unit boundaries for the deck in `bytes` using `engine`.
///
/// Every proposed unit carries the same suggested release date: the time of
/// this request. `removeBreakSlides` is always `false` in the report.
pub fn detect_with<E: PdfEngine>(
    engine: &E,
    bytes: &[u8],
    config: &SegmentationConfig,
) -> Result<DetectionReport, SegmentError> {
    let started = Instant::now();
    info!("Detecting units ({} bytes, {} engine)", bytes.len(), engine.name());

    let deck = engine.load(bytes)?;
    let number_of_pages = deck.page_count();
    let boundaries = OutlineDetector::new(config).detect(&deck)?;
    drop(deck);

    let release_date = Utc::now();
    let units: Vec<DetectedUnit> = boundaries
        .into_iter()
        .map(|b| DetectedUnit {
            unit_name: b.name,
            release_date,
            start_page: b.start_page,
            end_page: b.end_page,
        })
        .collect();

    if units.is_empty() {
        warn!("No outline pages found in {} pages", number_of_pages);
    }
    info!(
        "Detected {} units in {} pages ({}ms)",
        units.len(),
        number_of_pages,
        started.elapsed().as_millis()
    );

    Ok(DetectionReport {
        units,
        number_of_pages,
        remove_break_slides: false,
    })
}

/// Cut the deck in `bytes` into the units of `spec` using `engine`.
///
/// All-or-nothing: on error no bundle is returned.
pub fn split_with<E: PdfEngine>(
    engine: &E,
    bytes: &[u8],
    spec: &SplitSpec,
    config: &SegmentationConfig,
) -> Result<Vec<UnitBundle>, SegmentError> {
    let started = Instant::now();
    info!(
        "Splitting into {} units ({} bytes, {} engine, break removal {})",
        spec.units.len(),
        bytes.len(),
        engine.name(),
        if spec.remove_break_slides { "on" } else { "off" }
    );

    let source = engine.load(bytes)?;
    let bundles = UnitAssembler::new(engine, config).assemble(&source, spec)?;
    drop(source);

    info!(
        "Split produced {} units, {} bytes total ({}ms)",
        bundles.len(),
        bundles.iter().map(UnitBundle::byte_length).sum::<usize>(),
        started.elapsed().as_millis()
    );
    Ok(bundles)
}

/// [`detect_with`] on the engine selected by `config.backend`.
pub fn detect(bytes: &[u8], config: &SegmentationConfig) -> Result<DetectionReport, SegmentError> {
    ensure_pdf_magic(bytes)?;
    match config.backend {
        Backend::Pdfium => detect_with(&pdfium_engine(config)?, bytes, config),
        Backend::Lopdf => detect_with(&lopdf_engine(config), bytes, config),
    }
}

/// [`split_with`] on the engine selected by `config.backend`.
pub fn split(
    bytes: &[u8],
    spec: &SplitSpec,
    config: &SegmentationConfig,
) -> Result<Vec<UnitBundle>, SegmentError> {
    ensure_pdf_magic(bytes)?;
    match config.backend {
        Backend::Pdfium => split_with(&pdfium_engine(config)?, bytes, spec, config),
        Backend::Lopdf => split_with(&lopdf_engine(config), bytes, spec, config),
    }
}

/// [`detect`] on a blocking worker thread.
pub async fn detect_async(
    bytes: Vec<u8>,
    config: &SegmentationConfig,
) -> Result<DetectionReport, SegmentError> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || detect(&bytes, &config))
        .await
        .map_err(|e| SegmentError::Internal(format!("detect task panicked: {e}")))?
}

/// [`split`] on a blocking worker thread.
pub async fn split_async(
    bytes: Vec<u8>,
    spec: SplitSpec,
    config: &SegmentationConfig,
) -> Result<Vec<UnitBundle>, SegmentError> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || split(&bytes, &spec, &config))
        .await
        .map_err(|e| SegmentError::Internal(format!("split task panicked: {e}")))?
}

/// Read `path` and run [`detect`] on it.
pub fn detect_file(
    path: impl AsRef<Path>,
    config: &SegmentationConfig,
) -> Result<DetectionReport, SegmentError> {
    let bytes = read_pdf(path)?;
    detect(&bytes, config)
}

/// Read `path` and run [`split`] on it.
pub fn split_file(
    path: impl AsRef<Path>,
    spec: &SplitSpec,
    config: &SegmentationConfig,
) -> Result<Vec<UnitBundle>, SegmentError> {
    let bytes = read_pdf(path)?;
    split(&bytes, spec, config)
}

fn pdfium_engine(config: &SegmentationConfig) -> Result<PdfiumEngine, SegmentError> {
    PdfiumEngine::new(config.pdfium_library.as_deref(), config.password.clone())
}

fn lopdf_engine(config: &SegmentationConfig) -> LopdfEngine {
    if config.password.is_some() {
        warn!("lopdf backend cannot decrypt decks; the password is ignored");
    }
    LopdfEngine
}
