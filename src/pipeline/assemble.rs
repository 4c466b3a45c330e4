//! Unit assembly: run the splitter over every confirmed unit and package the
//! results as [`UnitBundle`]s.
//!
//! A split request is all-or-nothing. Every range is validated against the
//! source before any unit is cut, and the first unit that fails aborts the
//! request without returning the bundles already produced.

use crate::config::SegmentationConfig;
use crate::engine::{Deck, PdfEngine};
use crate::error::SegmentError;
use crate::output::{AttachmentType, SplitSpec, UnitBundle};
use crate::pipeline::breaks::BreakSlideFilter;
use crate::pipeline::split::DocumentSplitter;
use chrono::Utc;
use tracing::{debug, info, warn};

pub struct UnitAssembler<'a, E: PdfEngine> {
    engine: &'a E,
    config: &'a SegmentationConfig,
}

impl<'a, E: PdfEngine> UnitAssembler<'a, E> {
    pub fn new(engine: &'a E, config: &'a SegmentationConfig) -> Self {
        Self { engine, config }
    }

    /// Cut every unit of `spec` out of `source`, in request order.
    ///
    /// Range errors are returned as [`SegmentError::SplitRangeInvalid`]
    /// before any work is done. Failures while cutting a unit are wrapped in
    /// [`SegmentError::UnitFailed`].
    pub fn assemble(
        &self,
        source: &E::Document<'a>,
        spec: &SplitSpec,
    ) -> Result<Vec<UnitBundle>, SegmentError> {
        let total_pages = source.page_count();
        for unit in &spec.units {
            unit.range().validate(&unit.unit_name, total_pages)?;
        }

        let total_units = spec.units.len();
        let callback = self.config.progress_callback.as_ref();
        if let Some(cb) = callback {
            cb.on_split_start(total_units);
        }

        let filter = spec
            .remove_break_slides
            .then(|| BreakSlideFilter::new(self.config));
        let splitter = DocumentSplitter::new(self.engine);
        let mut bundles = Vec::with_capacity(total_units);

        for (index, unit) in spec.units.iter().enumerate() {
            let ordinal = index + 1;
            if let Some(cb) = callback {
                cb.on_unit_start(ordinal, total_units, &unit.unit_name);
            }

            let cut = match splitter.split(source, unit.range(), &unit.unit_name, filter.as_ref()) {
                Ok(cut) => cut,
                Err(e) => {
                    warn!("Unit {} '{}' failed: {}", ordinal, unit.unit_name, e);
                    if let Some(cb) = callback {
                        cb.on_unit_error(ordinal, total_units, &e.to_string());
                    }
                    return Err(e.in_unit(ordinal, unit.unit_name.clone()));
                }
            };

            if cut.page_count == 0 {
                warn!(
                    "Unit {} '{}' has no pages left after break removal",
                    ordinal, unit.unit_name
                );
            }
            if let Some(cb) = callback {
                cb.on_unit_complete(ordinal, total_units, cut.page_count);
            }
            debug!(
                "Unit {} '{}': pages {}-{} -> {} pages",
                ordinal, unit.unit_name, unit.start_page, unit.end_page, cut.page_count
            );

            bundles.push(UnitBundle {
                ordinal,
                name: unit.unit_name.clone(),
                attachment_type: AttachmentType::File,
                release_date: unit.release_date,
                created_at: Utc::now(),
                description: String::new(),
                page_count: cut.page_count,
                bytes: cut.bytes,
            });
        }

        if let Some(cb) = callback {
            cb.on_split_complete(total_units);
        }
        info!("Assembled {} units from {} pages", bundles.len(), total_pages);
        Ok(bundles)
    }
}
