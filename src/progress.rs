//! Progress-callback trait for per-unit split events.
//!
//! Inject an [`Arc<dyn SplitProgressCallback>`] via
//! [`crate::config::SegmentationConfigBuilder::progress_callback`] to receive
//! events while a split request cuts each unit.
//!
//! # Example
//!
//! ```rust
//! use slidecut::{SegmentationConfig, SplitProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl SplitProgressCallback for CountingCallback {
//!     fn on_unit_complete(&self, ordinal: usize, total_units: usize, page_count: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Unit {}/{} done ({} pages)", ordinal, total_units, page_count);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = SegmentationConfig::builder()
//!     .progress_callback(counter as Arc<dyn SplitProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the unit assembler as it processes each unit of a split.
///
/// Units are processed one at a time, in order. Implementations must still be
/// `Send + Sync` because the async entry points run the split on a blocking
/// worker thread. All methods default to no-ops.
pub trait SplitProgressCallback: Send + Sync {
    /// Called once before the first unit is cut.
    fn on_split_start(&self, total_units: usize) {
        let _ = total_units;
    }

    /// Called before unit `ordinal` (1-based) is extracted.
    fn on_unit_start(&self, ordinal: usize, total_units: usize, name: &str) {
        let _ = (ordinal, total_units, name);
    }

    /// Called when a unit has been serialised.
    ///
    /// `page_count` is the page count after break-slide removal.
    fn on_unit_complete(&self, ordinal: usize, total_units: usize, page_count: usize) {
        let _ = (ordinal, total_units, page_count);
    }

    /// Called when a unit fails. The split aborts right after this event.
    fn on_unit_error(&self, ordinal: usize, total_units: usize, error: &str) {
        let _ = (ordinal, total_units, error);
    }

    /// Called once after every unit was produced successfully.
    fn on_split_complete(&self, total_units: usize) {
        let _ = total_units;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SplitProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SegmentationConfig`].
pub type ProgressCallback = Arc<dyn SplitProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_split_start(3);
        cb.on_unit_start(1, 3, "Recursion");
        cb.on_unit_complete(1, 3, 5);
        cb.on_unit_error(2, 3, "some error");
        cb.on_split_complete(3);
    }

    #[test]
    fn arc_dyn_callback_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn SplitProgressCallback>();

        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_split_start(2);
    }
}
