//! Pipeline stages for lecture-deck segmentation.
//!
//! Each submodule implements one step and only talks to documents through the
//! [`crate::engine`] traits, so every stage is testable without a PDF library.
//!
//! ## Data Flow
//!
//! ```text
//! detect:  outline ──▶ boundary
//!          (scan)      (page ranges)
//!
//! split:   assemble ──▶ split ──▶ breaks
//!          (per unit)   (copy)    (optional)
//! ```
//!
//! 1. [`outline`]  — find outline pages and read each unit's name
//! 2. [`boundary`] — turn outline hits into a contiguous partition of the deck
//! 3. [`assemble`] — validate confirmed ranges and drive one split per unit
//! 4. [`split`]    — copy a range into its own document, serialise, retitle
//! 5. [`breaks`]   — drop the first break slide of a unit

pub mod assemble;
pub mod boundary;
pub mod breaks;
pub mod outline;
pub mod split;
