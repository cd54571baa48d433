//! # bz-pipeline
//!
//! The overlay-aggregate-threshold-union pipeline for Blue Zones.
//!
//! Stages, in order:
//! 1. [`zones`]: load atomic zones, skipping unusable records
//! 2. [`overlay`]: intersect zones with an areal layer, or count points
//! 3. [`aggregate`]: one row per zone per layer
//! 4. [`threshold`]: per-layer flags and the epoch union
//! 5. [`merge`]: one wide table per epoch, anchored on the zones
//! 6. [`writer`]: CSV tables and QA GeoJSON, written atomically
//!
//! [`runner::EpochRunner`] composes them for one epoch. [`preprocess`]
//! builds the past epoch's layer artifacts from raw historical vectors.

pub mod aggregate;
pub mod error;
pub mod index;
pub mod merge;
pub mod overlay;
pub mod preprocess;
pub mod report;
pub mod runner;
pub mod threshold;
pub mod writer;
pub mod zones;

#[cfg(test)]
mod testing;

pub use error::PipelineError;
pub use merge::{EpochTable, LayerResult};
pub use preprocess::PreprocessReport;
pub use report::{LayerReport, RunReport};
pub use runner::{EpochRunner, RunOptions, run_epochs};
