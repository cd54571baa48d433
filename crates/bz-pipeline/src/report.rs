//! Run reports returned to the CLI.

use bz_core::{Epoch, MeasureKind};
use serde::Serialize;
use std::path::PathBuf;

use crate::zones::SkipCounts;

/// What one layer contributed to an epoch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerReport {
    pub id: String,
    pub measure: MeasureKind,
    pub input: PathBuf,
    pub features: usize,
    /// Zero for point-count layers.
    pub fragments: usize,
    pub zones_touched: usize,
    pub zones_flagged: usize,
    pub orphans: usize,
    pub dissolved_csv: PathBuf,
    /// QA GeoJSON files written for this layer.
    pub exports: Vec<PathBuf>,
}

/// Summary of one epoch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub epoch: Epoch,
    pub zones_path: PathBuf,
    pub zones_loaded: usize,
    pub zones_skipped: SkipCounts,
    pub layers: Vec<LayerReport>,
    pub orphans: usize,
    pub blue_zones: usize,
    pub output: PathBuf,
}

impl RunReport {
    #[must_use]
    pub fn zones_skipped_total(&self) -> usize {
        self.zones_skipped.values().sum()
    }
}
