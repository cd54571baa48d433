//! Epoch orchestration.
//!
//! One run loads the zones once, processes every catalog layer (optionally on
//! the rayon pool), waits for all of them, then merges, classifies, and writes
//! the per-layer tables followed by the final table. Nothing is written until
//! every layer has succeeded, so a failing layer leaves the previous run's
//! outputs untouched.

use bz_config::BzConfig;
use bz_core::{Epoch, IntersectionFragment, LayerCatalog, LayerSpec, MeasureKind, ZoneSet};
use bz_geo::GeometryEngine;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::aggregate::aggregate;
use crate::error::PipelineError;
use crate::merge::{EpochTable, LayerResult};
use crate::overlay::{count_points, overlay_layer};
use crate::report::{LayerReport, RunReport};
use crate::writer;
use crate::zones::load_zones;

/// Toggles for one run; defaults come from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub export_fragments: bool,
    pub parallel_layers: bool,
}

impl RunOptions {
    #[must_use]
    pub fn from_config(config: &BzConfig) -> Self {
        Self {
            export_fragments: config.output.export_fragments,
            parallel_layers: config.run.parallel_layers,
        }
    }
}

/// Runs epochs against one configuration and geometry engine.
pub struct EpochRunner<'a> {
    engine: &'a dyn GeometryEngine,
    config: &'a BzConfig,
    options: RunOptions,
}

impl<'a> EpochRunner<'a> {
    #[must_use]
    pub fn new(engine: &'a dyn GeometryEngine, config: &'a BzConfig) -> Self {
        Self {
            engine,
            config,
            options: RunOptions::from_config(config),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn options(&self) -> RunOptions {
        self.options
    }

    /// Run one epoch end to end.
    ///
    /// # Errors
    ///
    /// Returns the first zone-loading, layer, or write failure. Layer errors
    /// carry the layer id.
    pub fn run(&self, epoch: Epoch) -> Result<RunReport, PipelineError> {
        let catalog = LayerCatalog::for_epoch(epoch)?;
        let zones_path = self.config.zones_path();
        let (zones, zones_skipped) = load_zones(self.engine, &zones_path)?;

        let outputs: Vec<(LayerResult, LayerOutput)> = if self.options.parallel_layers {
            catalog
                .layers()
                .par_iter()
                .map(|spec| self.process_layer(&zones, spec))
                .collect::<Result<_, _>>()?
        } else {
            catalog
                .layers()
                .iter()
                .map(|spec| self.process_layer(&zones, spec))
                .collect::<Result<_, _>>()?
        };

        let (results, outputs): (Vec<_>, Vec<_>) = outputs.into_iter().unzip();
        let table = EpochTable::merge(epoch, &zones, &results);
        let output = self.config.epoch_output_dir(epoch).join(epoch.union_file_name());

        let layers = match self.write_outputs(epoch, &results, &outputs, &table, &output) {
            Ok(layers) => layers,
            Err(error) => {
                remove_stale(&output);
                return Err(error);
            }
        };

        let report = RunReport {
            epoch,
            zones_path,
            zones_loaded: zones.len(),
            zones_skipped,
            layers,
            orphans: table.orphan_count(),
            blue_zones: table.blue_zone_count(),
            output,
        };
        tracing::info!(
            epoch = %epoch,
            zones = report.zones_loaded,
            blue_zones = report.blue_zones,
            output = %report.output.display(),
            "epoch complete"
        );
        Ok(report)
    }

    /// Load and overlay one layer; writes nothing.
    fn process_layer(
        &self,
        zones: &ZoneSet,
        spec: &'static LayerSpec,
    ) -> Result<(LayerResult, LayerOutput), PipelineError> {
        let input = self.config.layer_path(spec);
        let layer = self
            .engine
            .load_vector(&input)
            .map_err(|e| PipelineError::layer(spec.id, e))?;

        let (aggregates, fragments) = match spec.measure() {
            MeasureKind::Area => {
                let fragments = overlay_layer(self.engine, zones, spec, &layer)?;
                (aggregate(&fragments), fragments)
            }
            MeasureKind::PointCount => (count_points(self.engine, zones, spec, &layer)?, Vec::new()),
        };

        tracing::info!(
            layer = spec.id,
            features = layer.len(),
            fragments = fragments.len(),
            zones = aggregates.len(),
            "layer complete"
        );
        let output = LayerOutput {
            input,
            features: layer.len(),
            fragment_count: fragments.len(),
            fragments: if self.options.export_fragments { fragments } else { Vec::new() },
        };
        Ok((LayerResult { spec, aggregates }, output))
    }

    /// Write every per-layer table and export, then the final table last.
    fn write_outputs(
        &self,
        epoch: Epoch,
        results: &[LayerResult],
        outputs: &[LayerOutput],
        table: &EpochTable,
        output: &Path,
    ) -> Result<Vec<LayerReport>, PipelineError> {
        let out_dir = self.config.epoch_output_dir(epoch);
        let mut reports = Vec::with_capacity(outputs.len());

        for ((result, layer), stats) in results.iter().zip(outputs).zip(&table.stats) {
            let spec = result.spec;
            let dissolved_csv = out_dir.join(spec.dissolved_file_name());
            writer::write_dissolved_csv(&dissolved_csv, spec, &result.aggregates)?;

            let mut exports = Vec::new();
            if !layer.fragments.is_empty() {
                let dir = self.config.fragments_dir(epoch);
                let raw = dir.join(format!("{}_notdissolved.geojson", spec.id));
                writer::write_fragments(self.engine, &raw, &layer.fragments)?;
                exports.push(raw);
                if epoch == Epoch::Past {
                    let dissolved = dir.join(format!("{}_dissolved.geojson", spec.id));
                    writer::write_dissolved_fragments(
                        self.engine,
                        &dissolved,
                        spec,
                        &layer.fragments,
                        &result.aggregates,
                    )?;
                    exports.push(dissolved);
                }
            }

            reports.push(LayerReport {
                id: spec.id.to_string(),
                measure: spec.measure(),
                input: layer.input.clone(),
                features: layer.features,
                fragments: layer.fragment_count,
                zones_touched: stats.touched,
                zones_flagged: stats.flagged,
                orphans: stats.orphans,
                dissolved_csv,
                exports,
            });
        }

        writer::write_epoch_csv(output, table)?;
        Ok(reports)
    }
}

/// What one layer produced besides its aggregates.
struct LayerOutput {
    input: PathBuf,
    features: usize,
    fragment_count: usize,
    /// Empty unless fragment export is on.
    fragments: Vec<IntersectionFragment>,
}

/// Remove a final table left by an earlier run after a failed write.
fn remove_stale(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::warn!(path = %path.display(), "removed stale final table"),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
        Err(error) => tracing::warn!(path = %path.display(), %error, "could not remove stale final table"),
    }
}

/// Run several independent epochs, concurrently when `parallel` is set.
///
/// Each epoch succeeds or fails on its own; results keep the input order.
pub fn run_epochs(
    runner: &EpochRunner<'_>,
    epochs: &[Epoch],
    parallel: bool,
) -> Vec<(Epoch, Result<RunReport, PipelineError>)> {
    if parallel {
        epochs
            .par_iter()
            .map(|&epoch| (epoch, runner.run(epoch)))
            .collect()
    } else {
        epochs
            .iter()
            .map(|&epoch| (epoch, runner.run(epoch)))
            .collect()
    }
}
