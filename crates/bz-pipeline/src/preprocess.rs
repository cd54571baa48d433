//! Past-epoch layer preprocessing.
//!
//! Each raw historical-ecology vector is reprojected, filtered, and (for
//! centerline sources) buffered into corridors. Every artifact keeps geometry
//! plus the single attribute `<layer_id> = 1`, and is written where the past
//! epoch reads its layers.

use bz_config::BzConfig;
use bz_core::{AttrValue, Attributes, PreprocessSpec};
use bz_geo::{GeometryEngine, VectorFeature, VectorLayer};
use geo::Geometry;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::writer;

/// Outcome of one preprocessing step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreprocessReport {
    pub layer: String,
    pub source: PathBuf,
    pub output: PathBuf,
    pub features_read: usize,
    pub features_written: usize,
    pub buffered: bool,
}

/// Transform an in-memory raw layer into the standardized artifact.
///
/// # Errors
///
/// Returns [`PipelineError::Layer`] if a buffered source holds non-line geometry.
pub fn transform_layer(
    engine: &dyn GeometryEngine,
    spec: &PreprocessSpec,
    raw: VectorLayer,
) -> Result<VectorLayer, PipelineError> {
    let distance = spec.buffer_distance();
    let mut features = Vec::with_capacity(raw.len());

    for feature in raw.features {
        if let Some(filter) = &spec.filter {
            if !filter.matches(&feature.attributes) {
                continue;
            }
        }
        let Some(geometry) = feature.geometry else {
            continue;
        };

        let geometry = match distance {
            Some(distance) => engine
                .buffer(&geometry, distance)
                .map(Geometry::MultiPolygon)
                .map_err(|e| PipelineError::layer(spec.layer, e))?,
            None => geometry,
        };
        let attributes = Attributes::from([(spec.layer.to_string(), AttrValue::Integer(1))]);
        features.push(VectorFeature::new(geometry, attributes));
    }

    Ok(VectorLayer::new(Some(engine.target_crs()), features))
}

/// Preprocess one raw source file into `output`.
///
/// # Errors
///
/// Returns [`PipelineError::Layer`] if the source cannot be loaded or
/// transformed, or a write error.
pub fn preprocess_file(
    engine: &dyn GeometryEngine,
    spec: &PreprocessSpec,
    source: &Path,
    output: &Path,
) -> Result<PreprocessReport, PipelineError> {
    let raw = engine
        .load_vector(source)
        .map_err(|e| PipelineError::layer(spec.layer, e))?;
    let features_read = raw.len();
    let layer = transform_layer(engine, spec, raw)?;
    writer::write_layer(engine, output, &layer)?;

    tracing::info!(
        layer = spec.layer,
        read = features_read,
        written = layer.len(),
        output = %output.display(),
        "preprocessed layer"
    );
    Ok(PreprocessReport {
        layer: spec.layer.to_string(),
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        features_read,
        features_written: layer.len(),
        buffered: spec.buffer_distance().is_some(),
    })
}

/// Preprocess the given steps with paths resolved from configuration.
///
/// Output goes to the past layer's configured input path, so a following
/// past run picks it up.
///
/// # Errors
///
/// Stops at the first failing step.
pub fn preprocess(
    engine: &dyn GeometryEngine,
    config: &BzConfig,
    specs: &[&PreprocessSpec],
) -> Result<Vec<PreprocessReport>, PipelineError> {
    specs
        .iter()
        .map(|spec| -> Result<PreprocessReport, PipelineError> {
            let output = config.layer_path(spec.output_layer()?);
            preprocess_file(engine, spec, &config.raw_source_path(spec), &output)
        })
        .collect()
}
