//! Table and QA fragment writers.
//!
//! Every file is written to a temporary file in its target directory and
//! renamed into place, so readers never see a half-written table.

use bz_core::rules::{AREA_FIELD, UNIQUE_ID_FIELD};
use bz_core::{AttrValue, IntersectionFragment, LayerSpec, ZoneId, ZoneLayerAggregate};
use bz_geo::{GeometryEngine, VectorFeature, VectorLayer};
use geo::{Geometry, MultiPolygon};
use std::collections::HashMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::PipelineError;
use crate::merge::{EpochTable, attribute_text, format_number};

/// Write `path` atomically, creating its directory if needed.
///
/// # Errors
///
/// Returns [`PipelineError::Io`] on filesystem failures, or whatever `body` returns.
pub fn write_atomic<F>(path: &Path, body: F) -> Result<(), PipelineError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), PipelineError>,
{
    let io_error = |source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(io_error)?;

    let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        body(&mut writer)?;
        writer.flush().map_err(io_error)?;
    }
    file.persist(path).map_err(|e| io_error(e.error))?;
    tracing::debug!(path = %path.display(), "wrote file");
    Ok(())
}

fn write_csv<I>(path: &Path, header: &[String], records: I) -> Result<(), PipelineError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let csv_error = |source| PipelineError::Csv {
        path: path.to_path_buf(),
        source,
    };
    write_atomic(path, |out| {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(header).map_err(csv_error)?;
        for record in records {
            writer.write_record(&record).map_err(csv_error)?;
        }
        writer.flush().map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })
    })
}

/// `<layer_id>_dissolved.csv`: one row per zone touched by the layer.
///
/// # Errors
///
/// Returns [`PipelineError::Csv`] or [`PipelineError::Io`].
pub fn write_dissolved_csv(
    path: &Path,
    spec: &LayerSpec,
    aggregates: &[ZoneLayerAggregate],
) -> Result<(), PipelineError> {
    let mut header = vec![UNIQUE_ID_FIELD.to_string(), spec.measure_column.to_string()];
    header.extend(spec.propagate.iter().map(|a| spec.attribute_column(a)));

    let records = aggregates.iter().map(|aggregate| {
        let mut record = vec![aggregate.zone_id.to_string(), format_number(aggregate.measure)];
        record.extend(
            spec.propagate
                .iter()
                .map(|a| attribute_text(&aggregate.attributes, a)),
        );
        record
    });
    write_csv(path, &header, records)
}

/// `<epoch>_union.csv`: the final wide table.
///
/// # Errors
///
/// Returns [`PipelineError::Csv`] or [`PipelineError::Io`].
pub fn write_epoch_csv(path: &Path, table: &EpochTable) -> Result<(), PipelineError> {
    let records = table.rows.iter().map(|row| table.record(row));
    write_csv(path, &table.header(), records)
}

/// Write a vector layer as GeoJSON.
///
/// # Errors
///
/// Returns [`PipelineError::Export`] or [`PipelineError::Io`].
pub fn write_layer(
    engine: &dyn GeometryEngine,
    path: &Path,
    layer: &VectorLayer,
) -> Result<(), PipelineError> {
    write_atomic(path, |out| {
        engine
            .write_vector(out, layer)
            .map_err(|source| PipelineError::Export {
                path: path.to_path_buf(),
                source,
            })
    })
}

fn zone_feature(
    zone_id: &ZoneId,
    geometry: MultiPolygon<f64>,
    measure_field: &str,
    measure: f64,
    attributes: &bz_core::Attributes,
) -> VectorFeature {
    let mut properties = attributes.clone();
    properties.insert(UNIQUE_ID_FIELD.to_string(), AttrValue::Text(zone_id.to_string()));
    properties.insert(measure_field.to_string(), AttrValue::Number(measure));
    VectorFeature::new(Geometry::MultiPolygon(geometry), properties)
}

/// QA export of raw fragments: `<layer_id>_notdissolved.geojson`.
///
/// # Errors
///
/// Returns [`PipelineError::Export`] or [`PipelineError::Io`].
pub fn write_fragments(
    engine: &dyn GeometryEngine,
    path: &Path,
    fragments: &[IntersectionFragment],
) -> Result<(), PipelineError> {
    let features = fragments
        .iter()
        .map(|f| zone_feature(&f.zone_id, f.geometry.clone(), AREA_FIELD, f.area, &f.attributes))
        .collect();
    let layer = VectorLayer::new(Some(engine.target_crs()), features);
    write_layer(engine, path, &layer)
}

/// QA export of fragments dissolved per zone: `<layer_id>_dissolved.geojson`.
///
/// # Errors
///
/// Returns [`PipelineError::Export`] or [`PipelineError::Io`].
pub fn write_dissolved_fragments(
    engine: &dyn GeometryEngine,
    path: &Path,
    spec: &LayerSpec,
    fragments: &[IntersectionFragment],
    aggregates: &[ZoneLayerAggregate],
) -> Result<(), PipelineError> {
    let mut parts: HashMap<&ZoneId, Vec<MultiPolygon<f64>>> = HashMap::new();
    for fragment in fragments {
        parts
            .entry(&fragment.zone_id)
            .or_default()
            .push(fragment.geometry.clone());
    }

    let features = aggregates
        .iter()
        .map(|aggregate| {
            let geometry = parts
                .get(&aggregate.zone_id)
                .map(|p| engine.dissolve(p))
                .unwrap_or_else(|| MultiPolygon::new(Vec::new()));
            zone_feature(
                &aggregate.zone_id,
                geometry,
                spec.measure_column,
                aggregate.measure,
                &aggregate.attributes,
            )
        })
        .collect();
    let layer = VectorLayer::new(Some(engine.target_crs()), features);
    write_layer(engine, path, &layer)
}
