//! Shared fixtures for unit tests.

use bz_core::rules::UNIQUE_ID_FIELD;
use bz_core::{
    AttrValue, Attributes, Epoch, GeometryKind, InputRoot, IntersectionFragment, LayerSpec, ZoneId,
    ZoneLayerAggregate, ZoneSet,
};
use bz_geo::{GeoEngine, VectorFeature, VectorLayer};
use geo::{Geometry, MultiPolygon, polygon};

use crate::zones::build_zone_set;

pub fn square(x: f64, y: f64, side: f64) -> Geometry<f64> {
    Geometry::Polygon(polygon![
        (x: x, y: y),
        (x: x + side, y: y),
        (x: x + side, y: y + side),
        (x: x, y: y + side),
    ])
}

pub fn feature(geometry: Geometry<f64>, attributes: Attributes) -> VectorFeature {
    VectorFeature::new(geometry, attributes)
}

pub fn zone_attrs(id: &str) -> Attributes {
    Attributes::from([(UNIQUE_ID_FIELD.to_string(), AttrValue::Text(id.to_string()))])
}

/// Square zones given as `(id, x, y, side)`.
pub fn zone_set(zones: &[(&str, f64, f64, f64)]) -> ZoneSet {
    let features = zones
        .iter()
        .map(|&(id, x, y, side)| feature(square(x, y, side), zone_attrs(id)))
        .collect();
    build_zone_set(&GeoEngine::new(), VectorLayer::new(None, features)).0
}

/// A present-epoch layer with `<id>A` / `<id>Afg` columns.
pub fn layer_spec(
    id: &'static str,
    geometry_kind: GeometryKind,
    propagate: &'static [&'static str],
) -> LayerSpec {
    LayerSpec {
        id,
        epoch: Epoch::Present,
        description: "test layer",
        geometry_kind,
        measure_column: Box::leak(format!("{id}A").into_boxed_str()),
        flag_column: Box::leak(format!("{id}Afg").into_boxed_str()),
        propagate,
        path_env: "TEST_LAYER_PATH",
        input_root: InputRoot::BaseDir,
        default_path: "layer.geojson",
    }
}

pub fn fragment(zone: &str, area: f64, attributes: Attributes) -> IntersectionFragment {
    IntersectionFragment {
        zone_id: ZoneId::from(zone),
        geometry: MultiPolygon::new(Vec::new()),
        area,
        attributes,
    }
}

pub fn aggregate_row(zone: &str, measure: f64) -> ZoneLayerAggregate {
    ZoneLayerAggregate::new(ZoneId::from(zone), measure)
}
