//! The fixed layer catalog for every epoch.
//!
//! Each [`LayerSpec`] declares everything later stages need to locate its
//! columns: the measure column, the flag column, and the categorical
//! attributes it propagates. Nothing is derived from list position or from
//! truncating another name.
//!
//! Column namespacing in the final table:
//!
//! ```text
//! unique_id | area | zone.<attr>... | <measure> | <layer_id>.<attr>... | <flag> | BZ_<epoch>
//! ```
//!
//! Declared measure and flag columns never contain `.`, so they cannot collide
//! with namespaced attribute columns; [`LayerCatalog::for_epoch`] rejects any
//! other collision.

use serde::Serialize;
use std::collections::HashSet;

use crate::attr::Attributes;
use crate::enums::{Epoch, GeometryKind, MeasureKind};
use crate::errors::CoreError;
use crate::rules::{AREA_FIELD, LINE_BUFFER_DISTANCE, UNIQUE_ID_FIELD};

/// Directory a layer's default input path is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputRoot {
    /// `paths.base_dir`.
    BaseDir,
    /// `paths.past_processed_dir`, where the preprocessor writes its artifacts.
    PastProcessed,
    /// `paths.past_raw_dir`, the raw historical-ecology vectors.
    PastRaw,
}

/// Declaration of one reference layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerSpec {
    /// Short identifier; input key, output file stem, and attribute namespace.
    pub id: &'static str,
    pub epoch: Epoch,
    pub description: &'static str,
    /// Geometry of the layer's source features. Line layers are overlaid only
    /// after the preprocessor has buffered them into corridors.
    pub geometry_kind: GeometryKind,
    /// Column holding the summed overlap area or point count.
    pub measure_column: &'static str,
    /// Column holding the 0/1 threshold result.
    pub flag_column: &'static str,
    /// Categorical attributes carried from source features, reduced with "first".
    pub propagate: &'static [&'static str],
    /// Named override for the input path.
    pub path_env: &'static str,
    pub input_root: InputRoot,
    pub default_path: &'static str,
}

impl LayerSpec {
    #[must_use]
    pub const fn measure(&self) -> MeasureKind {
        match self.geometry_kind {
            GeometryKind::Point => MeasureKind::PointCount,
            GeometryKind::Polygon | GeometryKind::Line => MeasureKind::Area,
        }
    }

    /// Corridor radius for line layers.
    #[must_use]
    pub const fn buffer_distance(&self) -> Option<f64> {
        match self.geometry_kind {
            GeometryKind::Line => Some(LINE_BUFFER_DISTANCE),
            GeometryKind::Polygon | GeometryKind::Point => None,
        }
    }

    /// Final-table column for a propagated attribute.
    #[must_use]
    pub fn attribute_column(&self, attribute: &str) -> String {
        format!("{}.{attribute}", self.id)
    }

    /// Keep only the declared propagated attributes.
    #[must_use]
    pub fn select_propagated(&self, attributes: &Attributes) -> Attributes {
        self.propagate
            .iter()
            .filter_map(|name| {
                attributes
                    .get(*name)
                    .map(|value| ((*name).to_string(), value.clone()))
            })
            .collect()
    }

    #[must_use]
    pub fn dissolved_file_name(&self) -> String {
        format!("{}_dissolved.csv", self.id)
    }
}

// ---------------------------------------------------------------------------
// Catalog contents
// ---------------------------------------------------------------------------

const fn past_layer(
    id: &'static str,
    description: &'static str,
    geometry_kind: GeometryKind,
    measure_column: &'static str,
    flag_column: &'static str,
    propagate: &'static [&'static str],
    path_env: &'static str,
    default_path: &'static str,
) -> LayerSpec {
    LayerSpec {
        id,
        epoch: Epoch::Past,
        description,
        geometry_kind,
        measure_column,
        flag_column,
        propagate,
        path_env,
        input_root: InputRoot::PastProcessed,
        default_path,
    }
}

static PAST_LAYERS: &[LayerSpec] = &[
    past_layer("beaches", "Historical beaches", GeometryKind::Polygon, "beachA", "beachAfg", &["beaches"], "PAST_BEACHES_PATH", "beach.geojson"),
    past_layer("river", "Historical freshwater rivers", GeometryKind::Polygon, "rivA", "rivAfg", &["river"], "PAST_RIVER_PATH", "river.geojson"),
    past_layer("fresh_wetl", "Historical freshwater wetlands", GeometryKind::Polygon, "fresh_weA", "fresh_weAfg", &["fresh_wetl"], "PAST_FRESHWETL_PATH", "fresh_wetland.geojson"),
    past_layer("marine", "Historical marine waters", GeometryKind::Polygon, "mariA", "mariAfg", &["marine"], "PAST_MARINE_PATH", "marine_water.geojson"),
    past_layer("pond", "Historical natural ponds", GeometryKind::Polygon, "poA", "poAfg", &["pond"], "PAST_POND_PATH", "ponds.geojson"),
    past_layer("saltmarsh", "Historical tidal salt marsh", GeometryKind::Polygon, "saltmarA", "saltmarAfg", &["saltmarsh"], "PAST_SALTMARSH_PATH", "saltmarsh.geojson"),
    past_layer("streams", "Historical upland streams (15 ft corridor)", GeometryKind::Line, "streaA", "streaAfg", &["streams"], "PAST_STREAMS_PATH", "streams_buffered.geojson"),
    past_layer("dunes", "Historical active dunes", GeometryKind::Polygon, "dunA", "dunAfg", &["dunes"], "PAST_DUNES_PATH", "dunes.geojson"),
    past_layer("tidal_cree", "Historical tidal creeks (15 ft corridor)", GeometryKind::Line, "tidal_crA", "tidal_crAfg", &["tidal_cree"], "PAST_TIDALCREEK_PATH", "tidal_creek.geojson"),
    past_layer("int_stream", "Historical intermittent streams", GeometryKind::Polygon, "int_streA", "int_streAfg", &["int_stream"], "PAST_INTSTREAM_PATH", "int_stream.geojson"),
];

static PRESENT_LAYERS: &[LayerSpec] = &[
    LayerSpec {
        id: "depcall",
        epoch: Epoch::Present,
        description: "311 street-flooding calls",
        geometry_kind: GeometryKind::Point,
        measure_column: "Point_Coun",
        flag_column: "depcaAfg",
        propagate: &["depcall"],
        path_env: "PRESENT_311_PATH",
        input_root: InputRoot::BaseDir,
        default_path: "present/311_flooding_ptp2.geojson",
    },
    LayerSpec {
        id: "mod_cur",
        epoch: Epoch::Present,
        description: "Moderate flood, current",
        geometry_kind: GeometryKind::Polygon,
        measure_column: "mod_cA",
        flag_column: "mod_cAfg",
        propagate: &["mod_cur", "mo_cu_fldC"],
        path_env: "PRESENT_MODERATE_FLOOD_PATH",
        input_root: InputRoot::BaseDir,
        default_path: "present/Moderate_current_Flood_poly.geojson",
    },
    LayerSpec {
        id: "100yr",
        epoch: Epoch::Present,
        description: "100-year floodplain",
        geometry_kind: GeometryKind::Polygon,
        measure_column: "100A",
        flag_column: "100Afg",
        propagate: &["100yr"],
        path_env: "PRESENT_100YR_PATH",
        input_root: InputRoot::BaseDir,
        default_path: "present/100yr.geojson",
    },
];

static FUTURE_LAYERS: &[LayerSpec] = &[
    LayerSpec {
        id: "mod_2050",
        epoch: Epoch::Future,
        description: "Moderate flood, 2050",
        geometry_kind: GeometryKind::Polygon,
        measure_column: "mod_20A",
        flag_column: "mod_20Afg",
        propagate: &["mod_2050", "mo_20_fldC"],
        path_env: "FUTURE_MOD_2050_PATH",
        input_root: InputRoot::BaseDir,
        default_path: "future_flooding/Moderate_2050_Flood_poly.geojson",
    },
    LayerSpec {
        id: "ext_2080",
        epoch: Epoch::Future,
        description: "Extreme flood, 2080",
        geometry_kind: GeometryKind::Polygon,
        measure_column: "ext_20A",
        flag_column: "ext_20Afg",
        propagate: &["ext_2080", "ex_20_fldC"],
        path_env: "FUTURE_EXT_2080_PATH",
        input_root: InputRoot::BaseDir,
        default_path: "future_flooding/Extreme_2080_Flood_poly.geojson",
    },
    LayerSpec {
        id: "500yr",
        epoch: Epoch::Future,
        description: "500-year floodplain",
        geometry_kind: GeometryKind::Polygon,
        measure_column: "500A",
        flag_column: "500Afg",
        propagate: &["500yr"],
        path_env: "FUTURE_500YR_PATH",
        input_root: InputRoot::BaseDir,
        default_path: "future_flooding/500yr.geojson",
    },
];

/// Raw layers of one epoch, in catalog order (unvalidated).
#[must_use]
pub const fn layers_for(epoch: Epoch) -> &'static [LayerSpec] {
    match epoch {
        Epoch::Past => PAST_LAYERS,
        Epoch::Present => PRESENT_LAYERS,
        Epoch::Future => FUTURE_LAYERS,
    }
}

// ---------------------------------------------------------------------------
// LayerCatalog
// ---------------------------------------------------------------------------

/// Validated layer list for one epoch.
#[derive(Debug, Clone, Copy)]
pub struct LayerCatalog {
    epoch: Epoch,
    layers: &'static [LayerSpec],
}

impl LayerCatalog {
    /// Build and validate the catalog for `epoch`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateColumn`] or [`CoreError::InvalidColumn`]
    /// when two layers would produce colliding output columns.
    pub fn for_epoch(epoch: Epoch) -> Result<Self, CoreError> {
        let layers = layers_for(epoch);
        validate_layers(epoch, layers)?;
        Ok(Self { epoch, layers })
    }

    #[must_use]
    pub const fn epoch(&self) -> Epoch {
        self.epoch
    }

    #[must_use]
    pub const fn layers(&self) -> &'static [LayerSpec] {
        self.layers
    }

    /// Look up a layer by id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownLayer`] if the id is not in this epoch.
    pub fn get(&self, id: &str) -> Result<&'static LayerSpec, CoreError> {
        self.layers
            .iter()
            .find(|layer| layer.id == id)
            .ok_or_else(|| CoreError::UnknownLayer { id: id.to_string() })
    }

    /// Layer-derived columns of the final table, in output order.
    #[must_use]
    pub fn layer_columns(&self) -> Vec<String> {
        let mut columns = Vec::new();
        for layer in self.layers {
            columns.push(layer.measure_column.to_string());
            columns.extend(layer.propagate.iter().map(|a| layer.attribute_column(a)));
            columns.push(layer.flag_column.to_string());
        }
        columns
    }
}

/// Check that every declared column of an epoch is unique and well-formed.
///
/// # Errors
///
/// Returns the first collision or malformed name found.
pub fn validate_layers(epoch: Epoch, layers: &[LayerSpec]) -> Result<(), CoreError> {
    let reserved = [UNIQUE_ID_FIELD, AREA_FIELD, epoch.union_column()];
    let mut seen_ids = HashSet::new();
    let mut seen_columns: HashSet<&str> = reserved.into_iter().collect();

    for layer in layers {
        if layer.epoch != epoch {
            return Err(CoreError::Validation(format!(
                "layer '{}' belongs to the {} epoch, not {epoch}",
                layer.id, layer.epoch
            )));
        }
        if layer.id.is_empty() || layer.id.contains('.') || layer.id == "zone" {
            return Err(CoreError::InvalidColumn {
                column: layer.id.to_string(),
                reason: "layer ids must be non-empty, contain no '.', and not be 'zone'".into(),
            });
        }
        if !seen_ids.insert(layer.id) {
            return Err(CoreError::Validation(format!(
                "layer id '{}' declared twice in the {epoch} catalog",
                layer.id
            )));
        }

        for column in [layer.measure_column, layer.flag_column] {
            if column.is_empty() || column.contains('.') {
                return Err(CoreError::InvalidColumn {
                    column: column.to_string(),
                    reason: "declared columns must be non-empty and contain no '.'".into(),
                });
            }
            if !seen_columns.insert(column) {
                return Err(CoreError::DuplicateColumn {
                    epoch: epoch.to_string(),
                    column: column.to_string(),
                });
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Past preprocessing
// ---------------------------------------------------------------------------

/// Keep features whose numeric attribute equals a value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttrFilter {
    pub attribute: &'static str,
    pub equals: f64,
    /// Outcome for features that lack the attribute or hold a non-numeric value.
    pub when_missing: bool,
}

impl AttrFilter {
    #[must_use]
    pub fn matches(&self, attributes: &Attributes) -> bool {
        attributes
            .get(self.attribute)
            .and_then(crate::attr::AttrValue::as_f64)
            .map_or(self.when_missing, |value| {
                (value - self.equals).abs() < f64::EPSILON
            })
    }
}

/// How a raw historical-ecology vector becomes one past-epoch layer artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreprocessSpec {
    /// Id of the past layer this artifact feeds; also the constant flag attribute.
    pub layer: &'static str,
    pub source_kind: GeometryKind,
    pub filter: Option<AttrFilter>,
    pub source_env: &'static str,
    /// Default source path, relative to `paths.past_raw_dir`.
    pub source_default: &'static str,
}

impl PreprocessSpec {
    /// The past layer this artifact is consumed as.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownLayer`] if no past layer carries this id.
    pub fn output_layer(&self) -> Result<&'static LayerSpec, CoreError> {
        PAST_LAYERS
            .iter()
            .find(|layer| layer.id == self.layer)
            .ok_or_else(|| CoreError::UnknownLayer {
                id: self.layer.to_string(),
            })
    }

    #[must_use]
    pub const fn buffer_distance(&self) -> Option<f64> {
        match self.source_kind {
            GeometryKind::Line => Some(LINE_BUFFER_DISTANCE),
            GeometryKind::Polygon | GeometryKind::Point => None,
        }
    }
}

const fn raw(
    layer: &'static str,
    source_kind: GeometryKind,
    filter: Option<AttrFilter>,
    source_env: &'static str,
    source_default: &'static str,
) -> PreprocessSpec {
    PreprocessSpec {
        layer,
        source_kind,
        filter,
        source_env,
        source_default,
    }
}

static PREPROCESS_SPECS: &[PreprocessSpec] = &[
    raw("river", GeometryKind::Polygon, None, "FRESH_RIVER_PATH", "Vector/Freshwater_rivers_v8_0.geojson"),
    raw("fresh_wetl", GeometryKind::Polygon, None, "FRESH_WETLANDS_PATH", "Vector/Freshwater_wetlands_v8_0.geojson"),
    raw("marine", GeometryKind::Polygon, None, "MARINE_WATER_PATH", "Vector/Marine_waters_MTL_mw30_60_poly.geojson"),
    raw(
        "pond",
        GeometryKind::Polygon,
        Some(AttrFilter { attribute: "Manmade", equals: 0.0, when_missing: true }),
        "PONDS_PATH",
        "Vector/Ponds_v8_0.geojson",
    ),
    raw("saltmarsh", GeometryKind::Polygon, None, "SALTMARSH_PATH", "Vector/Tidal_marshes_mw664_00.geojson"),
    raw("streams", GeometryKind::Line, None, "STREAMS_PATH", "Vector/Streams_upland_line_v8_0.geojson"),
    raw("tidal_cree", GeometryKind::Line, None, "TIDAL_CREEKS_PATH", "Vector/Tidal_creeks_v8_0.geojson"),
    raw(
        "dunes",
        GeometryKind::Polygon,
        Some(AttrFilter { attribute: "Actv_Dune", equals: 1.0, when_missing: false }),
        "SURFICIAL_GEOLOGY_PATH",
        "Vector/Surficial_geology_v8_0.geojson",
    ),
    raw("beaches", GeometryKind::Polygon, None, "BEACHES_PATH", "Vector/Beaches_mw659_00.geojson"),
];

/// Every past preprocessing step, in run order.
#[must_use]
pub const fn preprocess_specs() -> &'static [PreprocessSpec] {
    PREPROCESS_SPECS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::AttrValue;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Epoch::Past, 10)]
    #[case(Epoch::Present, 3)]
    #[case(Epoch::Future, 3)]
    fn every_epoch_catalog_validates(#[case] epoch: Epoch, #[case] count: usize) {
        let catalog = LayerCatalog::for_epoch(epoch).expect("catalog is valid");
        assert_eq!(catalog.layers().len(), count);
        assert!(catalog.layers().iter().all(|l| l.epoch == epoch));
    }

    #[test]
    fn duplicate_measure_columns_are_rejected() {
        let mut layers = PRESENT_LAYERS.to_vec();
        layers[2].measure_column = layers[1].measure_column;
        let err = validate_layers(Epoch::Present, &layers).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateColumn { ref column, .. } if column == "mod_cA"));
    }

    #[test]
    fn reserved_and_dotted_columns_are_rejected() {
        let mut layers = FUTURE_LAYERS.to_vec();
        layers[0].flag_column = "area";
        assert!(matches!(
            validate_layers(Epoch::Future, &layers),
            Err(CoreError::DuplicateColumn { .. })
        ));

        let mut layers = FUTURE_LAYERS.to_vec();
        layers[0].measure_column = "mod.A";
        assert!(matches!(
            validate_layers(Epoch::Future, &layers),
            Err(CoreError::InvalidColumn { .. })
        ));
    }

    #[test]
    fn only_the_311_layer_counts_points() {
        for epoch in Epoch::ALL {
            for layer in layers_for(epoch) {
                let expected = if layer.id == "depcall" {
                    MeasureKind::PointCount
                } else {
                    MeasureKind::Area
                };
                assert_eq!(layer.measure(), expected, "layer {}", layer.id);
            }
        }
    }

    #[rstest]
    #[case(Epoch::Present, "mod_cur", "Moderate flood, current")]
    #[case(Epoch::Present, "100yr", "100-year floodplain")]
    #[case(Epoch::Future, "mod_2050", "Moderate flood, 2050")]
    #[case(Epoch::Future, "ext_2080", "Extreme flood, 2080")]
    fn flood_layers_are_named_after_their_sources(
        #[case] epoch: Epoch,
        #[case] id: &str,
        #[case] description: &str,
    ) {
        let layer = LayerCatalog::for_epoch(epoch).unwrap().get(id).unwrap();
        assert_eq!(layer.description, description);
    }

    #[test]
    fn every_layer_carries_its_own_flag_attribute() {
        for epoch in Epoch::ALL {
            for layer in layers_for(epoch) {
                assert!(layer.propagate.contains(&layer.id), "layer {}", layer.id);
            }
        }
    }

    #[test]
    fn line_layers_carry_the_fixed_buffer() {
        let catalog = LayerCatalog::for_epoch(Epoch::Past).unwrap();
        let buffered: Vec<_> = catalog
            .layers()
            .iter()
            .filter(|l| l.buffer_distance().is_some())
            .map(|l| l.id)
            .collect();
        assert_eq!(buffered, ["streams", "tidal_cree"]);
        assert_eq!(catalog.get("streams").unwrap().buffer_distance(), Some(15.0));
    }

    #[test]
    fn layer_columns_follow_catalog_order() {
        let catalog = LayerCatalog::for_epoch(Epoch::Present).unwrap();
        assert_eq!(
            catalog.layer_columns(),
            [
                "Point_Coun",
                "depcaAfg",
                "mod_cA",
                "mod_cur.mod_cur",
                "mod_cur.mo_cu_fldC",
                "mod_cAfg",
                "100A",
                "100yr.100yr",
                "100Afg",
            ]
        );
    }

    #[test]
    fn every_preprocess_step_feeds_a_past_layer() {
        for spec in preprocess_specs() {
            let layer = spec.output_layer().expect("past layer exists");
            assert_eq!(layer.id, spec.layer);
            assert_eq!(spec.buffer_distance(), layer.buffer_distance());
        }
    }

    #[test]
    fn attribute_filters_follow_missing_policy() {
        let pond = preprocess_specs()
            .iter()
            .find(|s| s.layer == "pond")
            .and_then(|s| s.filter)
            .unwrap();
        let dunes = preprocess_specs()
            .iter()
            .find(|s| s.layer == "dunes")
            .and_then(|s| s.filter)
            .unwrap();

        let empty = Attributes::new();
        assert!(pond.matches(&empty));
        assert!(!dunes.matches(&empty));

        let mut manmade = Attributes::new();
        manmade.insert("Manmade".into(), AttrValue::Integer(1));
        assert!(!pond.matches(&manmade));

        let mut active = Attributes::new();
        active.insert("Actv_Dune".into(), AttrValue::Number(1.0));
        assert!(dunes.matches(&active));
    }

    #[test]
    fn select_propagated_keeps_declared_order_and_drops_nulls() {
        let layer = LayerCatalog::for_epoch(Epoch::Future)
            .unwrap()
            .get("mod_2050")
            .unwrap();
        let mut attrs = Attributes::new();
        attrs.insert("mo_20_fldC".into(), AttrValue::Text("2".into()));
        attrs.insert("Shape_Area".into(), AttrValue::Number(10.0));
        let kept = layer.select_propagated(&attrs);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.get("mo_20_fldC"), Some(&AttrValue::Text("2".into())));
    }
}
