//! GeoJSON vector I/O.

use bz_core::attr::{attributes_from_json, Attributes};
use geo::Geometry;
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::crs::Crs;
use crate::error::GeoError;

/// One feature: optional geometry plus its non-null attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorFeature {
    pub geometry: Option<Geometry<f64>>,
    pub attributes: Attributes,
}

impl VectorFeature {
    #[must_use]
    pub fn new(geometry: Geometry<f64>, attributes: Attributes) -> Self {
        Self {
            geometry: Some(geometry),
            attributes,
        }
    }
}

/// An in-memory vector layer in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorLayer {
    /// Where the layer was read from, for error messages.
    pub source: PathBuf,
    /// Declared CRS; `None` when the file carries no `crs` member.
    pub crs: Option<Crs>,
    /// Every property name seen on any feature, including null-valued ones.
    pub fields: BTreeSet<String>,
    pub features: Vec<VectorFeature>,
}

impl VectorLayer {
    #[must_use]
    pub fn new(crs: Option<Crs>, features: Vec<VectorFeature>) -> Self {
        let fields = features
            .iter()
            .flat_map(|f| f.attributes.keys().cloned())
            .collect();
        Self {
            source: PathBuf::new(),
            crs,
            fields,
            features,
        }
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Read a GeoJSON file into a [`VectorLayer`].
///
/// A bare `Feature` or `Geometry` document is read as a one-feature layer.
///
/// # Errors
///
/// Returns [`GeoError::Io`], [`GeoError::Parse`], or
/// [`GeoError::UnrecognizedCrs`].
pub fn read_geojson(path: &Path) -> Result<VectorLayer, GeoError> {
    let text = std::fs::read_to_string(path).map_err(|source| GeoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut layer = parse_geojson(&text).map_err(|error| match error {
        GeoError::Parse { source, .. } => GeoError::Parse {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    layer.source = path.to_path_buf();
    tracing::debug!(
        path = %path.display(),
        features = layer.len(),
        crs = ?layer.crs,
        "read vector layer"
    );
    Ok(layer)
}

/// Parse GeoJSON text into a [`VectorLayer`].
///
/// # Errors
///
/// Returns [`GeoError::Parse`] (with an empty path) or [`GeoError::UnrecognizedCrs`].
pub fn parse_geojson(text: &str) -> Result<VectorLayer, GeoError> {
    let parse_error = |source: geojson::Error| GeoError::Parse {
        path: PathBuf::new(),
        source: Box::new(source),
    };

    let collection = match text.parse::<GeoJson>().map_err(parse_error)? {
        GeoJson::FeatureCollection(collection) => collection,
        GeoJson::Feature(feature) => FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        },
        GeoJson::Geometry(geometry) => FeatureCollection {
            bbox: None,
            features: vec![Feature::from(geometry)],
            foreign_members: None,
        },
    };

    let crs = collection
        .foreign_members
        .as_ref()
        .and_then(|members| members.get("crs"))
        .filter(|member| !member.is_null())
        .map(Crs::from_member)
        .transpose()?;

    let mut fields = BTreeSet::new();
    let mut features = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let attributes = match &feature.properties {
            Some(properties) => {
                fields.extend(properties.keys().cloned());
                attributes_from_json(properties)
            }
            None => Attributes::new(),
        };
        let geometry = feature
            .geometry
            .map(Geometry::<f64>::try_from)
            .transpose()
            .map_err(parse_error)?;
        features.push(VectorFeature {
            geometry,
            attributes,
        });
    }

    Ok(VectorLayer {
        source: PathBuf::new(),
        crs,
        fields,
        features,
    })
}

/// Write a layer as a GeoJSON `FeatureCollection`, with the legacy `crs`
/// member when the layer's CRS is known.
///
/// # Errors
///
/// Returns [`GeoError::Serialize`] if writing fails.
pub fn write_geojson(writer: &mut dyn Write, layer: &VectorLayer) -> Result<(), GeoError> {
    let features = layer
        .features
        .iter()
        .map(|feature| {
            let properties: JsonObject = feature
                .attributes
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect();
            Feature {
                bbox: None,
                geometry: feature
                    .geometry
                    .as_ref()
                    .map(|g| geojson::Geometry::new(geojson::Value::from(g))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let foreign_members = layer.crs.map(|crs| {
        let mut members = JsonObject::new();
        members.insert("crs".to_string(), crs.to_member());
        members
    });

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members,
    };
    serde_json::to_writer(&mut *writer, &collection)?;
    Ok(())
}
