//! Pipeline error types.

use bz_core::CoreError;
use bz_geo::GeoError;
use std::path::PathBuf;

/// Errors that abort an epoch run or a preprocessing step.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The zone set could not be loaded.
    #[error("zones {}: {source}", path.display())]
    Zones {
        path: PathBuf,
        #[source]
        source: GeoError,
    },

    /// A reference layer could not be loaded or overlaid.
    #[error("layer '{layer}': {source}")]
    Layer {
        layer: String,
        #[source]
        source: GeoError,
    },

    /// A declared propagated attribute is absent from every feature of the layer.
    #[error("layer '{layer}': missing required attribute '{attribute}'")]
    MissingAttribute { layer: String, attribute: String },

    /// Line features reached the overlay without being buffered first.
    #[error("layer '{layer}': line geometries must be buffered before overlay (run `bz preprocess`)")]
    UnbufferedLineLayer { layer: String },

    /// CSV output failed.
    #[error("CSV error on {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Output file could not be created, written, or persisted.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// GeoJSON export failed.
    #[error("export {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: GeoError,
    },

    /// Catalog lookup or validation failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl PipelineError {
    pub(crate) fn layer(layer: &str, source: GeoError) -> Self {
        Self::Layer {
            layer: layer.to_string(),
            source,
        }
    }

    /// Id of the layer the failure belongs to, if any.
    #[must_use]
    pub fn layer_id(&self) -> Option<&str> {
        match self {
            Self::Layer { layer, .. }
            | Self::MissingAttribute { layer, .. }
            | Self::UnbufferedLineLayer { layer } => Some(layer),
            _ => None,
        }
    }
}
