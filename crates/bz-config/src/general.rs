//! Output and run behaviour.

use serde::{Deserialize, Serialize};

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Write non-dissolved intersection fragments as GeoJSON for QA.
    #[serde(default = "default_true")]
    pub export_fragments: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            export_fragments: default_true(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RunConfig {
    /// Run the per-layer overlay stages of an epoch on the rayon pool.
    #[serde(default = "default_true")]
    pub parallel_layers: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            parallel_layers: default_true(),
        }
    }
}
