//! Input and output locations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default base directory.
fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Directory roots. Unset entries fall back to conventional locations under
/// `base_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Root of the conventional data layout.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Root of all outputs; each epoch writes to `<output_dir>/<epoch>`.
    /// Defaults to `<base_dir>/output_csv`.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Atomic zone polygons. Defaults to `<base_dir>/Mask/atomic_regular_State.geojson`.
    #[serde(default)]
    pub zones: Option<PathBuf>,

    /// Raw historical-ecology vectors. Defaults to `<base_dir>/welikia_raw`.
    #[serde(default)]
    pub past_raw_dir: Option<PathBuf>,

    /// Preprocessed past layer artifacts. Defaults to `<base_dir>/historical`.
    #[serde(default)]
    pub past_processed_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            output_dir: None,
            zones: None,
            past_raw_dir: None,
            past_processed_dir: None,
        }
    }
}

/// Per-file overrides keyed by layer id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct InputsConfig {
    /// Reference layer inputs consumed by the epoch runs.
    #[serde(default)]
    pub layers: BTreeMap<String, PathBuf>,

    /// Raw past sources consumed by the preprocessor, keyed by the layer they feed.
    #[serde(default)]
    pub raw: BTreeMap<String, PathBuf>,
}
