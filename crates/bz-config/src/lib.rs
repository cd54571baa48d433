//! # bz-config
//!
//! Layered configuration loading for Blue Zones using figment.
//!
//! Only input and output locations (plus two run toggles) are configurable.
//! Thresholds, the CRS, and the buffer distance are fixed in `bz_core::rules`.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Legacy named overrides (`BLUEZONES_BASE_DIR`,
//!    `ATOMIC_POLYGONS_PATH`, `PRESENT_100YR_PATH`, ...; see [`legacy`])
//! 2. Environment variables (`BLUEZONES_*` prefix, `__` as separator)
//! 3. Project-level `./bluezones.toml`
//! 4. User-level `~/.config/bluezones/config.toml`
//! 5. Built-in defaults
//!
//! # Usage
//!
//! ```no_run
//! use bz_config::BzConfig;
//! use bz_core::Epoch;
//!
//! let config = BzConfig::load_with_dotenv().expect("config");
//! println!("zones: {}", config.zones_path().display());
//! println!("present outputs: {}", config.epoch_output_dir(Epoch::Present).display());
//! ```

mod error;
mod general;
pub mod legacy;
mod paths;

pub use error::ConfigError;
pub use general::{OutputConfig, RunConfig};
pub use paths::{InputsConfig, PathsConfig};

use bz_core::catalog::InputRoot;
use bz_core::{Epoch, LayerSpec, PreprocessSpec};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const PROJECT_CONFIG_FILE: &str = "bluezones.toml";
const DEFAULT_ZONES: &str = "Mask/atomic_regular_State.geojson";
const DEFAULT_OUTPUT_SUBDIR: &str = "output_csv";
const DEFAULT_PAST_RAW_SUBDIR: &str = "welikia_raw";
const DEFAULT_PAST_PROCESSED_SUBDIR: &str = "historical";
const FRAGMENTS_SUBDIR: &str = "fragments";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BzConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub inputs: InputsConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub run: RunConfig,
}

impl BzConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a provider fails or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(PROJECT_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Prefixed environment variables
        figment = figment.merge(Env::prefixed("BLUEZONES_").split("__"));

        // Layer 4: Named overrides (highest priority)
        figment.merge(legacy::provider())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("bluezones").join("config.toml"))
    }

    /// Reject empty paths; an empty override would silently resolve to the CWD.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut named: Vec<(String, &Path)> =
            vec![("paths.base_dir".into(), self.paths.base_dir.as_path())];
        let optional = [
            ("paths.output_dir", &self.paths.output_dir),
            ("paths.zones", &self.paths.zones),
            ("paths.past_raw_dir", &self.paths.past_raw_dir),
            ("paths.past_processed_dir", &self.paths.past_processed_dir),
        ];
        for (field, value) in optional {
            if let Some(path) = value {
                named.push((field.to_string(), path.as_path()));
            }
        }
        for (id, path) in &self.inputs.layers {
            named.push((format!("inputs.layers.{id}"), path.as_path()));
        }
        for (id, path) in &self.inputs.raw {
            named.push((format!("inputs.raw.{id}"), path.as_path()));
        }

        for (field, path) in named {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "path must not be empty".into(),
                });
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Resolution
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.paths.base_dir
    }

    /// Root of all outputs.
    #[must_use]
    pub fn output_root(&self) -> PathBuf {
        self.paths
            .output_dir
            .clone()
            .unwrap_or_else(|| self.base_dir().join(DEFAULT_OUTPUT_SUBDIR))
    }

    /// Output directory of one epoch; epochs never share a directory.
    #[must_use]
    pub fn epoch_output_dir(&self, epoch: Epoch) -> PathBuf {
        self.output_root().join(epoch.as_str())
    }

    /// QA fragment export directory of one epoch.
    #[must_use]
    pub fn fragments_dir(&self, epoch: Epoch) -> PathBuf {
        self.epoch_output_dir(epoch).join(FRAGMENTS_SUBDIR)
    }

    #[must_use]
    pub fn zones_path(&self) -> PathBuf {
        self.paths
            .zones
            .clone()
            .unwrap_or_else(|| self.base_dir().join(DEFAULT_ZONES))
    }

    #[must_use]
    pub fn past_raw_dir(&self) -> PathBuf {
        self.paths
            .past_raw_dir
            .clone()
            .unwrap_or_else(|| self.base_dir().join(DEFAULT_PAST_RAW_SUBDIR))
    }

    #[must_use]
    pub fn past_processed_dir(&self) -> PathBuf {
        self.paths
            .past_processed_dir
            .clone()
            .unwrap_or_else(|| self.base_dir().join(DEFAULT_PAST_PROCESSED_SUBDIR))
    }

    fn root(&self, root: InputRoot) -> PathBuf {
        match root {
            InputRoot::BaseDir => self.base_dir().to_path_buf(),
            InputRoot::PastProcessed => self.past_processed_dir(),
            InputRoot::PastRaw => self.past_raw_dir(),
        }
    }

    /// Input file of a reference layer.
    #[must_use]
    pub fn layer_path(&self, layer: &LayerSpec) -> PathBuf {
        self.inputs
            .layers
            .get(layer.id)
            .cloned()
            .unwrap_or_else(|| self.root(layer.input_root).join(layer.default_path))
    }

    /// Raw source file of a past preprocessing step.
    #[must_use]
    pub fn raw_source_path(&self, spec: &PreprocessSpec) -> PathBuf {
        self.inputs
            .raw
            .get(spec.layer)
            .cloned()
            .unwrap_or_else(|| self.root(InputRoot::PastRaw).join(spec.source_default))
    }
}
