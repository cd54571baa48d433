//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed files and env var manipulation.

use std::path::PathBuf;

use bz_config::BzConfig;
use bz_core::Epoch;
use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};

#[test]
fn loads_paths_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[paths]
base_dir = "/data/bluezones"
output_dir = "/tmp/bz-out"
past_processed_dir = "/data/processed"

[inputs.layers]
"100yr" = "/data/fema/100yr.geojson"

[inputs.raw]
streams = "/data/raw/streams.geojson"

[output]
export_fragments = false
"#,
        )?;

        let config: BzConfig = Figment::from(Serialized::defaults(BzConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.paths.base_dir, PathBuf::from("/data/bluezones"));
        assert_eq!(
            config.epoch_output_dir(Epoch::Present),
            PathBuf::from("/tmp/bz-out/present")
        );
        assert_eq!(
            config.zones_path(),
            PathBuf::from("/data/bluezones/Mask/atomic_regular_State.geojson")
        );
        assert_eq!(config.past_processed_dir(), PathBuf::from("/data/processed"));
        assert_eq!(
            config.inputs.layers.get("100yr"),
            Some(&PathBuf::from("/data/fema/100yr.geojson"))
        );
        assert_eq!(
            config.inputs.raw.get("streams"),
            Some(&PathBuf::from("/data/raw/streams.geojson"))
        );
        assert!(!config.output.export_fragments);
        assert!(config.run.parallel_layers);
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "bluezones.toml",
            r#"
[paths]
base_dir = "/srv/bz"

[run]
parallel_layers = false
"#,
        )?;

        let config = BzConfig::load().expect("config loads");
        assert_eq!(config.paths.base_dir, PathBuf::from("/srv/bz"));
        assert!(!config.run.parallel_layers);
        Ok(())
    });
}

#[test]
fn empty_toml_gives_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("bluezones.toml", "")?;
        let config = BzConfig::load().expect("config loads");
        assert_eq!(config, BzConfig::default());
        Ok(())
    });
}
