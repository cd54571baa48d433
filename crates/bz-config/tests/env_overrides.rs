use std::path::PathBuf;

use bz_config::BzConfig;
use bz_core::{Epoch, LayerCatalog};
use figment::Jail;

#[test]
fn prefixed_env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "bluezones.toml",
            r#"
[paths]
base_dir = "/from/toml"
"#,
        )?;
        jail.set_env("BLUEZONES_PATHS__BASE_DIR", "/from/env");

        let config = BzConfig::load().expect("config loads");
        assert_eq!(config.paths.base_dir, PathBuf::from("/from/env"));
        Ok(())
    });
}

#[test]
fn named_overrides_beat_prefixed_env() {
    Jail::expect_with(|jail| {
        jail.set_env("BLUEZONES_PATHS__BASE_DIR", "/from/prefixed");
        jail.set_env("BLUEZONES_BASE_DIR", "/from/named");

        let config = BzConfig::load().expect("config loads");
        assert_eq!(config.paths.base_dir, PathBuf::from("/from/named"));
        Ok(())
    });
}

#[test]
fn named_layer_overrides_resolve_layer_paths() {
    Jail::expect_with(|jail| {
        jail.set_env("PRESENT_311_PATH", "/calls/311.geojson");
        jail.set_env("PAST_STREAMS_PATH", "/hist/streams.geojson");
        jail.set_env("STREAMS_PATH", "/raw/streams.geojson");
        jail.set_env("ATOMIC_POLYGONS_PATH", "/mask/zones.geojson");

        let config = BzConfig::load().expect("config loads");
        let present = LayerCatalog::for_epoch(Epoch::Present).unwrap();
        let past = LayerCatalog::for_epoch(Epoch::Past).unwrap();

        assert_eq!(
            config.layer_path(present.get("depcall").unwrap()),
            PathBuf::from("/calls/311.geojson")
        );
        assert_eq!(
            config.layer_path(past.get("streams").unwrap()),
            PathBuf::from("/hist/streams.geojson")
        );
        assert_eq!(
            config.inputs.raw.get("streams"),
            Some(&PathBuf::from("/raw/streams.geojson"))
        );
        assert_eq!(config.zones_path(), PathBuf::from("/mask/zones.geojson"));
        Ok(())
    });
}

#[test]
fn output_dir_override_keeps_epochs_disjoint() {
    Jail::expect_with(|jail| {
        jail.set_env("BLUEZONES_OUTPUT_DIR", "/out");

        let config = BzConfig::load().expect("config loads");
        let dirs: Vec<_> = Epoch::ALL
            .iter()
            .map(|epoch| config.epoch_output_dir(*epoch))
            .collect();
        assert_eq!(
            dirs,
            [
                PathBuf::from("/out/past"),
                PathBuf::from("/out/present"),
                PathBuf::from("/out/future"),
            ]
        );
        Ok(())
    });
}
