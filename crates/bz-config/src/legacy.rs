//! Named environment overrides from the legacy batch scripts.
//!
//! Each variable maps onto one figment key, e.g. `PRESENT_100YR_PATH` ->
//! `inputs.layers.100yr`. These sit above every other provider.

use bz_core::catalog::{layers_for, preprocess_specs};
use bz_core::Epoch;
use figment::providers::Env;

/// Directory-level overrides.
const DIRECTORY_VARS: &[(&str, &str)] = &[
    ("BLUEZONES_BASE_DIR", "paths.base_dir"),
    ("BLUEZONES_OUTPUT_DIR", "paths.output_dir"),
    ("ATOMIC_POLYGONS_PATH", "paths.zones"),
    ("PAST_RAW_DIR", "paths.past_raw_dir"),
    ("PAST_PROCESSED_DIR", "paths.past_processed_dir"),
];

/// Every recognized variable with its figment key, in documentation order.
#[must_use]
pub fn named_overrides() -> Vec<(&'static str, String)> {
    let mut vars: Vec<(&'static str, String)> = DIRECTORY_VARS
        .iter()
        .map(|(var, key)| (*var, (*key).to_string()))
        .collect();

    for epoch in Epoch::ALL {
        for layer in layers_for(epoch) {
            vars.push((layer.path_env, format!("inputs.layers.{}", layer.id)));
        }
    }
    for spec in preprocess_specs() {
        vars.push((spec.source_env, format!("inputs.raw.{}", spec.layer)));
    }
    vars
}

/// Figment key for a named variable, if it is one.
#[must_use]
pub fn key_for(var: &str) -> Option<String> {
    named_overrides()
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(var))
        .map(|(_, key)| key)
}

/// Provider reading the named variables from the process environment.
pub fn provider() -> Env {
    Env::raw().filter_map(|var| key_for(var.as_str()).map(Into::into))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn maps_layer_and_raw_variables() {
        assert_eq!(key_for("PRESENT_100YR_PATH").as_deref(), Some("inputs.layers.100yr"));
        assert_eq!(key_for("PAST_TIDALCREEK_PATH").as_deref(), Some("inputs.layers.tidal_cree"));
        assert_eq!(key_for("TIDAL_CREEKS_PATH").as_deref(), Some("inputs.raw.tidal_cree"));
        assert_eq!(key_for("ATOMIC_POLYGONS_PATH").as_deref(), Some("paths.zones"));
        assert_eq!(key_for("HOME"), None);
    }

    #[test]
    fn variable_names_are_unique() {
        let vars = named_overrides();
        let unique: HashSet<_> = vars.iter().map(|(var, _)| *var).collect();
        assert_eq!(unique.len(), vars.len());
    }
}
