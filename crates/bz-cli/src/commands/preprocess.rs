use anyhow::{Context, bail};
use bz_config::BzConfig;
use bz_core::PreprocessSpec;
use bz_core::catalog::preprocess_specs;
use bz_geo::GeoEngine;
use bz_pipeline::preprocess::preprocess;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PreprocessArgs;
use crate::output::output;
use crate::progress::Progress;

/// Handle `bz preprocess`.
pub fn handle(args: &PreprocessArgs, config: &BzConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let specs = select(&args.layer)?;
    let engine = GeoEngine::new();

    let progress = Progress::spinner(&format!("Preprocessing {} layers", specs.len()));
    let reports = match preprocess(&engine, config, &specs) {
        Ok(reports) => reports,
        Err(error) => {
            progress.finish_err("Preprocessing failed");
            return Err(error).context("preprocessing failed");
        }
    };
    progress.finish_ok(&format!("Preprocessed {} layers", reports.len()));

    output(&reports, flags.format)
}

/// Resolve requested layer ids; an empty request selects every step.
fn select(requested: &[String]) -> anyhow::Result<Vec<&'static PreprocessSpec>> {
    let all = preprocess_specs();
    if requested.is_empty() {
        return Ok(all.iter().collect());
    }

    requested
        .iter()
        .map(|id| match all.iter().find(|spec| spec.layer == id.as_str()) {
            Some(spec) => Ok(spec),
            None => {
                let known = all.iter().map(|spec| spec.layer).collect::<Vec<_>>().join(", ");
                bail!("unknown preprocess layer '{id}' (expected one of: {known})")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::select;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_selection_means_all() {
        let all = select(&[]).unwrap();
        assert_eq!(all.len(), bz_core::catalog::preprocess_specs().len());
    }

    #[test]
    fn selection_keeps_request_order() {
        let picked = select(&["streams".to_string(), "pond".to_string()]).unwrap();
        let ids: Vec<&str> = picked.iter().map(|spec| spec.layer).collect();
        assert_eq!(ids, vec!["streams", "pond"]);
    }

    #[test]
    fn unknown_layer_lists_choices() {
        let err = select(&["lagoon".to_string()]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("lagoon"));
        assert!(message.contains("streams"));
    }
}
