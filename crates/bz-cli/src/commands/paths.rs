use bz_config::BzConfig;
use bz_core::Epoch;
use bz_core::catalog::{layers_for, preprocess_specs};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PathsArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct PathRow {
    epoch: Option<Epoch>,
    kind: &'static str,
    name: String,
    path: PathBuf,
    exists: bool,
}

impl PathRow {
    fn new(epoch: Option<Epoch>, kind: &'static str, name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            epoch,
            kind,
            name: name.into(),
            exists: path.exists(),
            path,
        }
    }
}

fn rows(config: &BzConfig, epoch: Option<Epoch>) -> Vec<PathRow> {
    let epochs = epoch.map_or_else(|| Epoch::ALL.to_vec(), |epoch| vec![epoch]);
    let mut rows = vec![PathRow::new(None, "zones", "atomic zones", config.zones_path())];

    for epoch in epochs {
        if epoch == Epoch::Past {
            rows.extend(preprocess_specs().iter().map(|spec| {
                PathRow::new(Some(epoch), "raw", spec.layer, config.raw_source_path(spec))
            }));
        }
        rows.extend(
            layers_for(epoch)
                .iter()
                .map(|spec| PathRow::new(Some(epoch), "layer", spec.id, config.layer_path(spec))),
        );
        rows.push(PathRow::new(
            Some(epoch),
            "output",
            epoch.union_file_name(),
            config.epoch_output_dir(epoch).join(epoch.union_file_name()),
        ));
    }
    rows
}

/// Handle `bz paths`.
pub fn handle(args: &PathsArgs, config: &BzConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&rows(config, args.epoch), flags.format)
}
