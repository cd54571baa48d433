use bz_core::catalog::layers_for;
use bz_core::{Epoch, GeometryKind, LayerSpec, MeasureKind};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::LayersArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct LayerRow {
    epoch: Epoch,
    id: &'static str,
    geometry: GeometryKind,
    measure: MeasureKind,
    measure_column: &'static str,
    flag_column: &'static str,
    propagate: &'static [&'static str],
    env: &'static str,
    description: &'static str,
}

impl From<&'static LayerSpec> for LayerRow {
    fn from(spec: &'static LayerSpec) -> Self {
        Self {
            epoch: spec.epoch,
            id: spec.id,
            geometry: spec.geometry_kind,
            measure: spec.measure(),
            measure_column: spec.measure_column,
            flag_column: spec.flag_column,
            propagate: spec.propagate,
            env: spec.path_env,
            description: spec.description,
        }
    }
}

fn rows(epoch: Option<Epoch>) -> Vec<LayerRow> {
    let epochs = epoch.map_or_else(|| Epoch::ALL.to_vec(), |epoch| vec![epoch]);
    epochs
        .into_iter()
        .flat_map(layers_for)
        .map(LayerRow::from)
        .collect()
}

/// Handle `bz layers`.
pub fn handle(args: &LayersArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&rows(args.epoch), flags.format)
}
