use bz_core::Epoch;
use clap::{Args, Subcommand};

/// All top-level commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the overlay pipeline for one epoch, or all of them
    Run(RunArgs),
    /// Build past-epoch layers from raw historical vectors
    Preprocess(PreprocessArgs),
    /// List the layer catalog
    Layers(LayersArgs),
    /// Show resolved input and output paths
    Paths(PathsArgs),
}

/// Arguments for `bz run`.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Epoch to run: past, present, future
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub epoch: Option<Epoch>,

    /// Run every epoch; a failing epoch does not stop the others
    #[arg(long)]
    pub all: bool,

    /// Skip the QA GeoJSON fragment exports
    #[arg(long)]
    pub no_fragments: bool,

    /// Process layers and epochs one at a time
    #[arg(long)]
    pub sequential: bool,
}

/// Arguments for `bz preprocess`.
#[derive(Debug, Clone, Args)]
pub struct PreprocessArgs {
    /// Only build these layers (repeatable); default is all
    #[arg(short = 'l', long)]
    pub layer: Vec<String>,
}

/// Arguments for `bz layers`.
#[derive(Debug, Clone, Args)]
pub struct LayersArgs {
    /// Restrict to one epoch
    #[arg(short, long)]
    pub epoch: Option<Epoch>,
}

/// Arguments for `bz paths`.
#[derive(Debug, Clone, Args)]
pub struct PathsArgs {
    /// Restrict to one epoch
    #[arg(short, long)]
    pub epoch: Option<Epoch>,
}
