use bz_config::BzConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: Commands, config: &BzConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Run(args) => commands::run::handle(&args, config, flags),
        Commands::Preprocess(args) => commands::preprocess::handle(&args, config, flags),
        Commands::Layers(args) => commands::layers::handle(&args, flags),
        Commands::Paths(args) => commands::paths::handle(&args, config, flags),
    }
}
