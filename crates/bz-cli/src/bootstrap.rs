use anyhow::Context;
use bz_config::BzConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, then the layered configuration, then apply `--base-dir`.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<BzConfig> {
    load_dotenv()?;

    let mut config = BzConfig::load().context("failed to load configuration")?;
    if let Some(base_dir) = &flags.base_dir {
        config.paths.base_dir.clone_from(base_dir);
        config.validate().context("invalid --base-dir")?;
    }
    tracing::debug!(base_dir = %config.base_dir().display(), "configuration loaded");
    Ok(config)
}

fn load_dotenv() -> anyhow::Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded dotenv file");
            Ok(())
        }
        Err(error) if error.not_found() => Ok(()),
        Err(error) => Err(error).context("failed to load .env"),
    }
}
