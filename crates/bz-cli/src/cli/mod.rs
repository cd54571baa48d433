use clap::Parser;
use std::path::PathBuf;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `bz` binary.
#[derive(Debug, Parser)]
#[command(
    name = "bz",
    version,
    about = "Blue Zones - flag coastal zones against past, present, and future flood layers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Data root; overrides `paths.base_dir` and `BLUEZONES_BASE_DIR`
    #[arg(short, long, global = true)]
    pub base_dir: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            base_dir: self.base_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use bz_core::Epoch;
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;
    use std::path::Path;

    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["bz", "--format", "table", "--verbose", "layers"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Layers(_)));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["bz", "run", "present", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.epoch, Some(Epoch::Present));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["bz", "--format", "xml", "layers"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn run_rejects_unknown_epoch() {
        assert!(Cli::try_parse_from(["bz", "run", "someday"]).is_err());
    }

    #[test]
    fn run_requires_epoch_or_all() {
        assert!(Cli::try_parse_from(["bz", "run"]).is_err());
        assert!(Cli::try_parse_from(["bz", "run", "past", "--all"]).is_err());

        let cli = Cli::try_parse_from(["bz", "run", "--all", "--sequential", "--no-fragments"])
            .expect("cli should parse");
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert!(args.all);
        assert!(args.sequential);
        assert!(args.no_fragments);
        assert_eq!(args.epoch, None);
    }

    #[test]
    fn preprocess_accepts_repeated_layers() {
        let cli = Cli::try_parse_from(["bz", "preprocess", "--layer", "streams", "--layer", "pond"])
            .expect("cli should parse");
        let Commands::Preprocess(args) = cli.command else {
            panic!("expected preprocess");
        };
        assert_eq!(args.layer, vec!["streams".to_string(), "pond".to_string()]);
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["bz", "--base-dir", "/tmp/bz", "paths"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.base_dir.as_deref(), Some(Path::new("/tmp/bz")));
        assert_eq!(flags.format, OutputFormat::Json);
    }
}
