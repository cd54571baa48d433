use anyhow::bail;
use bz_config::BzConfig;
use bz_core::Epoch;
use bz_geo::GeoEngine;
use bz_pipeline::{EpochRunner, PipelineError, RunOptions, RunReport, run_epochs};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::root_commands::RunArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;
use crate::progress::Progress;

/// One row per epoch for table output.
#[derive(Debug, Serialize)]
struct EpochSummary {
    epoch: Epoch,
    zones: usize,
    skipped: usize,
    orphans: usize,
    blue_zones: usize,
    output: PathBuf,
}

impl From<&RunReport> for EpochSummary {
    fn from(report: &RunReport) -> Self {
        Self {
            epoch: report.epoch,
            zones: report.zones_loaded,
            skipped: report.zones_skipped_total(),
            orphans: report.orphans,
            blue_zones: report.blue_zones,
            output: report.output.clone(),
        }
    }
}

/// Handle `bz run`.
pub fn handle(args: &RunArgs, config: &BzConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let engine = GeoEngine::new();
    let defaults = RunOptions::from_config(config);
    let runner = EpochRunner::new(&engine, config).with_options(RunOptions {
        export_fragments: defaults.export_fragments && !args.no_fragments,
        parallel_layers: defaults.parallel_layers && !args.sequential,
    });

    let epochs: Vec<Epoch> = match args.epoch {
        Some(epoch) if !args.all => vec![epoch],
        _ => Epoch::ALL.to_vec(),
    };
    let label = epochs
        .iter()
        .map(|epoch| epoch.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let progress = Progress::spinner(&format!("Running {label}"));
    let results = run_epochs(&runner, &epochs, !args.sequential);

    let mut reports = Vec::new();
    let mut failures: Vec<(Epoch, PipelineError)> = Vec::new();
    for (epoch, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(error) => {
                tracing::error!(epoch = %epoch, layer = error.layer_id(), %error, "epoch failed");
                failures.push((epoch, error));
            }
        }
    }

    if failures.is_empty() {
        progress.finish_ok(&format!("Finished {label}"));
    } else {
        progress.finish_err(&format!("{} of {} epochs failed", failures.len(), epochs.len()));
    }

    if !reports.is_empty() {
        print_reports(&reports, flags)?;
    }

    match failures.as_slice() {
        [] => Ok(()),
        [(epoch, error)] => bail!("{epoch} epoch failed: {error}"),
        many => {
            let detail = many
                .iter()
                .map(|(epoch, error)| format!("{epoch}: {error}"))
                .collect::<Vec<_>>()
                .join("; ");
            bail!("{} of {} epochs failed: {detail}", many.len(), epochs.len())
        }
    }
}

fn print_reports(reports: &[RunReport], flags: &GlobalFlags) -> anyhow::Result<()> {
    match (flags.format, reports) {
        (OutputFormat::Table, _) => {
            let summaries: Vec<EpochSummary> = reports.iter().map(EpochSummary::from).collect();
            output(&summaries, flags.format)
        }
        (_, [single]) => output(single, flags.format),
        (_, many) => output(&many, flags.format),
    }
}
