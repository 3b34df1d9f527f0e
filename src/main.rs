//! trimspace
//!
//! Keeps a set of rotated log files under a size limit by deleting the
//! oldest ones. The whole inventory is read and a plan is built before
//! anything is removed.

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use common::cli::utils::{init_logging, load_settings, version_info};
use common::{Cli, PROGRAM_NAME, RetentionSettings};
use retention::{FsRemover, Report, RetentionEnforcer, RetentionMetrics};
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let rendered = e.render().to_string();
            let message = rendered.lines().next().unwrap_or_default();
            let message = message.trim_start_matches("error: ");
            println!("{PROGRAM_NAME}: ERROR - {message}");
            return ExitCode::FAILURE;
        }
    };

    // Settings are validated before the filesystem is touched.
    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            println!("{PROGRAM_NAME}: ERROR - {e:#}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(settings.verbose, cli.quiet);
    tracing::info!(
        limit_bytes = settings.limit.bytes(),
        dry_run = settings.dry_run,
        force = settings.force,
        "Configuration resolved"
    );

    match run(&cli, settings) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Run aborted");
            println!("{PROGRAM_NAME}: ERROR - {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// One full pass. Returns `Ok(false)` when some erasures failed.
fn run(cli: &Cli, settings: RetentionSettings) -> Result<bool> {
    let stdout = io::stdout();
    let mut report = Report::new(stdout.lock(), settings.verbose, settings.dry_run);
    report
        .banner(&version_info())
        .context("Failed to write report")?;

    let paths = common::sources::collect(&cli.patterns, io::stdin().lock())?;
    let records = retention::build_inventory(&paths).inspect_err(|e| {
        tracing::error!(
            path = %e.path().display(),
            unsafe_input = e.is_unsafe_input(),
            "Inventory rejected, nothing erased"
        );
    })?;

    let metrics = RetentionMetrics::new();
    for record in &records {
        metrics.record_inventoried(record.size_bytes());
    }

    let plan = retention::select(records, settings.limit);
    report.inventory(&plan).context("Failed to write report")?;
    report.erase_plan(&plan).context("Failed to write report")?;

    let enforcer = RetentionEnforcer::new(FsRemover, settings.dry_run, metrics.clone());
    let result = enforcer.enforce(&plan);

    report
        .summary(&plan, &result)
        .context("Failed to write report")?;
    report
        .erase_failures(PROGRAM_NAME, &result)
        .context("Failed to write report")?;
    report
        .into_inner()
        .flush()
        .context("Failed to write report")?;

    metrics.summary().log();

    Ok(result.is_success())
}
