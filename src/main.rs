// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.
mod args;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use std::fs::File;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

use args::{Args, GroupSpec};
use build_stats::report::{load_product_json, submit_all_stats, summary_table, StatsReport};
use build_stats::source::walk_group;
use build_stats::stats::{StatsRegistry, Tap, TapIteratorExt};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "BUILD_STATS_LOG";

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let registry = StatsRegistry::new();
    for group in &args.groups {
        account_group(&registry, group, args.log, args.read_contents)?;
    }

    let product = read_product(args.product.as_deref())?;
    submit_all_stats(&registry, product.as_ref())
        .await
        .context("Failed to submit build statistics")?;

    if args.table {
        println!("\n{}", summary_table(StatsReport::new(&registry).groups()));
    }
    if let Some(dest) = &args.report {
        write_report_to_file(&StatsReport::new(&registry), dest)?;
    }
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run every file of a group directory through a tap.
///
/// # Errors
/// Returns an error if the directory cannot be walked.
fn account_group(
    registry: &StatsRegistry,
    group: &GroupSpec,
    log: bool,
    read_contents: bool,
) -> Result<()> {
    info!(group = %group.name, dir = %group.dir.display(), "Collecting files");
    let files = walk_group(&group.dir, read_contents)
        .with_context(|| format!("Failed to collect files for group: {}", group.name))?;
    let tap = Tap::new(registry, &group.name, log);
    // The files themselves are not needed past the tap.
    files.into_iter().tap_stats(tap).for_each(drop);
    Ok(())
}

fn read_product(path: Option<&Path>) -> Result<Option<Value>> {
    path.map(load_product_json).transpose()
}

/// Write the statistics to a file.
///
/// # Errors
/// Returns an error if the report cannot be serialized to JSON or if the file cannot be created.
fn write_report_to_file(report: &StatsReport, dest: &Path) -> Result<()> {
    info!(file = %dest.display(), "Writing report");
    let file = File::create(dest)
        .with_context(|| format!("Failed to create JSON output file: {}", dest.display()))?;
    serde_json::to_writer_pretty(file, report)
        .with_context(|| format!("Failed to serialize report to JSON: {}", dest.display()))?;
    Ok(())
}
