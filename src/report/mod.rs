// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Reports accumulated statistics to the console and, when configured, to telemetry.

mod console;
mod product;
mod telemetry;

pub use console::{print_stats, summary_table};
pub use product::{load_product_json, telemetry_key};
pub use telemetry::{
    ClientConfig, EventProperties, HttpTelemetryClient, TelemetryClient, TelemetryError,
    TelemetryEvent, TelemetryResult, COLLECT_ENDPOINT, PACKAGE_METRICS_EVENT,
};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::stats::{EntrySnapshot, StatsRegistry};

/// Snapshot of the registry in display order: single-file groups first.
///
/// Both partitions keep the order in which their groups were registered.
#[must_use]
pub fn ordered_snapshot(registry: &StatsRegistry) -> Vec<EntrySnapshot> {
    let (mut sorted, multi): (Vec<_>, Vec<_>) = registry
        .snapshot()
        .into_iter()
        .partition(EntrySnapshot::is_single_file);
    sorted.extend(multi);
    sorted
}

/// Print all statistics and upload them when the product enables telemetry.
///
/// # Errors
/// Returns an error if telemetry is configured and the event cannot be sent.
pub async fn submit_all_stats(
    registry: &StatsRegistry,
    product_json: Option<&Value>,
) -> TelemetryResult<()> {
    submit_all_stats_with(registry, product_json, HttpTelemetryClient::new).await
}

/// Same as [`submit_all_stats`], with the telemetry client created by `connect`.
///
/// `connect` is only called when a telemetry key is configured.
///
/// # Errors
/// Returns an error if the client cannot be created or the event cannot be sent.
pub async fn submit_all_stats_with<C, F>(
    registry: &StatsRegistry,
    product_json: Option<&Value>,
    connect: F,
) -> TelemetryResult<()>
where
    C: TelemetryClient,
    F: FnOnce(ClientConfig) -> TelemetryResult<C>,
{
    let sorted = ordered_snapshot(registry);
    print_stats(&sorted);

    let Some(key) = telemetry_key(product_json) else {
        debug!("No telemetry key configured, skipping upload");
        return Ok(());
    };

    let mut client = connect(ClientConfig::new(key))?;
    client.track_event(TelemetryEvent::package_metrics(&sorted));
    client.flush().await?;
    info!(groups = sorted.len(), "Submitted build statistics");
    Ok(())
}

/// Machine-readable form of all statistics.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    total_count: u64,
    total_size: u64,
    groups: Vec<EntrySnapshot>,
}

impl StatsReport {
    #[must_use]
    pub fn new(registry: &StatsRegistry) -> Self {
        let groups = ordered_snapshot(registry);
        Self {
            total_count: groups.iter().map(|e| e.total_count).sum(),
            total_size: groups.iter().map(|e| e.total_size).sum(),
            groups,
        }
    }

    #[must_use]
    pub fn groups(&self) -> &[EntrySnapshot] {
        &self.groups
    }
}
