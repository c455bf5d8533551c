// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Telemetry event model and the HTTP client that uploads it.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::stats::EntrySnapshot;

/// Name of the event carrying per-group sizes and counts.
pub const PACKAGE_METRICS_EVENT: &str = "monacoworkbench/packagemetrics";

/// Collection endpoint all events are posted to.
pub const COLLECT_ENDPOINT: &str = "https://vortex.data.microsoft.com/collect/v1";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Result type for telemetry operations.
pub type TelemetryResult<T> = std::result::Result<T, TelemetryError>;

/// Errors that can occur while submitting telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Failed to create HTTP client")]
    ClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to send telemetry to {endpoint}")]
    SendFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Telemetry endpoint {endpoint} rejected the events: HTTP {status}")]
    Rejected { endpoint: String, status: u16 },
}

/// Settings a telemetry client is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub instrumentation_key: String,
    pub endpoint_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    #[must_use]
    pub fn new(instrumentation_key: impl Into<String>) -> Self {
        Self {
            instrumentation_key: instrumentation_key.into(),
            endpoint_url: COLLECT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = endpoint_url.into();
        self
    }
}

/// Group sizes and counts keyed by group name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventProperties {
    pub size: BTreeMap<String, u64>,
    pub count: BTreeMap<String, u64>,
}

/// A named event with its measurements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelemetryEvent {
    pub name: String,
    pub properties: EventProperties,
}

impl TelemetryEvent {
    /// Build the package metrics event covering every given entry.
    #[must_use]
    pub fn package_metrics(entries: &[EntrySnapshot]) -> Self {
        let mut properties = EventProperties::default();
        for entry in entries {
            properties
                .size
                .insert(entry.name.clone(), entry.total_size);
            properties
                .count
                .insert(entry.name.clone(), entry.total_count);
        }
        Self {
            name: PACKAGE_METRICS_EVENT.to_string(),
            properties,
        }
    }
}

/// Sink for explicitly tracked events.
///
/// Clients only ever send what was passed to `track_event`; nothing is
/// collected implicitly from the console, panics, or the process.
#[async_trait]
pub trait TelemetryClient: Send {
    /// Queue an event for the next flush.
    fn track_event(&mut self, event: TelemetryEvent);

    /// Send all queued events, resolving once the backend has accepted them.
    async fn flush(&mut self) -> TelemetryResult<()>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    name: String,
    time: String,
    i_key: &'a str,
    data: EnvelopeData<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeData<'a> {
    base_type: &'static str,
    base_data: EventData<'a>,
}

#[derive(Debug, Serialize)]
struct EventData<'a> {
    ver: u8,
    name: &'a str,
    properties: &'a EventProperties,
}

fn envelope<'a>(key: &'a str, event: &'a TelemetryEvent, time: String) -> Envelope<'a> {
    let compact_key: String = key.chars().filter(|c| *c != '-').collect();
    Envelope {
        name: format!("Microsoft.ApplicationInsights.{compact_key}.Event"),
        time,
        i_key: key,
        data: EnvelopeData {
            base_type: "EventData",
            base_data: EventData {
                ver: 2,
                name: &event.name,
                properties: &event.properties,
            },
        },
    }
}

/// Client posting Application Insights style envelopes over HTTP(S).
pub struct HttpTelemetryClient {
    config: ClientConfig,
    http: reqwest::Client,
    pending: Vec<TelemetryEvent>,
}

impl HttpTelemetryClient {
    /// Create a client bound to `config`.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> TelemetryResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TelemetryError::ClientFailed { source: e })?;
        Ok(Self {
            config,
            http,
            pending: Vec::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl TelemetryClient for HttpTelemetryClient {
    fn track_event(&mut self, event: TelemetryEvent) {
        self.pending.push(event);
    }

    async fn flush(&mut self) -> TelemetryResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let events = std::mem::take(&mut self.pending);
        let time = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let envelopes: Vec<Envelope<'_>> = events
            .iter()
            .map(|event| envelope(&self.config.instrumentation_key, event, time.clone()))
            .collect();

        let endpoint = &self.config.endpoint_url;
        debug!(endpoint = %endpoint, events = envelopes.len(), "sending telemetry");
        let response = self
            .http
            .post(endpoint)
            .json(&envelopes)
            .send()
            .await
            .map_err(|e| TelemetryError::SendFailed {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TelemetryError::Rejected {
                endpoint: endpoint.clone(),
                status: status.as_u16(),
            });
        }
        debug!(endpoint = %endpoint, status = status.as_u16(), "telemetry accepted");
        Ok(())
    }
}
