// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Reads the product configuration that decides whether telemetry is sent.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Read a product configuration file.
///
/// The file is kept as loose JSON: only the telemetry key is ever consumed.
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn load_product_json<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read product file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse product file: {}", path.display()))
}

/// The telemetry key configured at `aiConfig.asimovKey`.
///
/// Returns `None` (telemetry off) when the configuration is absent, the key is
/// missing, not a string, or empty.
#[must_use]
pub fn telemetry_key(product_json: Option<&Value>) -> Option<&str> {
    product_json?
        .get("aiConfig")?
        .get("asimovKey")?
        .as_str()
        .filter(|key| !key.is_empty())
}
