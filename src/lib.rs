// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Per-group file statistics for build pipelines.
//!
//! This crate provides functionality to:
//! - Tap iterators and streams of build files without altering them
//! - Accumulate file counts and byte sizes per named group
//! - Print a summary of all groups to the console
//! - Upload the summary as a telemetry event when the product enables it

pub mod report;
pub mod source;
pub mod stats;

// Re-export key types for convenience
pub use report::{submit_all_stats, submit_all_stats_with, TelemetryClient, TelemetryError};
pub use source::{BuildFile, FileItem, FileStat};
pub use stats::{Entry, EntrySnapshot, StatsRegistry, Tap, TapIteratorExt, TapStreamExt};
