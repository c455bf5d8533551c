// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Per-group file count and size accounting for a single build invocation.

mod format;
mod tap;

pub use format::{kilobytes, CountFlag, PrettyStats, KB_DIVISOR};
pub use tap::{Tap, TapIter, TapIteratorExt, TapStream, TapStreamExt};

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::source::Observation;

/// Accumulating count and size record for one group.
#[derive(Debug)]
pub struct Entry {
    name: String,
    total_count: AtomicU64,
    total_size: AtomicU64,
}

impl Entry {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            total_count: AtomicU64::new(0),
            total_size: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.total_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.total_size.load(Ordering::Relaxed)
    }

    /// Account for one observed item. Items without a path are ignored.
    pub(crate) fn record(&self, observation: Observation) {
        if !observation.has_path {
            return;
        }
        self.total_count.fetch_add(1, Ordering::Relaxed);
        self.total_size
            .fetch_add(observation.size_or_zero(), Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> EntrySnapshot {
        EntrySnapshot {
            name: self.name.clone(),
            total_count: self.total_count(),
            total_size: self.total_size(),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.snapshot(), f)
    }
}

/// Immutable copy of an entry taken at report time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySnapshot {
    pub name: String,
    pub total_count: u64,
    pub total_size: u64,
}

impl EntrySnapshot {
    #[must_use]
    pub fn is_single_file(&self) -> bool {
        self.total_count == 1
    }
}

#[derive(Default)]
struct Entries {
    index: HashMap<String, usize>,
    ordered: Vec<Arc<Entry>>,
}

/// Registry of all groups seen during one build invocation.
///
/// Entries are handed out as `Arc`s so taps can update them without going
/// through the registry again; iteration follows insertion order.
#[derive(Default)]
pub struct StatsRegistry {
    entries: Mutex<Entries>,
}

impl StatsRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the entry for `group`, creating an empty one on first use.
    pub fn get_or_create(&self, group: &str) -> Arc<Entry> {
        let mut entries = self.lock();
        if let Some(&position) = entries.index.get(group) {
            return Arc::clone(&entries.ordered[position]);
        }
        let entry = Arc::new(Entry::new(group));
        let position = entries.ordered.len();
        entries.ordered.push(Arc::clone(&entry));
        entries.index.insert(group.to_string(), position);
        entry
    }

    /// Look up the entry for `group` without creating it.
    #[must_use]
    pub fn get(&self, group: &str) -> Option<Arc<Entry>> {
        let entries = self.lock();
        entries
            .index
            .get(group)
            .map(|&position| Arc::clone(&entries.ordered[position]))
    }

    /// Copy all entries in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<EntrySnapshot> {
        self.lock().ordered.iter().map(|e| e.snapshot()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().ordered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The counters stay consistent even if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observed(byte_count: Option<u64>) -> Observation {
        Observation {
            has_path: true,
            byte_count,
        }
    }

    #[test]
    fn test_get_or_create_starts_empty() {
        let registry = StatsRegistry::new();
        let entry = registry.get_or_create("out-build");
        assert_eq!(entry.name(), "out-build");
        assert_eq!(entry.total_count(), 0);
        assert_eq!(entry.total_size(), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_or_create_returns_existing() {
        let registry = StatsRegistry::new();
        let first = registry.get_or_create("group");
        first.record(observed(Some(5)));
        let second = registry.get_or_create("group");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.total_count(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_does_not_create() {
        let registry = StatsRegistry::new();
        assert!(registry.get("missing").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_record_ignores_items_without_path() {
        let registry = StatsRegistry::new();
        let entry = registry.get_or_create("group");
        entry.record(Observation {
            has_path: false,
            byte_count: Some(100),
        });
        assert_eq!(entry.total_count(), 0);
        assert_eq!(entry.total_size(), 0);
    }

    #[test]
    fn test_record_unknown_size_counts_file() {
        let registry = StatsRegistry::new();
        let entry = registry.get_or_create("group");
        entry.record(observed(None));
        entry.record(observed(Some(7)));
        assert_eq!(entry.total_count(), 2);
        assert_eq!(entry.total_size(), 7);
    }

    #[test]
    fn test_snapshot_preserves_insertion_order() {
        let registry = StatsRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.get_or_create(name);
        }
        registry.get_or_create("alpha");
        let names: Vec<String> = registry.snapshot().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_independent_registries() {
        let first = StatsRegistry::new();
        let second = StatsRegistry::new();
        first.get_or_create("group").record(observed(Some(1)));
        assert_eq!(second.get_or_create("group").total_count(), 0);
    }
}
