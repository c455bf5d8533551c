// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Human-readable renderings of group statistics.

use crossterm::style::Stylize;
use std::fmt;

use super::EntrySnapshot;

/// Divisor used to turn byte totals into the reported "KB" figure.
///
/// Not 1024: existing dashboards compare against numbers produced with this value.
pub const KB_DIVISOR: f64 = 1204.0;

/// Counts at or above this value are flagged.
const MANY_FILES: u64 = 100;

/// Reported size for `total_size` bytes, rounded half up.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn kilobytes(total_size: u64) -> u64 {
    (total_size as f64 / KB_DIVISOR).round() as u64
}

/// Visual flag for a group's file count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountFlag {
    Normal,
    Many,
}

impl CountFlag {
    #[must_use]
    pub fn for_count(count: u64) -> Self {
        if count < MANY_FILES {
            Self::Normal
        } else {
            Self::Many
        }
    }
}

/// `Stats for '<name>': ...` line for one group.
pub struct PrettyStats<'a> {
    entry: &'a EntrySnapshot,
    colored: bool,
}

impl fmt::Display for PrettyStats<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.entry.name.as_str();
        let kb = kilobytes(self.entry.total_size);
        if !self.colored {
            return if self.entry.is_single_file() {
                write!(f, "Stats for '{name}': {kb}KB")
            } else {
                write!(
                    f,
                    "Stats for '{name}': {} files, {kb}KB",
                    self.entry.total_count
                )
            };
        }

        if self.entry.is_single_file() {
            write!(f, "Stats for '{}': {kb}KB", name.grey())
        } else {
            let count = self.entry.total_count.to_string();
            let count = match self.entry.count_flag() {
                CountFlag::Normal => count.green(),
                CountFlag::Many => count.red(),
            };
            write!(f, "Stats for '{}': {count} files, {kb}KB", name.grey())
        }
    }
}

impl EntrySnapshot {
    #[must_use]
    pub fn count_flag(&self) -> CountFlag {
        CountFlag::for_count(self.total_count)
    }

    /// Colored summary line, as printed to the console.
    #[must_use]
    pub fn pretty(&self) -> PrettyStats<'_> {
        PrettyStats {
            entry: self,
            colored: true,
        }
    }

    /// The same summary line without terminal styling.
    #[must_use]
    pub fn pretty_plain(&self) -> PrettyStats<'_> {
        PrettyStats {
            entry: self,
            colored: false,
        }
    }
}

impl fmt::Display for EntrySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_file() {
            write!(f, "{}: {} bytes", self.name, self.total_size)
        } else {
            write!(
                f,
                "{}: {} files with {} bytes",
                self.name, self.total_count, self.total_size
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(name: &str, total_count: u64, total_size: u64) -> EntrySnapshot {
        EntrySnapshot {
            name: name.to_string(),
            total_count,
            total_size,
        }
    }

    #[test]
    fn test_kilobytes_uses_legacy_divisor() {
        assert_eq!(kilobytes(0), 0);
        assert_eq!(kilobytes(1204), 1);
        assert_eq!(kilobytes(2408), 2);
        assert_eq!(kilobytes(1024), 1);
        assert_eq!(kilobytes(601), 0);
        assert_eq!(kilobytes(602), 1);
    }

    #[test]
    fn test_pretty_single_file() {
        let entry = snapshot("A", 1, 1204);
        assert_eq!(entry.pretty_plain().to_string(), "Stats for 'A': 1KB");
    }

    #[test]
    fn test_pretty_many_files() {
        let entry = snapshot("B", 150, 2408);
        assert_eq!(
            entry.pretty_plain().to_string(),
            "Stats for 'B': 150 files, 2KB"
        );
        assert_eq!(entry.count_flag(), CountFlag::Many);
    }

    #[test]
    fn test_count_flag_threshold() {
        assert_eq!(CountFlag::for_count(0), CountFlag::Normal);
        assert_eq!(CountFlag::for_count(99), CountFlag::Normal);
        assert_eq!(CountFlag::for_count(100), CountFlag::Many);
    }

    #[test]
    fn test_pretty_zero_files_is_plural() {
        let entry = snapshot("empty", 0, 0);
        assert_eq!(
            entry.pretty_plain().to_string(),
            "Stats for 'empty': 0 files, 0KB"
        );
    }

    #[test]
    fn test_colored_keeps_text() {
        let line = snapshot("B", 150, 2408).pretty().to_string();
        assert!(line.contains("B"));
        assert!(line.contains("150"));
        assert!(line.ends_with("files, 2KB"));
    }

    #[test]
    fn test_plain_display() {
        assert_eq!(snapshot("A", 1, 10).to_string(), "A: 10 bytes");
        assert_eq!(
            snapshot("B", 3, 30).to_string(),
            "B: 3 files with 30 bytes"
        );
    }
}
