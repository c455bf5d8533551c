// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Concrete pipeline items: the crate's own `BuildFile` and loosely typed JSON items.

use serde::Serialize;
use serde_json::Value;

use super::FileItem;

/// Metadata reported by the filesystem for a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FileStat {
    pub size: u64,
}

/// A file flowing through a build pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildFile {
    path: Option<String>,
    #[serde(skip)]
    contents: Option<Vec<u8>>,
    stat: Option<FileStat>,
}

impl BuildFile {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_contents(mut self, contents: Vec<u8>) -> Self {
        self.contents = Some(contents);
        self
    }

    #[must_use]
    pub fn with_stat(mut self, stat: FileStat) -> Self {
        self.stat = Some(stat);
        self
    }

    #[must_use]
    pub fn stat(&self) -> Option<FileStat> {
        self.stat
    }
}

impl FileItem for BuildFile {
    fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn contents(&self) -> Option<&[u8]> {
        self.contents.as_deref()
    }

    fn stat_size(&self) -> Option<u64> {
        self.stat.map(|stat| stat.size)
    }
}

/// JSON items are inspected field by field; anything of the wrong type is treated as absent.
impl FileItem for Value {
    fn path(&self) -> Option<&str> {
        self.get("path").and_then(Value::as_str)
    }

    fn contents(&self) -> Option<&[u8]> {
        self.get("contents")
            .and_then(Value::as_str)
            .map(str::as_bytes)
    }

    fn stat_size(&self) -> Option<u64> {
        let size = self.get("stat")?.get("size")?;
        size.as_u64().or_else(|| {
            size.as_f64()
                .filter(|s| s.is_finite() && *s >= 0.0)
                .map(|s| s as u64)
        })
    }
}
