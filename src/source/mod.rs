// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Describes the files flowing through a build pipeline and how their size is determined.

mod files;
mod walk;

pub use files::{BuildFile, FileStat};
pub use walk::{walk_group, SourceError, SourceResult};

/// Read-only view of an item flowing through a build pipeline.
///
/// Every field is optional: pipelines carry directories, virtual entries and
/// streamed files next to plain files, and the tap must tolerate all of them.
pub trait FileItem {
    /// Path-like identifier of the item, if it has one.
    fn path(&self) -> Option<&str>;

    /// In-memory contents, if the item has been materialized.
    fn contents(&self) -> Option<&[u8]> {
        None
    }

    /// Size reported by filesystem metadata, if known.
    fn stat_size(&self) -> Option<u64> {
        None
    }
}

/// What the tap learns from a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub has_path: bool,
    pub byte_count: Option<u64>,
}

impl Observation {
    /// Bytes to account for this item. Unknown sizes contribute nothing.
    #[must_use]
    pub fn size_or_zero(&self) -> u64 {
        self.byte_count.unwrap_or(0)
    }
}

/// Classify an item: contents length wins over the metadata size.
#[must_use]
pub fn classify<T: FileItem + ?Sized>(item: &T) -> Observation {
    let byte_count = item
        .contents()
        .map(|contents| contents.len() as u64)
        .or_else(|| item.stat_size());
    Observation {
        has_path: item.path().is_some(),
        byte_count,
    }
}

impl<T: FileItem + ?Sized> FileItem for &T {
    fn path(&self) -> Option<&str> {
        (**self).path()
    }

    fn contents(&self) -> Option<&[u8]> {
        (**self).contents()
    }

    fn stat_size(&self) -> Option<u64> {
        (**self).stat_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Virtual;

    impl FileItem for Virtual {
        fn path(&self) -> Option<&str> {
            Some("virtual.txt")
        }
    }

    #[test]
    fn test_contents_take_priority_over_stat() {
        let file = BuildFile::new("a.js")
            .with_contents(vec![0; 10])
            .with_stat(FileStat { size: 999 });
        assert_eq!(
            classify(&file),
            Observation {
                has_path: true,
                byte_count: Some(10)
            }
        );
    }

    #[test]
    fn test_stat_used_without_contents() {
        let file = BuildFile::new("a.js").with_stat(FileStat { size: 42 });
        assert_eq!(classify(&file).byte_count, Some(42));
    }

    #[test]
    fn test_unknown_size_still_has_path() {
        let observation = classify(&Virtual);
        assert!(observation.has_path);
        assert_eq!(observation.byte_count, None);
        assert_eq!(observation.size_or_zero(), 0);
    }

    #[test]
    fn test_no_path() {
        let observation = classify(&BuildFile::default());
        assert!(!observation.has_path);
    }

    #[test]
    fn test_classify_through_reference() {
        let file = BuildFile::new("b.css").with_contents(b"body{}".to_vec());
        let by_ref = &file;
        assert_eq!(classify(&by_ref).byte_count, Some(6));
    }
}
