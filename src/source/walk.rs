// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Produces `BuildFile`s from a directory on disk.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use super::files::{BuildFile, FileStat};

/// Result type for source operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Errors that can occur while collecting files for a group.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to walk directory: {path:?}")]
    WalkDirFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("Failed to read metadata: {path:?}")]
    MetadataFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read file: {path:?}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Walk `root` and collect every regular file below it, sorted by file name.
///
/// With `read_contents` the files are loaded into memory, otherwise only their
/// metadata size is recorded.
///
/// # Errors
/// Returns an error if the directory cannot be walked or a file cannot be read.
pub fn walk_group(root: &Path, read_contents: bool) -> SourceResult<Vec<BuildFile>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let e = entry.map_err(|e| SourceError::WalkDirFailed {
            path: root.to_path_buf(),
            source: e,
        })?;
        if !e.file_type().is_file() {
            continue;
        }
        let path = e.path();
        let metadata = e.metadata().map_err(|e| SourceError::MetadataFailed {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        let mut file = BuildFile::new(path.to_string_lossy()).with_stat(FileStat {
            size: metadata.len(),
        });
        if read_contents {
            let contents = fs::read(path).map_err(|e| SourceError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
            file = file.with_contents(contents);
        }
        files.push(file);
    }
    debug!(root = %root.display(), files = files.len(), "walked group directory");
    Ok(files)
}
