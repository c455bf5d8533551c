// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "build_stats")]
#[command(version)]
#[command(about = "Reports file counts and sizes for groups of build output")]
pub(crate) struct Args {
    /// Groups to account for, as NAME=DIR or DIR (named after the directory).
    #[arg(required = true)]
    pub groups: Vec<GroupSpec>,

    #[arg(
        long,
        long_help = "Path to the product.json of the build.\n\
                Statistics are uploaded as telemetry only if it defines\n\
                a non-empty aiConfig.asimovKey."
    )]
    pub product: Option<PathBuf>,

    /// Log a summary line as soon as each group has been processed.
    #[arg(long)]
    pub log: bool,

    /// Load file contents into memory instead of using metadata sizes.
    #[arg(long)]
    pub read_contents: bool,

    /// Also print the statistics as a table.
    #[arg(long)]
    pub table: bool,

    /// Path to write the statistics in JSON format.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// A named directory to account for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GroupSpec {
    pub name: String,
    pub dir: PathBuf,
}

impl FromStr for GroupSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((name, dir)) = s.split_once('=') {
            if name.is_empty() || dir.is_empty() {
                return Err(format!("expected NAME=DIR, got '{s}'"));
            }
            return Ok(Self {
                name: name.to_string(),
                dir: PathBuf::from(dir),
            });
        }
        let dir = PathBuf::from(s);
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| format!("cannot derive a group name from '{s}'"))?;
        Ok(Self { name, dir })
    }
}
