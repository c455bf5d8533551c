// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Pass-through pipeline stages that account for every item they forward.

use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};
use tracing::{debug, info};

use super::{Entry, StatsRegistry};
use crate::source::{classify, FileItem};

/// Observes items of one group and forwards them unchanged.
#[derive(Debug)]
pub struct Tap {
    entry: Arc<Entry>,
    log_on_finish: bool,
    finished: bool,
}

impl Tap {
    /// Create a tap bound to the registry entry for `group`.
    pub fn new(registry: &StatsRegistry, group: &str, log_on_finish: bool) -> Self {
        Self {
            entry: registry.get_or_create(group),
            log_on_finish,
            finished: false,
        }
    }

    #[must_use]
    pub fn entry(&self) -> &Arc<Entry> {
        &self.entry
    }

    /// Account for `item` and hand it back.
    pub fn observe<T: FileItem>(&self, item: T) -> T {
        let observation = classify(&item);
        self.entry.record(observation);
        debug!(
            group = self.entry.name(),
            path = item.path(),
            bytes = observation.byte_count,
            "observed item"
        );
        item
    }

    /// Signal that the upstream is exhausted. Only the first call has an effect.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        if self.log_on_finish {
            info!("{}", self.entry.snapshot().pretty());
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Iterator adapter created by [`TapIteratorExt::tap_stats`].
#[derive(Debug)]
pub struct TapIter<I> {
    inner: I,
    tap: Tap,
}

impl<I> TapIter<I> {
    #[must_use]
    pub fn tap(&self) -> &Tap {
        &self.tap
    }
}

impl<I> Iterator for TapIter<I>
where
    I: Iterator,
    I::Item: FileItem,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next() {
            Some(item) => Some(self.tap.observe(item)),
            None => {
                self.tap.finish();
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

pub trait TapIteratorExt: Iterator + Sized {
    /// Route every item through `tap`.
    fn tap_stats(self, tap: Tap) -> TapIter<Self> {
        TapIter { inner: self, tap }
    }
}

impl<I: Iterator> TapIteratorExt for I {}

/// Stream adapter created by [`TapStreamExt::tap_stats`].
#[derive(Debug)]
pub struct TapStream<S> {
    inner: S,
    tap: Tap,
}

impl<S> TapStream<S> {
    #[must_use]
    pub fn tap(&self) -> &Tap {
        &self.tap
    }
}

impl<S> Stream for TapStream<S>
where
    S: Stream + Unpin,
    S::Item: FileItem,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match ready!(Pin::new(&mut this.inner).poll_next(cx)) {
            Some(item) => Poll::Ready(Some(this.tap.observe(item))),
            None => {
                this.tap.finish();
                Poll::Ready(None)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

pub trait TapStreamExt: Stream + Sized {
    /// Route every item through `tap`.
    fn tap_stats(self, tap: Tap) -> TapStream<Self> {
        TapStream { inner: self, tap }
    }
}

impl<S: Stream> TapStreamExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{BuildFile, FileStat};
    use futures::executor::block_on;
    use futures::StreamExt;

    fn items() -> Vec<BuildFile> {
        vec![
            BuildFile::new("a.js").with_contents(vec![1; 10]),
            BuildFile::default().with_stat(FileStat { size: 500 }),
            BuildFile::new("b.js").with_stat(FileStat { size: 20 }),
            BuildFile::new("c.js"),
            BuildFile::new("d.js")
                .with_contents(vec![1; 3])
                .with_stat(FileStat { size: 1000 }),
        ]
    }

    #[test]
    fn test_iter_counts_and_sizes() {
        let registry = StatsRegistry::new();
        let tap = Tap::new(&registry, "out", false);
        let forwarded: Vec<BuildFile> = items().into_iter().tap_stats(tap).collect();
        assert_eq!(forwarded.len(), 5);

        let entry = registry.get("out").unwrap();
        assert_eq!(entry.total_count(), 4);
        assert_eq!(entry.total_size(), 10 + 20 + 3);
    }

    #[test]
    fn test_iter_is_pass_through() {
        let registry = StatsRegistry::new();
        let forwarded: Vec<BuildFile> = items()
            .into_iter()
            .tap_stats(Tap::new(&registry, "out", true))
            .collect();
        assert_eq!(forwarded, items());
    }

    #[test]
    fn test_iter_accounts_before_forwarding() {
        let registry = StatsRegistry::new();
        let files = vec![BuildFile::new("1"), BuildFile::new("2"), BuildFile::new("3")];
        let mut iter = files.into_iter().tap_stats(Tap::new(&registry, "g", false));
        let entry = Arc::clone(iter.tap().entry());
        let mut seen = 0;
        while iter.next().is_some() {
            seen += 1;
            assert_eq!(entry.total_count(), seen);
        }
        assert!(iter.tap().is_finished());
    }

    #[test]
    fn test_zero_items() {
        let registry = StatsRegistry::new();
        let mut iter = Vec::<BuildFile>::new()
            .into_iter()
            .tap_stats(Tap::new(&registry, "empty", true));
        assert!(iter.next().is_none());
        assert!(iter.tap().is_finished());

        let snapshot = registry.get("empty").unwrap().snapshot();
        assert_eq!(snapshot.total_count, 0);
        assert_eq!(snapshot.total_size, 0);
        assert!(!snapshot.is_single_file());
    }

    #[test]
    fn test_finish_is_idempotent() {
        let registry = StatsRegistry::new();
        let mut tap = Tap::new(&registry, "g", true);
        tap.finish();
        tap.finish();
        assert!(tap.is_finished());
    }

    #[test]
    fn test_taps_share_group_entry() {
        let registry = StatsRegistry::new();
        let first = Tap::new(&registry, "shared", false);
        let second = Tap::new(&registry, "shared", false);
        first.observe(BuildFile::new("a").with_stat(FileStat { size: 1 }));
        second.observe(BuildFile::new("b").with_stat(FileStat { size: 2 }));
        let entry = registry.get("shared").unwrap();
        assert_eq!(entry.total_count(), 2);
        assert_eq!(entry.total_size(), 3);
    }

    #[test]
    fn test_stream_counts_and_forwards_in_order() {
        let registry = StatsRegistry::new();
        let stream = futures::stream::iter(items()).tap_stats(Tap::new(&registry, "s", false));
        let forwarded: Vec<BuildFile> = block_on(stream.collect());
        assert_eq!(forwarded, items());

        let entry = registry.get("s").unwrap();
        assert_eq!(entry.total_count(), 4);
        assert_eq!(entry.total_size(), 33);
    }

    #[test]
    fn test_stream_finishes_on_end() {
        let registry = StatsRegistry::new();
        let mut stream =
            futures::stream::iter(Vec::<BuildFile>::new()).tap_stats(Tap::new(&registry, "s", false));
        assert!(block_on(stream.next()).is_none());
        assert!(stream.tap().is_finished());
    }

    #[test]
    fn test_json_items_pass_through() {
        let registry = StatsRegistry::new();
        let values = vec![
            serde_json::json!({"path": "x", "stat": {"size": 4}}),
            serde_json::json!({"name": "not a file"}),
        ];
        let forwarded: Vec<serde_json::Value> = values
            .clone()
            .into_iter()
            .tap_stats(Tap::new(&registry, "json", false))
            .collect();
        assert_eq!(forwarded, values);
        assert_eq!(registry.get("json").unwrap().total_count(), 1);
    }
}
