//! Status-cache merge engine.
//!
//! Each run works out which identifiers are not yet in the snapshot, probes
//! only those, folds the results into the prior records and returns the full
//! list in canonical order. Identifiers already present are never probed
//! again, so the cost of a run is bounded by the window size rather than by
//! the size of the snapshot.
//!
//! The engine does no clock or network access of its own: "today" and the
//! [`Probe`] are passed in.

use crate::feed::{Cadence, FeedSpec};
use crate::probe::{Probe, resolve};
use crate::record::{Record, Status};
use chrono::{Days, NaiveDate};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Upper bound on concurrent probes.
pub const MAX_CONCURRENCY: usize = 16;

/// Result of one merge run.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Full record list in canonical order.
    pub records: Vec<Record>,
    /// Identifiers sent to the probe this run.
    pub probed: usize,
    /// Records added this run.
    pub added: usize,
}

/// An identifier that needs a probe, with its candidate URLs in priority order.
#[derive(Debug, Clone)]
struct Pending {
    identifier: String,
    sequence_number: Option<u64>,
    urls: Vec<String>,
}

impl Pending {
    fn into_record(self, resolved: Option<String>, record_misses: bool) -> Option<Record> {
        let found = resolved.is_some();
        if !found && !record_misses {
            return None;
        }
        let url = match resolved {
            Some(url) => url,
            None => self.urls.into_iter().next()?,
        };

        let record = Record::new(self.identifier, url, Status::from_found(found));
        Some(match self.sequence_number {
            Some(n) => record.with_sequence(n),
            None => record,
        })
    }
}

/// Merges fresh probe results into a feed's snapshot.
#[derive(Clone)]
pub struct MergeEngine {
    probe: Arc<dyn Probe>,
    max_concurrency: usize,
}

impl MergeEngine {
    /// Engine that probes one identifier at a time.
    pub fn new(probe: Arc<dyn Probe>) -> Self {
        Self { probe, max_concurrency: 1 }
    }

    /// Allow up to `n` probes in flight, clamped to `1..=MAX_CONCURRENCY`.
    pub fn with_max_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = n.clamp(1, MAX_CONCURRENCY);
        self
    }

    /// Run one update of `feed` against `prior`, as of `today`.
    pub async fn merge(&self, feed: &FeedSpec, prior: Vec<Record>, today: NaiveDate) -> MergeOutcome {
        let mut store: HashMap<String, Record> = HashMap::with_capacity(prior.len());
        for record in prior {
            store.insert(record.identifier.clone(), record);
        }
        let before = store.len();

        let pending = pending_identifiers(feed, &store, today);
        let probed = pending.len();
        tracing::debug!(feed = %feed.name, probed, known = before, "probing");

        for (pending, resolved) in self.probe_all(pending).await {
            if let Some(record) = pending.into_record(resolved, feed.record_misses) {
                store.insert(record.identifier.clone(), record);
            }
        }

        let mut records: Vec<Record> = store.into_values().collect();
        canonical_sort(&feed.cadence, &mut records);
        let added = records.len() - before;

        tracing::info!(feed = %feed.name, probed, added, total = records.len(), "merge complete");
        MergeOutcome { records, probed, added }
    }

    async fn probe_all(&self, pending: Vec<Pending>) -> Vec<(Pending, Option<String>)> {
        if self.max_concurrency <= 1 || pending.len() <= 1 {
            let mut results = Vec::with_capacity(pending.len());
            for item in pending {
                let resolved = resolve(self.probe.as_ref(), &item.urls).await;
                results.push((item, resolved));
            }
            return results;
        }

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut join_set = JoinSet::new();
        let total = pending.len();

        for item in pending {
            let probe = Arc::clone(&self.probe);
            let semaphore = Arc::clone(&semaphore);
            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let resolved = resolve(probe.as_ref(), &item.urls).await;
                (item, resolved)
            });
        }

        let mut results = Vec::with_capacity(total);
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => tracing::warn!(error = %e, "probe task failed; identifier left for the next run"),
            }
        }
        results
    }
}

/// Identifiers the cadence wants this run that are not already stored.
fn pending_identifiers(feed: &FeedSpec, store: &HashMap<String, Record>, today: NaiveDate) -> Vec<Pending> {
    match &feed.cadence {
        Cadence::Lookback { days } => (0..u64::from(*days))
            .map_while(|i| today.checked_sub_days(Days::new(i + 1)))
            .map(|date| date.format("%Y-%m-%d").to_string())
            .filter(|id| !store.contains_key(id))
            .map(|id| Pending { urls: feed.candidate_urls(&id), identifier: id, sequence_number: None })
            .collect(),
        Cadence::Frontier { label } => {
            let latest = store.values().filter_map(|r| r.sequence_number).max().unwrap_or(0);
            let Some(next) = latest.checked_add(1) else {
                return Vec::new();
            };
            let identifier = format!("{label} {next}");
            if store.contains_key(&identifier) {
                return Vec::new();
            }
            vec![Pending { urls: feed.candidate_urls(&next.to_string()), identifier, sequence_number: Some(next) }]
        }
    }
}

/// Most recent first. Total over any input: records whose key cannot be
/// interpreted sort after all interpretable ones, then by identifier.
pub fn canonical_sort(cadence: &Cadence, records: &mut [Record]) {
    match cadence {
        Cadence::Lookback { .. } => records.sort_by(|a, b| date_key(b).cmp(&date_key(a))),
        Cadence::Frontier { .. } => records.sort_by(|a, b| {
            (b.sequence_number, b.identifier.as_str()).cmp(&(a.sequence_number, a.identifier.as_str()))
        }),
    }
}

fn date_key(record: &Record) -> (Option<NaiveDate>, &str) {
    (NaiveDate::parse_from_str(&record.identifier, "%Y-%m-%d").ok(), record.identifier.as_str())
}
