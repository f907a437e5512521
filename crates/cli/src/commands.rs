//! Subcommand implementations.

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use clap::ValueEnum;
use podcheck_client::{HttpProbe, ProbeConfig};
use podcheck_core::merge::canonical_sort;
use podcheck_core::{AppConfig, FeedSpec, MergeEngine, Probe, Record, SnapshotStore, TriggerWindow};

use crate::output;

/// One of the two configured feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FeedKind {
    Lookback,
    Frontier,
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedKind::Lookback => f.write_str("lookback"),
            FeedKind::Frontier => f.write_str("frontier"),
        }
    }
}

/// Which feeds `run` should touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FeedSelector {
    All,
    Lookback,
    Frontier,
}

impl FeedSelector {
    fn includes(self, kind: FeedKind) -> bool {
        match self {
            FeedSelector::All => true,
            FeedSelector::Lookback => kind == FeedKind::Lookback,
            FeedSelector::Frontier => kind == FeedKind::Frontier,
        }
    }
}

/// A configured feed ready to be merged.
#[derive(Debug, Clone)]
pub struct FeedJob {
    pub kind: FeedKind,
    pub spec: FeedSpec,
    pub store: SnapshotStore,
    pub trigger: TriggerWindow,
}

impl FeedJob {
    fn from_config(config: &AppConfig, kind: FeedKind) -> Result<Self> {
        let job = match kind {
            FeedKind::Lookback => Self {
                kind,
                spec: config.lookback.feed_spec()?,
                store: SnapshotStore::new(&config.lookback.snapshot_path),
                trigger: TriggerWindow::default(),
            },
            FeedKind::Frontier => Self {
                kind,
                spec: config.frontier.feed_spec()?,
                store: SnapshotStore::new(&config.frontier.snapshot_path),
                trigger: config.frontier.trigger,
            },
        };
        Ok(job)
    }

    fn enabled(config: &AppConfig, kind: FeedKind) -> bool {
        match kind {
            FeedKind::Lookback => config.lookback.enabled,
            FeedKind::Frontier => config.frontier.enabled,
        }
    }
}

/// What happened to one feed during `run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunSummary {
    Updated { kind: FeedKind, probed: usize, added: usize, total: usize },
    Skipped { kind: FeedKind },
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunSummary::Updated { kind, probed, added, total } => {
                write!(f, "{kind}: probed {probed}, added {added}, {total} records")
            }
            RunSummary::Skipped { kind } => write!(f, "{kind}: skipped (outside trigger window)"),
        }
    }
}

fn selected_jobs(config: &AppConfig, selector: FeedSelector) -> Result<Vec<FeedJob>> {
    let mut jobs = Vec::new();
    for kind in [FeedKind::Lookback, FeedKind::Frontier] {
        if !selector.includes(kind) {
            continue;
        }
        if !FeedJob::enabled(config, kind) {
            if selector != FeedSelector::All {
                bail!("the {kind} feed is disabled in the configuration");
            }
            continue;
        }
        jobs.push(FeedJob::from_config(config, kind)?);
    }
    Ok(jobs)
}

/// `podcheck run`: probe with the HTTP client and persist.
pub async fn run(config: &AppConfig, selector: FeedSelector, force: bool, now: NaiveDateTime) -> Result<Vec<RunSummary>> {
    let jobs = selected_jobs(config, selector)?;
    if jobs.is_empty() {
        tracing::warn!("no feeds enabled, nothing to do");
        return Ok(Vec::new());
    }

    let probe: Arc<dyn Probe> = Arc::new(HttpProbe::new(ProbeConfig::from(config))?);
    let engine = MergeEngine::new(probe).with_max_concurrency(config.max_concurrency);
    run_jobs(&engine, &jobs, force, now).await
}

/// Load every snapshot up front, then merge and save feed by feed.
///
/// A bad snapshot aborts before any probe is sent. A failed save aborts the
/// remaining feeds; the file that failed keeps its previous contents.
pub async fn run_jobs(engine: &MergeEngine, jobs: &[FeedJob], force: bool, now: NaiveDateTime) -> Result<Vec<RunSummary>> {
    let mut loaded = Vec::with_capacity(jobs.len());
    for job in jobs {
        let records = job
            .store
            .load()
            .with_context(|| format!("loading {} snapshot", job.kind))?;
        loaded.push(records);
    }

    let mut summaries = Vec::with_capacity(jobs.len());
    for (job, prior) in jobs.iter().zip(loaded) {
        if !force && !job.trigger.allows(now) {
            tracing::info!(feed = %job.kind, %now, "outside trigger window, skipping");
            summaries.push(RunSummary::Skipped { kind: job.kind });
            continue;
        }

        let outcome = engine.merge(&job.spec, prior, now.date()).await;
        job.store
            .save(&outcome.records)
            .with_context(|| format!("saving {} snapshot", job.kind))?;

        summaries.push(RunSummary::Updated {
            kind: job.kind,
            probed: outcome.probed,
            added: outcome.added,
            total: outcome.records.len(),
        });
    }
    Ok(summaries)
}

/// `podcheck show`: stored records in canonical order, as a table or JSON.
pub fn show(config: &AppConfig, kind: FeedKind, json: bool) -> Result<String> {
    let job = FeedJob::from_config(config, kind)?;
    let mut records: Vec<Record> = job.store.load()?;
    canonical_sort(&job.spec.cadence, &mut records);

    if json {
        let mut text = serde_json::to_string_pretty(&records)?;
        text.push('\n');
        Ok(text)
    } else {
        Ok(output::render_table(&records))
    }
}

/// `podcheck forget`: returns whether a record was removed.
pub fn forget(config: &AppConfig, kind: FeedKind, identifier: &str) -> Result<bool> {
    let job = FeedJob::from_config(config, kind)?;
    let removed = job.store.forget(identifier)?;
    if let Some(record) = &removed {
        tracing::info!(feed = %kind, identifier, status = %record.status, "record forgotten");
    }
    Ok(removed.is_some())
}
