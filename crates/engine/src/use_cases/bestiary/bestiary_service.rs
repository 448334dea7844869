//! Bestiary service: syncs raw documents into assembled monsters.
//!
//! Documents are fetched from a [`DocumentSource`], parsed in parallel on the
//! blocking pool and kept in memory keyed by document name. Parses share
//! nothing except the diagnostics sink.

use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde_json::Value;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;

use bestiary_domain::{ItemKind, Monster};

use crate::infrastructure::importers::MonsterImporter;
use crate::infrastructure::ports::{DiagnosticsSink, DocumentSource, SourceError};

/// Errors that abort a whole sync.
#[derive(Debug, Error)]
pub enum BestiaryError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Outcome of one sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Documents assembled into monsters
    pub parsed: usize,
    /// Documents that could not be fetched or decoded
    pub failed: usize,
    /// Diagnostics recorded while parsing
    pub diagnostics: usize,
}

/// Filter criteria for monster queries.
#[derive(Debug, Clone, Default)]
pub struct BestiaryFilter {
    pub level_min: Option<i32>,
    pub level_max: Option<i32>,
    /// Creature trait, e.g. "dragon"
    pub trait_name: Option<String>,
    /// Text search in the name
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl BestiaryFilter {
    pub fn matches(&self, monster: &Monster) -> bool {
        if self.level_min.is_some_and(|min| monster.level < min) {
            return false;
        }
        if self.level_max.is_some_and(|max| monster.level > max) {
            return false;
        }

        if let Some(ref trait_name) = self.trait_name {
            if !monster
                .traits
                .traits
                .iter()
                .any(|t| t.eq_ignore_ascii_case(trait_name))
            {
                return false;
            }
        }

        if let Some(ref search) = self.search {
            if !monster
                .name
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }

        true
    }
}

/// Counts diagnostics on their way to the real sink.
struct CountingDiagnostics {
    inner: Arc<dyn DiagnosticsSink>,
    count: AtomicUsize,
}

impl DiagnosticsSink for CountingDiagnostics {
    fn record(&self, kind: &ItemKind, fragment: &Value, reason: &str) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.inner.record(kind, fragment, reason);
    }
}

/// Service holding every monster assembled from a source.
pub struct BestiaryService {
    source: Arc<dyn DocumentSource>,
    diagnostics: Arc<CountingDiagnostics>,
    importer: MonsterImporter,
    /// Monsters by document name.
    monsters: DashMap<String, Monster>,
    output_path: Option<PathBuf>,
}

impl BestiaryService {
    pub fn new(source: Arc<dyn DocumentSource>, sink: Arc<dyn DiagnosticsSink>) -> Self {
        let diagnostics = Arc::new(CountingDiagnostics {
            inner: sink,
            count: AtomicUsize::new(0),
        });
        Self {
            source,
            importer: MonsterImporter::new(diagnostics.clone()),
            diagnostics,
            monsters: DashMap::new(),
            output_path: None,
        }
    }

    /// Also write each assembled monster as pretty JSON into `path`.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Fetch and parse every document the source lists.
    ///
    /// A document that cannot be fetched or decoded is counted as failed and
    /// the sync carries on; only a failure to list the source aborts.
    pub async fn sync(&self) -> Result<SyncReport, BestiaryError> {
        let names = self.source.list().await?;
        tracing::info!(
            source = %self.source.describe(),
            documents = names.len(),
            "Syncing bestiary"
        );

        if let Some(ref dir) = self.output_path {
            tokio::fs::create_dir_all(dir).await?;
        }

        let diagnostics_before = self.diagnostics.count.load(Ordering::Relaxed);
        let mut report = SyncReport::default();
        let mut current: HashSet<String> = HashSet::new();
        let mut parses = JoinSet::new();

        for name in names {
            match self.source.fetch(&name).await {
                Ok(document) => {
                    let importer = self.importer.clone();
                    parses.spawn_blocking(move || {
                        let result = importer.import(&document);
                        (name, result)
                    });
                }
                Err(e) => {
                    tracing::warn!(document = %name, error = %e, "Failed to fetch document");
                    report.failed += 1;
                }
            }
        }

        while let Some(joined) = parses.join_next().await {
            match joined {
                Ok((name, Ok(monster))) => {
                    if let Some(ref dir) = self.output_path {
                        write_monster(dir, &name, &monster).await;
                    }
                    current.insert(name.clone());
                    self.monsters.insert(name, monster);
                    report.parsed += 1;
                }
                Ok((name, Err(e))) => {
                    tracing::warn!(document = %name, error = %e, "Failed to import document");
                    report.failed += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Parse task failed");
                    report.failed += 1;
                }
            }
        }

        // Documents gone from the source, or failing this run, stop being served
        let before = self.monsters.len();
        self.monsters.retain(|name, _| current.contains(name));
        let evicted = before.saturating_sub(self.monsters.len());
        if evicted > 0 {
            tracing::info!(evicted, "Evicted monsters no longer in the source");
        }

        report.diagnostics = self
            .diagnostics
            .count
            .load(Ordering::Relaxed)
            .saturating_sub(diagnostics_before);

        tracing::info!(
            parsed = report.parsed,
            failed = report.failed,
            diagnostics = report.diagnostics,
            "Bestiary sync complete"
        );
        Ok(report)
    }

    /// Sync every `period` until `shutdown` completes. Returns the number of
    /// syncs run; the first one starts immediately.
    pub async fn run_periodic(&self, period: Duration, shutdown: impl Future<Output = ()>) -> usize {
        tokio::pin!(shutdown);
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut runs = 0;
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!(runs, "Stopping periodic bestiary sync");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.sync().await {
                        tracing::error!(error = %e, "Bestiary sync failed");
                    }
                    runs += 1;
                }
            }
        }
        runs
    }

    // === Queries ===

    /// Monster parsed from the named document.
    pub fn get(&self, document: &str) -> Option<Monster> {
        self.monsters.get(document).map(|r| r.value().clone())
    }

    /// Find a monster by its own name, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<Monster> {
        self.monsters
            .iter()
            .find(|r| r.value().name.eq_ignore_ascii_case(name))
            .map(|r| r.value().clone())
    }

    /// Monsters matching `filter`, ordered by level then name.
    pub fn search(&self, filter: &BestiaryFilter) -> Vec<Monster> {
        let mut matching: Vec<Monster> = self
            .monsters
            .iter()
            .filter(|r| filter.matches(r.value()))
            .map(|r| r.value().clone())
            .collect();
        matching.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.name.cmp(&b.name)));

        match filter.limit {
            Some(limit) => matching.into_iter().take(limit).collect(),
            None => matching,
        }
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }
}

async fn write_monster(dir: &Path, name: &str, monster: &Monster) {
    let path = dir.join(name);
    let result = match serde_json::to_vec_pretty(monster) {
        Ok(bytes) => tokio::fs::write(&path, bytes).await,
        Err(e) => Err(e.into()),
    };
    if let Err(e) = result {
        tracing::warn!(path = %path.display(), error = %e, "Failed to write monster");
    }
}
