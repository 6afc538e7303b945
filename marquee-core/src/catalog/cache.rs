use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use chrono::{DateTime, Utc};
use marquee_model::{CatalogEntity, CatalogKind, EntityId, fold_name};
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::api::CatalogApi;
use crate::error::ApiError;

const REPORT_CHANNEL_CAPACITY: usize = 16;

/// Immutable snapshot of one reference catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    kind: CatalogKind,
    entries: HashMap<EntityId, CatalogEntity>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl Catalog {
    pub fn empty(kind: CatalogKind) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
            refreshed_at: None,
        }
    }

    /// Build a catalog from a full listing. A repeated id keeps the last
    /// entry seen.
    pub fn from_entities(
        kind: CatalogKind,
        entities: impl IntoIterator<Item = CatalogEntity>,
        refreshed_at: DateTime<Utc>,
    ) -> Self {
        let entries = entities
            .into_iter()
            .map(|entity| (entity.id.clone(), entity))
            .collect();
        Self {
            kind,
            entries,
            refreshed_at: Some(refreshed_at),
        }
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    pub fn get(&self, id: &EntityId) -> Option<&CatalogEntity> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntity> {
        self.entries.values()
    }

    /// Time of the refresh that produced this snapshot; `None` until the
    /// first successful fetch.
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Every entry ordered by name, then id.
    pub fn sorted_by_name(&self) -> Vec<CatalogEntity> {
        let mut entities: Vec<CatalogEntity> =
            self.entries.values().cloned().collect();
        entities.sort_by(|a, b| {
            fold_name(&a.name)
                .cmp(&fold_name(&b.name))
                .then_with(|| compare_ids(&a.id, &b.id))
        });
        entities
    }

    /// Entities matching the given names, in the order the names are given.
    ///
    /// Matching ignores case and surrounding whitespace. Names with no match
    /// are skipped, a name listed twice yields its entity once, and when
    /// several entities share a name the lowest id wins.
    pub fn select_by_names<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Vec<CatalogEntity> {
        let mut selected: Vec<CatalogEntity> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let best = self
                .entries
                .values()
                .filter(|entity| entity.matches_name(name))
                .min_by(|a, b| compare_ids(&a.id, &b.id));

            if let Some(entity) = best
                && !selected.iter().any(|chosen| chosen.id == entity.id)
            {
                selected.push(entity.clone());
            }
        }
        selected
    }
}

/// Order ids numerically when both are numeric, textually otherwise.
pub fn compare_ids(a: &EntityId, b: &EntityId) -> Ordering {
    match (a.as_str().parse::<u64>(), b.as_str().parse::<u64>()) {
        (Ok(left), Ok(right)) => left.cmp(&right),
        _ => a.as_str().cmp(b.as_str()),
    }
}

/// Result of refreshing one catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOutcome {
    Replaced { entries: usize },
    /// The fetch failed and the previous snapshot was kept.
    Retained { error: ApiError },
}

impl CatalogOutcome {
    pub fn is_replaced(&self) -> bool {
        matches!(self, CatalogOutcome::Replaced { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub networks: CatalogOutcome,
    pub studios: CatalogOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RefreshReport {
    pub fn outcome(&self, kind: CatalogKind) -> &CatalogOutcome {
        match kind {
            CatalogKind::Networks => &self.networks,
            CatalogKind::Studios => &self.studios,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.networks.is_replaced() && self.studios.is_replaced()
    }
}

impl fmt::Display for RefreshReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, outcome) in
            [("networks", &self.networks), ("studios", &self.studios)]
        {
            match outcome {
                CatalogOutcome::Replaced { entries } => {
                    writeln!(f, "{label}: {entries} entries")?
                }
                CatalogOutcome::Retained { error } => {
                    writeln!(f, "{label}: kept previous entries ({error})")?
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStatus {
    pub last_refresh: Option<DateTime<Utc>>,
    pub networks: usize,
    pub studios: usize,
    pub successful_fetches: u64,
    pub failed_fetches: u64,
}

/// Holds the networks and studios catalogs.
///
/// Each catalog is an `Arc` snapshot swapped as a unit on refresh, so a
/// reader holding a snapshot never sees a mix of old and new entries.
pub struct CatalogCache {
    api: Arc<dyn CatalogApi>,
    networks: RwLock<Arc<Catalog>>,
    studios: RwLock<Arc<Catalog>>,
    last_refresh: RwLock<Option<DateTime<Utc>>>,
    successful_fetches: AtomicU64,
    failed_fetches: AtomicU64,
    reports: broadcast::Sender<RefreshReport>,
}

impl fmt::Debug for CatalogCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogCache")
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

impl CatalogCache {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        let (reports, _) = broadcast::channel(REPORT_CHANNEL_CAPACITY);
        Self {
            api,
            networks: RwLock::new(Arc::new(Catalog::empty(
                CatalogKind::Networks,
            ))),
            studios: RwLock::new(Arc::new(Catalog::empty(
                CatalogKind::Studios,
            ))),
            last_refresh: RwLock::new(None),
            successful_fetches: AtomicU64::new(0),
            failed_fetches: AtomicU64::new(0),
            reports,
        }
    }

    fn slot(&self, kind: CatalogKind) -> &RwLock<Arc<Catalog>> {
        match kind {
            CatalogKind::Networks => &self.networks,
            CatalogKind::Studios => &self.studios,
        }
    }

    /// Current snapshot of one catalog.
    pub fn snapshot(&self, kind: CatalogKind) -> Arc<Catalog> {
        Arc::clone(&self.slot(kind).read())
    }

    pub fn get(&self, kind: CatalogKind, id: &EntityId) -> Option<CatalogEntity> {
        self.slot(kind).read().get(id).cloned()
    }

    /// Receive a report after every completed refresh cycle.
    pub fn subscribe_reports(&self) -> broadcast::Receiver<RefreshReport> {
        self.reports.subscribe()
    }

    pub fn status(&self) -> CacheStatus {
        CacheStatus {
            last_refresh: *self.last_refresh.read(),
            networks: self.networks.read().len(),
            studios: self.studios.read().len(),
            successful_fetches: self
                .successful_fetches
                .load(AtomicOrdering::Relaxed),
            failed_fetches: self.failed_fetches.load(AtomicOrdering::Relaxed),
        }
    }

    /// Fetch both catalogs concurrently and replace each one that succeeds.
    ///
    /// Failures are logged and leave the previous snapshot in place; they are
    /// never surfaced as errors.
    pub async fn refresh(&self) -> RefreshReport {
        let started_at = Utc::now();
        debug!("catalog refresh started");

        let (networks, studios) = tokio::join!(
            self.refresh_catalog(CatalogKind::Networks),
            self.refresh_catalog(CatalogKind::Studios),
        );

        let finished_at = Utc::now();
        *self.last_refresh.write() = Some(finished_at);

        let report = RefreshReport {
            networks,
            studios,
            started_at,
            finished_at,
        };
        let status = self.status();
        info!(
            networks = status.networks,
            studios = status.studios,
            complete = report.is_complete(),
            "catalog refresh finished"
        );

        let _ = self.reports.send(report.clone());
        report
    }

    async fn refresh_catalog(&self, kind: CatalogKind) -> CatalogOutcome {
        match self.api.list_catalog(kind).await {
            Ok(entities) => {
                let catalog =
                    Arc::new(Catalog::from_entities(kind, entities, Utc::now()));
                let entries = catalog.len();
                *self.slot(kind).write() = catalog;
                self.successful_fetches
                    .fetch_add(1, AtomicOrdering::Relaxed);
                debug!(%kind, entries, "catalog replaced");
                CatalogOutcome::Replaced { entries }
            }
            Err(error) => {
                self.failed_fetches.fetch_add(1, AtomicOrdering::Relaxed);
                warn!(
                    %kind,
                    %error,
                    "catalog fetch failed; keeping previous entries"
                );
                CatalogOutcome::Retained { error }
            }
        }
    }
}
