use std::sync::Arc;
use std::time::Instant;

use crate::core::SearchHit;
use crate::error::Result;
use crate::ingest::{IngestReport, Ingestor, RecordSource};
use crate::query::QueryPlan;
use crate::ranking::{Ranker, TieredRanker};
use crate::store::{DatasetStats, MemoryStore, SqliteStore, StudentStore};

/// Main search orchestrator
///
/// Owns no data itself: the store is injected, so several engines (or
/// tests) can run side by side on independent datasets.
pub struct SearchEngine {
    store: Arc<dyn StudentStore>,
    ranker: Arc<dyn Ranker>,
}

impl SearchEngine {
    /// Create an engine over an existing store with the tiered ranker
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self {
            store,
            ranker: Arc::new(TieredRanker::new()),
        }
    }

    /// Create engine backed by the SQLite database at `db_path`
    pub async fn open(db_path: impl AsRef<str>) -> Result<Self> {
        let store = Arc::new(SqliteStore::new(db_path.as_ref()).await?);
        Ok(Self::new(store))
    }

    /// Create engine serving an in-memory snapshot of the SQLite database.
    ///
    /// Searches then run on the indexed `MemoryStore` without contending on
    /// the SQLite connection. A later import into the database is not seen
    /// until the engine is reopened.
    pub async fn open_snapshot(db_path: impl AsRef<str>) -> Result<Self> {
        let sqlite = SqliteStore::new(db_path.as_ref()).await?;
        let records = sqlite.load_all().await?;

        let memory = MemoryStore::new();
        memory.replace_all(records).await?;

        Ok(Self::new(Arc::new(memory)))
    }

    /// Replace the ranking strategy
    pub fn with_ranker(mut self, ranker: Arc<dyn Ranker>) -> Self {
        self.ranker = ranker;
        self
    }

    /// Search students by name.
    ///
    /// Absent, blank, or non-Arabic queries return an empty list without
    /// touching the store. A store failure is an `Err`, never an empty list.
    pub async fn search(&self, query: Option<&str>) -> Result<Vec<SearchHit>> {
        let start = Instant::now();

        let Some(plan) = QueryPlan::parse(query) else {
            return Ok(Vec::new());
        };

        let pattern = plan.pattern();
        let candidates: Vec<_> = self
            .store
            .filter_contains_all(pattern)
            .await?
            .into_iter()
            .filter(|record| pattern.matches(record.normalized_name()))
            .collect();
        let candidate_count = candidates.len();

        let hits: Vec<SearchHit> = self
            .ranker
            .rank(&plan, candidates)
            .into_iter()
            .map(|ranked| SearchHit::from(ranked.record))
            .collect();

        tracing::debug!(
            "Search {:?} → {} of {} candidates via {} ({:.2}ms)",
            plan.exact_query(),
            hits.len(),
            candidate_count,
            self.ranker.name(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(hits)
    }

    /// Rebuild the dataset from a record source
    pub async fn ingest(&self, source: &RecordSource) -> Result<IngestReport> {
        Ingestor::new(Arc::clone(&self.store)).run(source).await
    }

    /// Get dataset statistics
    pub async fn stats(&self) -> Result<DatasetStats> {
        self.store.stats().await
    }
}
