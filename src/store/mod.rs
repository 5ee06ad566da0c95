pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::StudentRecord;
use crate::error::Result;
use crate::query::ContainsAllPattern;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Trait for dataset store implementations
///
/// Single writer, many readers. `replace_all` builds the new dataset aside
/// and swaps it in, so readers see either the old or the new one in full.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Records whose normalized name satisfies the pattern, in store order.
    /// May return a superset; callers re-check the pattern.
    async fn filter_contains_all(&self, pattern: &ContainsAllPattern) -> Result<Vec<StudentRecord>>;

    /// Atomically replace the whole dataset.
    ///
    /// Fails with `DuplicateSeatingNumber` if two records share a seating
    /// number; on any failure the previous dataset keeps being served.
    async fn replace_all(&self, records: Vec<StudentRecord>) -> Result<()>;

    /// Get dataset statistics
    async fn stats(&self) -> Result<DatasetStats>;
}

/// Dataset statistics
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStats {
    pub total_records: u64,
    pub loaded_at: Option<DateTime<Utc>>,
}
