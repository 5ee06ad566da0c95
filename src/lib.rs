//! # Natega Engine
//!
//! Student name search over exam results with:
//! - Arabic normalization (diacritics, tatweel, alif/hamza/ta marbuta folds)
//! - Ordered contains-all matching
//! - Exact / prefix / contains tiered ranking, capped at 20 results
//! - SQLite or in-memory dataset stores with atomic full rebuilds
//! - CSV ingestion from local files or URLs
//! - Multiple interfaces: Rust library, HTTP API, CLI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use natega_engine::{RecordSource, SearchEngine};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = SearchEngine::open("students.db").await?;
//!     engine.ingest(&RecordSource::parse("students.csv")).await?;
//!
//!     for hit in engine.search(Some("احمد علي")).await? {
//!         println!("{} - {}", hit.display_name, hit.total_score);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod normalize;
pub mod query;
pub mod ranking;
pub mod store;

// Re-export primary types
pub use config::ServerConfig;
pub use crate::core::{SearchHit, StudentRecord};
pub use engine::SearchEngine;
pub use error::{NategaError, Result};
pub use ingest::{IngestReport, RecordSource};
pub use normalize::normalize;
pub use query::QueryPlan;
pub use store::{DatasetStats, MemoryStore, SqliteStore, StudentStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
