//! Offline dataset rebuild from tabular student records.
//!
//! Rows are read one at a time in source order. A bad row is logged and
//! skipped; the accepted rows are handed to the store as one batch, which
//! either replaces the served dataset entirely or leaves it untouched.

pub mod source;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use std::io::Read;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use crate::core::StudentRecord;
use crate::error::{NategaError, Result};
use crate::store::StudentStore;

pub use source::RecordSource;

/// Columns every source must provide
pub const REQUIRED_COLUMNS: [&str; 3] = ["seating_no", "arabic_name", "total_degree"];

/// Why a single row was rejected. Never aborts the batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("malformed row: {0}")]
    Malformed(String),

    #[error("missing seating number")]
    MissingSeatingNumber,

    #[error("total degree is not a number: {0:?}")]
    InvalidScore(String),
}

/// A rejected row and its position in the source
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line in the source, when known
    pub line: Option<u64>,
    pub reason: RowError,
}

/// Outcome of a committed ingestion run
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub source: String,
    pub accepted: usize,
    pub skipped: Vec<SkippedRow>,
    pub elapsed_ms: f64,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    seating_no: String,
    arabic_name: String,
    total_degree: String,
}

impl RawRow {
    fn into_record(self) -> std::result::Result<StudentRecord, RowError> {
        if self.seating_no.is_empty() {
            return Err(RowError::MissingSeatingNumber);
        }

        let total_score = self
            .total_degree
            .parse::<f64>()
            .ok()
            .filter(|score| score.is_finite())
            .ok_or_else(|| RowError::InvalidScore(self.total_degree.clone()))?;

        Ok(StudentRecord::new(self.seating_no, self.arabic_name, total_score))
    }
}

fn parse_row(
    record: &StringRecord,
    headers: &StringRecord,
) -> std::result::Result<StudentRecord, RowError> {
    let raw: RawRow = record
        .deserialize(Some(headers))
        .map_err(|e| RowError::Malformed(e.to_string()))?;
    raw.into_record()
}

/// Accepted records and rejected rows, in source order
pub type ParsedRows = (Vec<StudentRecord>, Vec<SkippedRow>);

/// Read and validate every row of a source.
///
/// Only source-level failures (unreadable input, missing columns) are
/// returned as errors; row failures end up in the skipped list. Parsing runs
/// on the blocking pool so a large file does not stall the async runtime.
pub async fn read_records(source: &RecordSource) -> Result<ParsedRows> {
    let input = source.open().await?;
    let location = source.describe();

    tokio::task::spawn_blocking(move || parse_rows(input, &location))
        .await
        .map_err(|e| NategaError::Source(format!("CSV reader task failed: {e}")))?
}

fn parse_rows(input: Box<dyn Read + Send>, location: &str) -> Result<ParsedRows> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);

    let headers = reader.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(NategaError::Source(format!(
            "{} has no '{}' column",
            location, missing
        )));
    }

    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for result in reader.records() {
        let (line, parsed) = match result {
            Ok(record) => (
                record.position().map(|p| p.line()),
                parse_row(&record, &headers),
            ),
            Err(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => return Err(err.into()),
            Err(err) => (
                err.position().map(|p| p.line()),
                Err(RowError::Malformed(err.to_string())),
            ),
        };

        match parsed {
            Ok(record) => records.push(record),
            Err(reason) => {
                tracing::warn!("Skipping row at line {:?}: {}", line, reason);
                skipped.push(SkippedRow { line, reason });
            }
        }
    }

    Ok((records, skipped))
}

/// Rebuilds a store from a record source
pub struct Ingestor {
    store: Arc<dyn StudentStore>,
}

impl Ingestor {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    /// Run one full ingestion.
    ///
    /// On `Err` the store still serves whatever it served before.
    pub async fn run(&self, source: &RecordSource) -> Result<IngestReport> {
        let start = Instant::now();
        tracing::info!("Importing records from {}", source.describe());

        let (records, skipped) = read_records(source).await?;
        let accepted = records.len();

        if accepted == 0 {
            tracing::warn!("No valid rows in {}, committing an empty dataset", source.describe());
        }

        self.store.replace_all(records).await?;

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        tracing::info!(
            "Import completed: {} accepted, {} skipped ({:.1}ms)",
            accepted,
            skipped.len(),
            elapsed_ms
        );

        Ok(IngestReport {
            source: source.describe(),
            accepted,
            skipped,
            elapsed_ms,
        })
    }
}
