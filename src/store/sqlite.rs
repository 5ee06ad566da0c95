use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::StudentRecord;
use crate::error::{NategaError, Result};
use crate::query::ContainsAllPattern;
use crate::store::{DatasetStats, StudentStore};

const STUDENTS_COLUMNS: &str = "
    seating_no TEXT PRIMARY KEY,
    arabic_name TEXT NOT NULL,
    total_degree REAL NOT NULL,
    arabic_name_normalized TEXT NOT NULL
";

/// SQLite-backed dataset store
///
/// Schema compatible with the existing `students.db`:
/// ```sql
/// CREATE TABLE students (
///     seating_no TEXT PRIMARY KEY,
///     arabic_name TEXT,
///     total_degree REAL,
///     arabic_name_normalized TEXT
/// );
/// CREATE INDEX idx_normalized_name ON students(arabic_name_normalized);
/// ```
///
/// `replace_all` loads a staging table and renames it over `students` inside
/// one transaction, so other connections never see a half-built table.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the store at `db_path`; `:memory:` is accepted
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS students ({STUDENTS_COLUMNS});
             CREATE INDEX IF NOT EXISTS idx_normalized_name ON students(arabic_name_normalized);
             CREATE TABLE IF NOT EXISTS dataset_meta (
                 key TEXT PRIMARY KEY,
                 value TEXT NOT NULL
             );"
        ))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| NategaError::StoreUnavailable("sqlite connection lock poisoned".into()))
    }
}

/// Map a failed insert to the batch-fatal duplicate error when it is a
/// primary key violation.
fn insert_error(err: rusqlite::Error, seating_number: &str) -> NategaError {
    match err {
        rusqlite::Error::SqliteFailure(ref e, _) if e.code == ErrorCode::ConstraintViolation => {
            NategaError::DuplicateSeatingNumber(seating_number.to_string())
        }
        other => NategaError::Database(other),
    }
}

/// Decode one `students` row.
///
/// Databases built by the legacy importer have nullable columns and store an
/// unparsable score as NULL; such rows are skipped instead of failing the query.
fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Option<StudentRecord>> {
    let seating_no: Option<String> = row.get(0)?;
    let arabic_name: Option<String> = row.get(1)?;
    let total_degree: Option<f64> = row.get(2)?;

    match (seating_no, arabic_name, total_degree) {
        (Some(seating_no), Some(arabic_name), Some(total_degree)) => {
            Ok(Some(StudentRecord::new(seating_no, arabic_name, total_degree)))
        }
        (seating_no, _, _) => {
            tracing::warn!("Skipping incomplete stored row (seating_no {:?})", seating_no);
            Ok(None)
        }
    }
}

impl SqliteStore {
    /// Every stored record in insertion order, for loading into a faster store
    pub async fn load_all(&self) -> Result<Vec<StudentRecord>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT seating_no, arabic_name, total_degree
             FROM students
             ORDER BY rowid",
        )?;

        let records = stmt
            .query_map([], read_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records.into_iter().flatten().collect())
    }
}

#[async_trait]
impl StudentStore for SqliteStore {
    async fn filter_contains_all(&self, pattern: &ContainsAllPattern) -> Result<Vec<StudentRecord>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare_cached(
            "SELECT seating_no, arabic_name, total_degree
             FROM students
             WHERE arabic_name_normalized LIKE ?1
             ORDER BY rowid",
        )?;

        let records = stmt
            .query_map(params![pattern.to_like_pattern()], read_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records.into_iter().flatten().collect())
    }

    async fn replace_all(&self, records: Vec<StudentRecord>) -> Result<()> {
        let mut conn = self.lock()?;
        // dropped without commit() => rolled back
        let tx = conn.transaction()?;

        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS students_staging;
             CREATE TABLE students_staging ({STUDENTS_COLUMNS});"
        ))?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO students_staging
                 (seating_no, arabic_name, total_degree, arabic_name_normalized)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;

            for record in &records {
                stmt.execute(params![
                    record.seating_number(),
                    record.display_name(),
                    record.total_score(),
                    record.normalized_name(),
                ])
                .map_err(|e| insert_error(e, record.seating_number()))?;
            }
        }

        tx.execute_batch(
            "DROP TABLE students;
             ALTER TABLE students_staging RENAME TO students;
             CREATE INDEX idx_normalized_name ON students(arabic_name_normalized);",
        )?;

        tx.execute(
            "INSERT OR REPLACE INTO dataset_meta (key, value) VALUES ('loaded_at', ?1)",
            params![Utc::now().to_rfc3339()],
        )?;

        tx.commit()?;

        tracing::info!("Swapped in dataset of {} records", records.len());
        Ok(())
    }

    async fn stats(&self) -> Result<DatasetStats> {
        let conn = self.lock()?;

        let total_records: u64 =
            conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;

        let loaded_at: Option<DateTime<Utc>> = conn
            .query_row(
                "SELECT value FROM dataset_meta WHERE key = 'loaded_at'",
                [],
                |row| row.get::<_, String>(0),
            )
            .optional()?
            .and_then(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc))
            });

        Ok(DatasetStats {
            total_records,
            loaded_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryPlan;

    fn pattern(query: &str) -> ContainsAllPattern {
        QueryPlan::parse(Some(query)).unwrap().pattern().clone()
    }

    fn sample() -> Vec<StudentRecord> {
        vec![
            StudentRecord::new("1001", "أحمد علي", 380.0),
            StudentRecord::new("1002", "أحمد محمد علي", 350.5),
            StudentRecord::new("1003", "سامي أحمد", 290.0),
            StudentRecord::new("1004", "فاطمة حسن", 401.0),
        ]
    }

    #[tokio::test]
    async fn test_store_create() {
        let store = SqliteStore::new(":memory:").await.unwrap();
        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_records, 0);
        assert!(stats.loaded_at.is_none());
    }

    #[tokio::test]
    async fn test_replace_and_filter() {
        let store = SqliteStore::new(":memory:").await.unwrap();
        store.replace_all(sample()).await.unwrap();

        let found = store.filter_contains_all(&pattern("احمد علي")).await.unwrap();
        let seats: Vec<&str> = found.iter().map(|r| r.seating_number()).collect();
        assert_eq!(seats, ["1001", "1002"]);

        let found = store.filter_contains_all(&pattern("حسن")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].display_name(), "فاطمة حسن");
        assert_eq!(found[0].normalized_name(), "فاطمه حسن");
    }

    #[tokio::test]
    async fn test_replace_discards_previous_dataset() {
        let store = SqliteStore::new(":memory:").await.unwrap();
        store.replace_all(sample()).await.unwrap();
        store
            .replace_all(vec![StudentRecord::new("2001", "هدى", 300.0)])
            .await
            .unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_records, 1);
        assert!(stats.loaded_at.is_some());
        assert!(store.filter_contains_all(&pattern("احمد")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_keeps_previous_dataset() {
        let store = SqliteStore::new(":memory:").await.unwrap();
        store.replace_all(sample()).await.unwrap();

        let batch = vec![
            StudentRecord::new("3001", "ليلى", 200.0),
            StudentRecord::new("3001", "منى", 210.0),
        ];
        let err = store.replace_all(batch).await.unwrap_err();
        assert!(matches!(err, NategaError::DuplicateSeatingNumber(ref s) if s == "3001"));

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_records, 4);
        assert_eq!(store.filter_contains_all(&pattern("احمد")).await.unwrap().len(), 3);
    }

    /// Table as written by the legacy importer: nullable columns, NULL score
    fn write_legacy_db(path: &str) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE students (
                 seating_no TEXT PRIMARY KEY,
                 arabic_name TEXT,
                 total_degree REAL,
                 arabic_name_normalized TEXT
             );
             CREATE INDEX idx_normalized_name ON students(arabic_name_normalized);
             INSERT INTO students VALUES ('1', 'أحمد علي', NULL, 'احمد علي');
             INSERT INTO students VALUES ('2', 'أحمد زكي', 300, 'احمد زكي');
             INSERT INTO students VALUES ('3', NULL, 250, 'احمد');",
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_legacy_null_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.db");
        let path = path.to_str().unwrap();
        write_legacy_db(path);

        let store = SqliteStore::new(path).await.unwrap();

        let found = store.filter_contains_all(&pattern("احمد")).await.unwrap();
        let seats: Vec<&str> = found.iter().map(|r| r.seating_number()).collect();
        assert_eq!(seats, ["2"]);
        assert_eq!(found[0].total_score(), 300.0);

        let all = store.load_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(store.stats().await.unwrap().total_records, 3);
    }

    #[tokio::test]
    async fn test_load_all_keeps_insertion_order() {
        let store = SqliteStore::new(":memory:").await.unwrap();
        store.replace_all(sample()).await.unwrap();

        let all = store.load_all().await.unwrap();
        assert_eq!(all, sample());
    }

    #[tokio::test]
    async fn test_dataset_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.db");
        let path = path.to_str().unwrap();

        {
            let store = SqliteStore::new(path).await.unwrap();
            store.replace_all(sample()).await.unwrap();
            let dup = vec![
                StudentRecord::new("1", "ا", 1.0),
                StudentRecord::new("1", "ب", 2.0),
            ];
            assert!(store.replace_all(dup).await.is_err());
        }

        let store = SqliteStore::new(path).await.unwrap();
        assert_eq!(store.stats().await.unwrap().total_records, 4);
        assert_eq!(store.filter_contains_all(&pattern("فاطمه")).await.unwrap().len(), 1);
    }
}
