use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::core::StudentRecord;
use crate::error::{NategaError, Result};
use crate::query::ContainsAllPattern;
use crate::store::{DatasetStats, StudentStore};

/// Character n-gram key: a single char, or a pair of adjacent chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Gram {
    One(char),
    Two(char, char),
}

/// Grams a term needs to be present in a name.
fn term_grams(term: &str) -> Vec<Gram> {
    let chars: Vec<char> = term.chars().collect();
    match chars.as_slice() {
        [] => Vec::new(),
        [c] => vec![Gram::One(*c)],
        _ => chars.windows(2).map(|w| Gram::Two(w[0], w[1])).collect(),
    }
}

/// Immutable snapshot served to readers
#[derive(Default)]
struct Dataset {
    records: Vec<StudentRecord>,
    /// gram -> ascending record positions
    postings: HashMap<Gram, Vec<usize>>,
    loaded_at: Option<DateTime<Utc>>,
}

impl Dataset {
    /// Build the snapshot, rejecting duplicate seating numbers.
    fn build(records: Vec<StudentRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut postings: HashMap<Gram, Vec<usize>> = HashMap::new();

        for (pos, record) in records.iter().enumerate() {
            if !seen.insert(record.seating_number()) {
                return Err(NategaError::DuplicateSeatingNumber(
                    record.seating_number().to_string(),
                ));
            }

            let chars: Vec<char> = record.normalized_name().chars().collect();
            let mut grams: HashSet<Gram> = chars.iter().map(|c| Gram::One(*c)).collect();
            grams.extend(chars.windows(2).map(|w| Gram::Two(w[0], w[1])));

            for gram in grams {
                postings.entry(gram).or_default().push(pos);
            }
        }

        Ok(Self {
            records,
            postings,
            loaded_at: Some(Utc::now()),
        })
    }

    /// Positions that contain every gram of every term, in record order.
    fn candidates(&self, pattern: &ContainsAllPattern) -> Vec<usize> {
        let grams: HashSet<Gram> = pattern
            .terms()
            .iter()
            .flat_map(|t| term_grams(t))
            .collect();

        let mut lists = Vec::with_capacity(grams.len());
        for gram in &grams {
            match self.postings.get(gram) {
                Some(list) => lists.push(list.as_slice()),
                None => return Vec::new(),
            }
        }

        if lists.is_empty() {
            return (0..self.records.len()).collect();
        }

        // intersect starting from the rarest gram
        lists.sort_by_key(|l| l.len());
        let (first, rest) = (lists[0], &lists[1..]);

        first
            .iter()
            .copied()
            .filter(|pos| rest.iter().all(|l| l.binary_search(pos).is_ok()))
            .collect()
    }
}

/// In-memory dataset store with a character n-gram index
///
/// `replace_all` builds the new snapshot without holding any lock and then
/// swaps the `Arc`; readers keep using whatever snapshot they cloned.
#[derive(Default)]
pub struct MemoryStore {
    current: RwLock<Arc<Dataset>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self) -> Result<Arc<Dataset>> {
        self.current
            .read()
            .map(|guard| Arc::clone(&*guard))
            .map_err(|_| NategaError::StoreUnavailable("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl StudentStore for MemoryStore {
    async fn filter_contains_all(&self, pattern: &ContainsAllPattern) -> Result<Vec<StudentRecord>> {
        let dataset = self.snapshot()?;

        Ok(dataset
            .candidates(pattern)
            .into_iter()
            .map(|pos| &dataset.records[pos])
            .filter(|record| pattern.matches(record.normalized_name()))
            .cloned()
            .collect())
    }

    async fn replace_all(&self, records: Vec<StudentRecord>) -> Result<()> {
        let dataset = Arc::new(Dataset::build(records)?);
        let count = dataset.records.len();

        let mut current = self
            .current
            .write()
            .map_err(|_| NategaError::StoreUnavailable("memory store lock poisoned".into()))?;
        *current = dataset;

        tracing::info!("Swapped in dataset of {} records", count);
        Ok(())
    }

    async fn stats(&self) -> Result<DatasetStats> {
        let dataset = self.snapshot()?;
        Ok(DatasetStats {
            total_records: dataset.records.len() as u64,
            loaded_at: dataset.loaded_at,
        })
    }
}
