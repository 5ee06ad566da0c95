pub mod tiered;

use crate::core::StudentRecord;
use crate::query::QueryPlan;

pub use tiered::TieredRanker;

/// Maximum number of results a search returns
pub const MAX_RESULTS: usize = 20;

/// Trait for ranking implementations
pub trait Ranker: Send + Sync {
    /// Order candidates for the planned query, best first, capped
    fn rank(&self, plan: &QueryPlan, candidates: Vec<StudentRecord>) -> Vec<RankedCandidate>;

    /// Get ranker name for logging
    fn name(&self) -> &str;
}

/// Rank bucket assigned before secondary ordering (lower ranks higher)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchTier {
    /// Normalized name equals the whole query
    Exact = 0,
    /// Normalized name starts with the first query term
    Prefix = 1,
    /// Contains every term in order, anywhere else
    Contains = 2,
}

/// Candidate with its assigned tier
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub record: StudentRecord,
    pub tier: MatchTier,
}

impl RankedCandidate {
    pub fn new(record: StudentRecord, tier: MatchTier) -> Self {
        Self { record, tier }
    }
}
