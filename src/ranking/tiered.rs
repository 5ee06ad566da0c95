use crate::core::StudentRecord;
use crate::query::QueryPlan;
use crate::ranking::{MatchTier, RankedCandidate, Ranker, MAX_RESULTS};

/// Exact / prefix / contains tiering, shorter names first within a tier
///
/// Ties beyond (tier, length) keep the order the store returned them in.
pub struct TieredRanker {
    max_results: usize,
}

impl TieredRanker {
    pub fn new() -> Self {
        Self {
            max_results: MAX_RESULTS,
        }
    }

    /// Assign the rank bucket for one normalized name
    pub fn tier(plan: &QueryPlan, normalized_name: &str) -> MatchTier {
        if normalized_name == plan.exact_query() {
            MatchTier::Exact
        } else if normalized_name.starts_with(plan.first_term_prefix()) {
            MatchTier::Prefix
        } else {
            MatchTier::Contains
        }
    }
}

impl Default for TieredRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl Ranker for TieredRanker {
    fn rank(&self, plan: &QueryPlan, candidates: Vec<StudentRecord>) -> Vec<RankedCandidate> {
        let mut ranked: Vec<(usize, RankedCandidate)> = candidates
            .into_iter()
            .map(|record| {
                let tier = Self::tier(plan, record.normalized_name());
                let len = record.normalized_len();
                (len, RankedCandidate::new(record, tier))
            })
            .collect();

        // sort_by_key is stable, store order survives equal keys
        ranked.sort_by_key(|(len, candidate)| (candidate.tier, *len));
        ranked.truncate(self.max_results);

        ranked.into_iter().map(|(_, candidate)| candidate).collect()
    }

    fn name(&self) -> &str {
        "tiered"
    }
}
