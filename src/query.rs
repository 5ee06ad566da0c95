use crate::normalize::normalize;

/// Ordered-substrings predicate over a normalized name
///
/// A name matches when every term appears in it, in order, without
/// overlapping, with arbitrary gaps before, between and after terms.
/// Equivalent to SQL `LIKE '%t1%t2%...%'` on text without wildcards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainsAllPattern {
    terms: Vec<String>,
}

impl ContainsAllPattern {
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Test a normalized name against the pattern
    pub fn matches(&self, normalized_name: &str) -> bool {
        let mut rest = normalized_name;
        for term in &self.terms {
            match rest.find(term.as_str()) {
                Some(idx) => rest = &rest[idx + term.len()..],
                None => return false,
            }
        }
        true
    }

    /// Render as an SQL `LIKE` pattern.
    ///
    /// Terms come out of the normalizer, so they never contain `%` or `_`.
    pub fn to_like_pattern(&self) -> String {
        let mut pattern = String::from("%");
        for term in &self.terms {
            pattern.push_str(term);
            pattern.push('%');
        }
        pattern
    }
}

/// A raw query turned into match predicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pattern: ContainsAllPattern,
    exact_query: String,
}

impl QueryPlan {
    /// Plan a raw query.
    ///
    /// Returns `None` for absent, blank, or zero-term queries (e.g. a query
    /// with only Latin letters or digits). Those are normal empty results and
    /// must not reach the store.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let raw = raw?;
        if raw.trim().is_empty() {
            return None;
        }

        let normalized = normalize(raw);
        let terms: Vec<String> = normalized
            .split_whitespace()
            .map(str::to_string)
            .collect();

        if terms.is_empty() {
            return None;
        }

        let exact_query = terms.join(" ");
        Some(Self {
            pattern: ContainsAllPattern { terms },
            exact_query,
        })
    }

    /// Candidate filter handed to the store
    pub fn pattern(&self) -> &ContainsAllPattern {
        &self.pattern
    }

    /// Full normalized query, for exact-equality testing
    pub fn exact_query(&self) -> &str {
        &self.exact_query
    }

    /// First term, for prefix testing
    pub fn first_term_prefix(&self) -> &str {
        // parse() never builds a plan without terms
        self.pattern.terms.first().map_or("", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_queries() {
        assert!(QueryPlan::parse(None).is_none());
        assert!(QueryPlan::parse(Some("")).is_none());
        assert!(QueryPlan::parse(Some("   \t ")).is_none());
    }

    #[test]
    fn test_zero_terms_after_normalization() {
        assert!(QueryPlan::parse(Some("ahmed 123")).is_none());
        assert!(QueryPlan::parse(Some("َُ")).is_none());
    }

    #[test]
    fn test_plan_artifacts() {
        let plan = QueryPlan::parse(Some("  أحمد   عليّ ")).unwrap();
        assert_eq!(plan.pattern().terms(), ["احمد", "علي"]);
        assert_eq!(plan.exact_query(), "احمد علي");
        assert_eq!(plan.first_term_prefix(), "احمد");
        assert_eq!(plan.pattern().to_like_pattern(), "%احمد%علي%");
    }

    #[test]
    fn test_pattern_requires_order() {
        let plan = QueryPlan::parse(Some("احمد علي")).unwrap();
        let pattern = plan.pattern();

        assert!(pattern.matches("احمد علي"));
        assert!(pattern.matches("احمد محمد علي"));
        assert!(pattern.matches("محمد احمد علي حسن"));
        assert!(!pattern.matches("علي احمد"));
        assert!(!pattern.matches("احمد"));
    }

    #[test]
    fn test_pattern_matches_inside_words() {
        let plan = QueryPlan::parse(Some("حمد")).unwrap();
        assert!(plan.pattern().matches("احمد"));
        assert!(plan.pattern().matches("محمدين"));
    }

    #[test]
    fn test_pattern_terms_do_not_overlap() {
        let plan = QueryPlan::parse(Some("علي لي")).unwrap();
        assert!(!plan.pattern().matches("علي"));
        assert!(plan.pattern().matches("علي ليلي"));
    }
}
