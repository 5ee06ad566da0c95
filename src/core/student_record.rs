use crate::normalize::normalize;

/// One examinee, keyed by seating number
///
/// The normalized name is always derived from the display name; there is no
/// way to set it independently. Records are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    /// Unique examinee identifier (primary key)
    seating_number: String,

    /// Original Arabic name, diacritics and variants preserved
    display_name: String,

    /// Canonical comparison form of `display_name`
    normalized_name: String,

    /// Total score, may be fractional
    total_score: f64,
}

impl StudentRecord {
    /// Build a record, deriving the normalized name
    pub fn new(
        seating_number: impl Into<String>,
        display_name: impl Into<String>,
        total_score: f64,
    ) -> Self {
        let display_name = display_name.into();
        let normalized_name = normalize(&display_name);
        Self {
            seating_number: seating_number.into(),
            display_name,
            normalized_name,
            total_score,
        }
    }

    pub fn seating_number(&self) -> &str {
        &self.seating_number
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    pub fn total_score(&self) -> f64 {
        self.total_score
    }

    /// Length of the normalized name in characters (ranking secondary key)
    pub fn normalized_len(&self) -> usize {
        self.normalized_name.chars().count()
    }
}
