use serde::Serialize;

use crate::core::StudentRecord;

/// Public projection of a record returned by a search
///
/// Serialized with the column names the HTTP API has always exposed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchHit {
    /// Original Arabic name
    #[serde(rename = "arabic_name")]
    pub display_name: String,

    /// Seating number
    #[serde(rename = "seating_no")]
    pub seating_number: String,

    /// Total score
    #[serde(rename = "total_degree")]
    pub total_score: f64,
}

impl From<StudentRecord> for SearchHit {
    fn from(record: StudentRecord) -> Self {
        Self {
            display_name: record.display_name().to_string(),
            seating_number: record.seating_number().to_string(),
            total_score: record.total_score(),
        }
    }
}

impl SearchHit {
    /// Get display string for logging/CLI output
    pub fn display(&self) -> String {
        format!(
            "{} [{}] {}",
            self.display_name, self.seating_number, self.total_score
        )
    }
}
