pub mod search_hit;
pub mod student_record;

pub use search_hit::SearchHit;
pub use student_record::StudentRecord;
