use thiserror::Error;

/// Main error type for the search engine
#[derive(Error, Debug)]
pub enum NategaError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP request errors (remote record sources)
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// CSV reader errors that abort the whole source, not a single row
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record source could not be read
    #[error("Record source error: {0}")]
    Source(String),

    /// Two rows in one batch share a seating number; the batch is discarded
    #[error("Duplicate seating number in batch: {0}")]
    DuplicateSeatingNumber(String),

    /// Store cannot serve requests
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, NategaError>;
