use reqwest::Client;
use std::io::{Cursor, Read};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{NategaError, Result};

/// Where an ingestion run reads its CSV rows from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSource {
    /// Local CSV file
    Path(PathBuf),
    /// Remote CSV fetched over HTTP(S)
    Url(String),
    /// CSV text already in memory
    Inline(String),
}

impl RecordSource {
    /// `http://` / `https://` locations are remote, anything else a path
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::Path(PathBuf::from(trimmed))
        }
    }

    /// Human readable location for logs
    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
            Self::Inline(_) => "<inline>".to_string(),
        }
    }

    /// Open the source for reading.
    ///
    /// Remote sources are downloaded in full first; a non-2xx response is a
    /// source error, reported before any row is read.
    pub(crate) async fn open(&self) -> Result<Box<dyn Read + Send>> {
        match self {
            Self::Path(path) => {
                let file = std::fs::File::open(path)?;
                Ok(Box::new(file))
            }
            Self::Url(url) => {
                let client = Client::builder()
                    .timeout(Duration::from_secs(60))
                    .build()?;

                let response = client.get(url).send().await?;
                if !response.status().is_success() {
                    return Err(NategaError::Source(format!(
                        "{} returned HTTP {}",
                        url,
                        response.status()
                    )));
                }

                let body = response.bytes().await?;
                tracing::debug!("Downloaded {} bytes from {}", body.len(), url);
                Ok(Box::new(Cursor::new(body)))
            }
            Self::Inline(text) => Ok(Box::new(Cursor::new(text.clone().into_bytes()))),
        }
    }
}
