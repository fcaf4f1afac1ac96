//! Dataset acquisition with a single local fallback.
//!
//! The source attempts the primary origin once over HTTP, falls back to a
//! local cached copy on any failure, and degrades to an empty table with
//! the minimal schema when both are unavailable. `fetch` never raises;
//! failure is visible only as a degraded result and log lines.

pub mod parse;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::error::{EpiError, Result};
use crate::models::RawTable;

use self::parse::parse_csv;

/// Fetches the raw table from its origin
#[derive(Debug)]
pub struct DatasetSource {
    url: String,
    fallback_path: PathBuf,
    timeout: Duration,
}

impl DatasetSource {
    pub fn new(url: impl Into<String>, fallback_path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            fallback_path: fallback_path.into(),
            timeout: Duration::from_secs(crate::constants::DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            url: config.source_url.clone(),
            fallback_path: config.fallback_path.clone(),
            timeout: Duration::from_secs(config.http_timeout_secs),
        }
    }

    /// Obtain the raw table. Tries the origin once, then the local fallback
    /// once, then returns an empty table with the minimal schema. Never
    /// returns an error.
    pub fn fetch(&self) -> RawTable {
        match self.fetch_remote() {
            Ok(table) => {
                info!(rows = table.len(), "dataset downloaded from origin");
                return table;
            }
            Err(e) => {
                warn!("could not download dataset: {e}");
            }
        }

        match self.fetch_fallback() {
            Ok(table) => {
                info!(
                    rows = table.len(),
                    path = %self.fallback_path.display(),
                    "dataset loaded from local fallback"
                );
                table
            }
            Err(e) => {
                warn!("local fallback unavailable: {e}; continuing with an empty table");
                RawTable::empty_minimal()
            }
        }
    }

    /// Single attempt against the primary origin.
    fn fetch_remote(&self) -> Result<RawTable> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;

        let response = client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(EpiError::OriginStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.text()?;
        parse_csv(body.as_bytes())
    }

    /// Single attempt against the local cached copy.
    fn fetch_fallback(&self) -> Result<RawTable> {
        if !self.fallback_path.exists() {
            return Err(EpiError::FallbackNotFound {
                path: self.fallback_path.clone(),
            });
        }
        let file = File::open(&self.fallback_path)?;
        parse_csv(BufReader::new(file))
    }
}
