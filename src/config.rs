//! Configuration for a pipeline run.
//!
//! All run parameters live in one structure passed explicitly into the
//! source and selector stages; nothing is read from process-wide state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_COUNTRIES, DEFAULT_HTTP_TIMEOUT_SECS, FALLBACK_FILENAME, OWID_COMPACT_URL,
};
use crate::error::{EpiError, Result};

/// Configuration for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Primary origin of the raw dataset
    pub source_url: String,

    /// Local cached copy consulted once when the origin fails
    pub fallback_path: PathBuf,

    /// Timeout for the single origin fetch, in seconds
    pub http_timeout_secs: u64,

    /// Countries the selector projects the raw table to
    pub countries: Vec<String>,

    /// Where CSV reports are written; `None` disables export
    pub output_root: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_url: OWID_COMPACT_URL.to_string(),
            fallback_path: PathBuf::from(FALLBACK_FILENAME),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            countries: DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect(),
            output_root: None,
        }
    }
}

impl PipelineConfig {
    /// Create configuration with a custom origin URL
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    /// Create configuration with a custom fallback path
    pub fn with_fallback_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback_path = path.into();
        self
    }

    /// Create configuration with a custom comparison country set
    pub fn with_countries(mut self, countries: Vec<String>) -> Self {
        self.countries = countries;
        self
    }

    /// Create configuration with a custom fetch timeout
    pub fn with_http_timeout_secs(mut self, secs: u64) -> Self {
        self.http_timeout_secs = secs;
        self
    }

    /// Enable report export under the given directory
    pub fn with_output_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_root = Some(path.into());
        self
    }

    /// Check the configuration is usable before a run
    pub fn validate(&self) -> Result<()> {
        if self.source_url.is_empty() {
            return Err(EpiError::configuration("source URL must not be empty"));
        }
        if self.countries.is_empty() {
            return Err(EpiError::configuration(
                "at least one comparison country is required",
            ));
        }
        if self.http_timeout_secs == 0 {
            return Err(EpiError::configuration("HTTP timeout must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.countries, vec!["Ecuador", "Peru"]);
        assert!(config.output_root.is_none());
    }

    #[test]
    fn test_builder_methods() {
        let config = PipelineConfig::default()
            .with_countries(vec!["Chile".to_string()])
            .with_http_timeout_secs(5)
            .with_output_root("/tmp/reports");

        assert_eq!(config.countries, vec!["Chile"]);
        assert_eq!(config.http_timeout_secs, 5);
        assert_eq!(config.output_root, Some(PathBuf::from("/tmp/reports")));
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(
            PipelineConfig::default()
                .with_countries(Vec::new())
                .validate()
                .is_err()
        );
        assert!(
            PipelineConfig::default()
                .with_http_timeout_secs(0)
                .validate()
                .is_err()
        );
        assert!(
            PipelineConfig::default()
                .with_source_url("")
                .validate()
                .is_err()
        );
    }
}
