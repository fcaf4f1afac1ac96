//! Error handling for pipeline operations.
//!
//! The cleaning, validation and metric stages are infallible by contract:
//! every data defect degrades to a typed, possibly-empty result plus a log
//! side effect. These error types cover the outer surfaces only (network
//! fetch internals, report export, configuration, CLI).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EpiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Origin returned HTTP {status} for {url}")]
    OriginStatus { status: u16, url: String },

    #[error("Fallback dataset not found at path: {path}")]
    FallbackNotFound { path: PathBuf },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Report export failed for {path}: {reason}")]
    ExportFailed { path: PathBuf, reason: String },
}

impl EpiError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a report export error
    pub fn export_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ExportFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EpiError>;
