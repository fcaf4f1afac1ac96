//! Epi Pipeline Library
//!
//! A Rust library for ingesting the OWID COVID-19 compact dataset, repairing
//! data-quality defects, verifying integrity invariants, and deriving rolling
//! epidemiological indicators for a configurable set of countries.
//!
//! This library provides tools for:
//! - Fetching the raw table from its origin with a single local fallback
//! - Cleaning with deterministic repair rules (date filtering, column
//!   synthesis, numeric coercion, keep-last deduplication)
//! - Five independent integrity checks producing structured results
//! - Selecting the comparison country subset used for metric derivation
//! - Computing 7-day incidence rate and 7-day growth factor per country
//! - Exporting the derived tables as timestamped CSV reports
//!
//! The pipeline has two named branches. Validation always runs against the
//! cleaned table; metrics are derived from the raw table, so quality repairs
//! never alter the reported indicator values.

pub mod cleaner;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod selector;
pub mod source;
pub mod validator;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use cleaner::Cleaner;
pub use config::PipelineConfig;
pub use error::{EpiError, Result};
pub use models::{
    CleanedRecord, CleanedTable, ColumnSet, GrowthPoint, IncidencePoint, MetadataValue, RawRecord,
    RawTable, SelectedRecord, SelectedTable, Severity, ValidationResult,
};
pub use pipeline::{Pipeline, RunReport};
pub use source::DatasetSource;
