//! Pipeline runner: one linear pass over all stages.
//!
//! Sequences the two branches of the pipeline and collects a structured
//! report. The validation branch cleans the raw table and runs the
//! integrity checks against it; the metric branch selects the comparison
//! subset from the RAW table and derives both indicators from it. The run
//! itself never fails on data conditions; the only caller-visible signals
//! of trouble are the validation results, the report counters and the log.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::cleaner::Cleaner;
use crate::config::PipelineConfig;
use crate::export::{ReportExporter, ReportPaths};
use crate::metrics::{growth_factor_7d, incidence_7d};
use crate::models::{GrowthPoint, IncidencePoint, SelectedTable, ValidationResult};
use crate::selector::select;
use crate::source::DatasetSource;
use crate::validator::run_all;

/// Outcome of one pipeline run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub raw_rows: usize,
    pub cleaned_rows: usize,
    pub duplicates_removed: usize,
    pub selected_rows: usize,
    pub incidence_rows: usize,
    pub growth_rows: usize,
    pub validations: Vec<ValidationResult>,
    pub report: Option<ReportPaths>,
    pub elapsed_ms: u128,
}

impl RunReport {
    /// Number of checks that passed.
    pub fn checks_passed(&self) -> usize {
        self.validations.iter().filter(|v| v.passed).count()
    }

    pub fn all_checks_passed(&self) -> bool {
        self.validations.iter().all(|v| v.passed)
    }
}

/// Outputs of a run, for callers that consume the tables directly rather
/// than the exported files.
#[derive(Debug)]
pub struct RunOutputs {
    pub selected: SelectedTable,
    pub incidence: Vec<IncidencePoint>,
    pub growth: Vec<GrowthPoint>,
    pub report: RunReport,
}

/// Runs the cleaning, validation and metric stages in order
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Execute one full run and return its report.
    pub fn run(&self) -> RunReport {
        self.run_with_outputs().report
    }

    /// Execute one full run, returning the derived tables alongside the
    /// report.
    pub fn run_with_outputs(&self) -> RunOutputs {
        let start = Instant::now();

        // Acquire. Degrades to an empty minimal table on double failure.
        let raw = DatasetSource::from_config(&self.config).fetch();
        info!(rows = raw.len(), "source stage complete");

        // Validation branch: clean, then check.
        let cleaner = Cleaner::new();
        let (cleaned, cleaning_stats) = cleaner.clean_with_stats(&raw);
        let validations = run_all(&cleaned);

        // Metric branch: select from the RAW table, then derive.
        let selected = select(&raw, &self.config.countries);
        let incidence = incidence_7d(&selected, &self.config.countries);
        let growth = growth_factor_7d(&selected, &self.config.countries);

        // Export is best-effort: a failure is logged and recorded as an
        // absent report, never raised.
        let report_paths = self.config.output_root.as_ref().and_then(|root| {
            let exporter = ReportExporter::new(root);
            match exporter.export(&selected, &incidence, &growth) {
                Ok(paths) => Some(paths),
                Err(e) => {
                    warn!("report export failed: {e}");
                    None
                }
            }
        });

        let report = RunReport {
            raw_rows: raw.len(),
            cleaned_rows: cleaned.len(),
            duplicates_removed: cleaning_stats.duplicates_removed,
            selected_rows: selected.len(),
            incidence_rows: incidence.len(),
            growth_rows: growth.len(),
            validations,
            report: report_paths,
            elapsed_ms: start.elapsed().as_millis(),
        };

        info!(
            raw = report.raw_rows,
            cleaned = report.cleaned_rows,
            selected = report.selected_rows,
            checks_passed = report.checks_passed(),
            elapsed_ms = report.elapsed_ms as u64,
            "pipeline run complete"
        );

        RunOutputs {
            selected,
            incidence,
            growth,
            report,
        }
    }
}
