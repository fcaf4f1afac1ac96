//! CSV report export.
//!
//! Persists the selected table and both metric tables into a timestamped
//! report directory. This is the only stage with filesystem side effects;
//! its failures are ordinary errors which the pipeline runner degrades to
//! log entries rather than aborting a run.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tracing::info;

use crate::error::{EpiError, Result};
use crate::models::{GrowthPoint, IncidencePoint, SelectedTable};

/// Locations of the files written for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPaths {
    pub report_dir: PathBuf,
    pub selected: PathBuf,
    pub incidence: PathBuf,
    pub growth: PathBuf,
}

/// Writes the outbound tables of a run as CSV files
#[derive(Debug)]
pub struct ReportExporter {
    output_root: PathBuf,
}

impl ReportExporter {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    /// Write all three tables into a fresh `covid_report_<timestamp>`
    /// directory under the output root.
    pub fn export(
        &self,
        selected: &SelectedTable,
        incidence: &[IncidencePoint],
        growth: &[GrowthPoint],
    ) -> Result<ReportPaths> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let report_dir = self.output_root.join(format!("covid_report_{timestamp}"));
        fs::create_dir_all(&report_dir)?;

        let paths = ReportPaths {
            selected: report_dir.join("selected.csv"),
            incidence: report_dir.join("incidence_7d.csv"),
            growth: report_dir.join("growth_factor_7d.csv"),
            report_dir,
        };

        write_rows(&paths.selected, &selected.rows)?;
        write_rows(&paths.incidence, incidence)?;
        write_rows(&paths.growth, growth)?;

        info!(
            dir = %paths.report_dir.display(),
            selected = selected.len(),
            incidence = incidence.len(),
            growth = growth.len(),
            "report exported"
        );

        Ok(paths)
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| EpiError::export_failed(path, e.to_string()))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| EpiError::export_failed(path, e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| EpiError::export_failed(path, e.to_string()))?;
    Ok(())
}
