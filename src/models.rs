//! Core data structures for the epi pipeline.
//!
//! Each pipeline stage owns an explicit table type that declares which
//! fields are guaranteed and which are optional, so column presence is a
//! property of the type rather than a runtime membership test. A stage
//! always returns a fresh table and never mutates one it did not produce.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::columns;

// =============================================================================
// Column presence
// =============================================================================

/// Which of the known origin columns a table actually carries.
///
/// The origin ships dozens of columns; only these five matter to the
/// pipeline. The set travels with the table so downstream stages can tell a
/// column that was never provided apart from a cell that is merely empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSet {
    pub country: bool,
    pub date: bool,
    pub population: bool,
    pub new_cases: bool,
    pub people_vaccinated: bool,
}

impl ColumnSet {
    /// The minimal schema: only the three required columns, nothing else.
    /// Used for the degraded empty table when the origin is unreachable.
    pub fn minimal() -> Self {
        Self {
            country: true,
            date: true,
            population: true,
            new_cases: false,
            people_vaccinated: false,
        }
    }

    /// All five known columns present.
    pub fn full() -> Self {
        Self {
            country: true,
            date: true,
            population: true,
            new_cases: true,
            people_vaccinated: true,
        }
    }

    /// No columns present. The starting point for header discovery.
    pub fn empty() -> Self {
        Self {
            country: false,
            date: false,
            population: false,
            new_cases: false,
            people_vaccinated: false,
        }
    }

    /// Names of the required columns missing from this set.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.country {
            missing.push(columns::COUNTRY);
        }
        if !self.date {
            missing.push(columns::DATE);
        }
        if !self.population {
            missing.push(columns::POPULATION);
        }
        missing
    }

    /// Names of the required columns present in this set.
    pub fn present_required(&self) -> Vec<&'static str> {
        columns::REQUIRED
            .iter()
            .filter(|name| !self.missing_required().contains(name))
            .copied()
            .collect()
    }
}

// =============================================================================
// Raw stage
// =============================================================================

/// One origin row, untouched apart from date parsing.
///
/// Numeric cells stay as raw text here: coercion (and the bookkeeping
/// around values that fail it) is a cleaning concern. Dates are parsed at
/// ingest; an unparsable date becomes `None`, never an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub country: Option<String>,
    pub date: Option<NaiveDate>,
    pub population: Option<String>,
    pub new_cases: Option<String>,
    pub people_vaccinated: Option<String>,
}

/// The table as obtained from the origin (or fallback), before any repair.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub columns: ColumnSet,
    pub rows: Vec<RawRecord>,
}

impl RawTable {
    /// The degraded result when both the origin and the fallback fail:
    /// no rows, minimal schema.
    pub fn empty_minimal() -> Self {
        Self {
            columns: ColumnSet::minimal(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// Cleaned stage
// =============================================================================

/// One row after repair. The three required fields are guaranteed:
/// `country` is never missing (sentinel "Unknown"), `date` is a valid date
/// no later than the ingestion day, `population` is positive and finite.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRecord {
    pub country: String,
    pub date: NaiveDate,
    pub population: f64,
    pub new_cases: Option<f64>,
    pub people_vaccinated: Option<f64>,
}

/// The repaired table all validation checks run against.
///
/// `(country, date)` is unique across rows. The column set always marks the
/// three required columns present, even when the input table lacked them.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedTable {
    pub columns: ColumnSet,
    pub rows: Vec<CleanedRecord>,
}

impl CleanedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Re-express this table as a raw table, as if it had been re-ingested.
    /// Lets a cleaned table be fed back through the cleaner, which must
    /// leave it unchanged.
    pub fn to_raw(&self) -> RawTable {
        let rows = self
            .rows
            .iter()
            .map(|row| RawRecord {
                country: Some(row.country.clone()),
                date: Some(row.date),
                population: Some(format_cell(row.population)),
                new_cases: row.new_cases.map(format_cell),
                people_vaccinated: row.people_vaccinated.map(format_cell),
            })
            .collect();

        RawTable {
            columns: self.columns,
            rows,
        }
    }
}

fn format_cell(value: f64) -> String {
    value.to_string()
}

// =============================================================================
// Numeric coercion
// =============================================================================

/// Outcome of coercing a raw cell to a number.
///
/// `Missing` is an absent or blank cell; `Invalid` is text that does not
/// parse as a finite number. The two are counted separately by the cleaner
/// and the population check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericCell {
    Missing,
    Invalid,
    Value(f64),
}

impl NumericCell {
    /// Coerce an optional raw cell. Whitespace is trimmed; a parse that
    /// yields a non-finite number counts as missing, matching the behaviour
    /// of coercing "NaN" text upstream.
    pub fn coerce(raw: Option<&str>) -> Self {
        let Some(text) = raw else {
            return NumericCell::Missing;
        };
        let text = text.trim();
        if text.is_empty() {
            return NumericCell::Missing;
        }
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => NumericCell::Value(value),
            Ok(_) => NumericCell::Missing,
            Err(_) => NumericCell::Invalid,
        }
    }

    /// The parsed value, if any. Missing and invalid cells both collapse to
    /// `None` for stages that only care about usable numbers.
    pub fn value(self) -> Option<f64> {
        match self {
            NumericCell::Value(v) => Some(v),
            _ => None,
        }
    }
}

// =============================================================================
// Selected stage
// =============================================================================

/// One row of the comparison subset, projected and renamed for metrics.
///
/// Optional fields are `None` only when the origin never provided the
/// column; rows with empty cells in a provided metric column are dropped
/// during selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedRecord {
    pub location: String,
    pub date: NaiveDate,
    pub new_cases: Option<f64>,
    pub people_vaccinated: Option<f64>,
    pub population: Option<f64>,
}

/// The comparison subset, sorted by `(location, date)` ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedTable {
    pub columns: ColumnSet,
    pub rows: Vec<SelectedRecord>,
}

impl SelectedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows belonging to one location, in stored (date-ascending) order.
    pub fn rows_for<'a>(&'a self, location: &str) -> Vec<&'a SelectedRecord> {
        self.rows
            .iter()
            .filter(|row| row.location == location)
            .collect()
    }
}

// =============================================================================
// Metric points
// =============================================================================

/// Daily 7-day incidence rate for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidencePoint {
    pub date: NaiveDate,
    pub location: String,
    pub incidence_7d: f64,
}

/// Weekly growth factor for one location. `week_end_date` is the last day
/// of the trailing week the factor describes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthPoint {
    pub week_end_date: NaiveDate,
    pub location: String,
    pub weekly_cases: f64,
    pub growth_factor_7d: f64,
}

// =============================================================================
// Validation results
// =============================================================================

/// Severity attached to a check outcome.
///
/// Note the polarity: a passing check reports `Warn` and a failing check
/// `Error`. Downstream consumers key off `passed`; severity is an advisory
/// tag for the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Warn,
    Error,
}

/// Typed metadata value carried by a validation result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Int(i64),
    Float(f64),
    Text(String),
    Json(serde_json::Value),
}

/// Structured outcome of one integrity check over the cleaned table.
///
/// One instance per check per run; never persisted across runs. Metadata
/// keys keep their insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub check_name: &'static str,
    pub passed: bool,
    pub severity: Severity,
    pub description: String,
    pub metadata: Vec<(String, MetadataValue)>,
}

impl ValidationResult {
    /// A passing result, tagged `Warn` per the severity polarity above.
    pub fn pass(check_name: &'static str, description: impl Into<String>) -> Self {
        Self {
            check_name,
            passed: true,
            severity: Severity::Warn,
            description: description.into(),
            metadata: Vec::new(),
        }
    }

    /// A failing result, tagged `Error`.
    pub fn fail(check_name: &'static str, description: impl Into<String>) -> Self {
        Self {
            check_name,
            passed: false,
            severity: Severity::Error,
            description: description.into(),
            metadata: Vec::new(),
        }
    }

    /// A result whose severity stays `Warn` whatever the outcome. Used for
    /// checks that document anomalies without blocking.
    pub fn advisory(check_name: &'static str, passed: bool, description: impl Into<String>) -> Self {
        Self {
            check_name,
            passed,
            severity: Severity::Warn,
            description: description.into(),
            metadata: Vec::new(),
        }
    }

    /// Append a metadata entry, preserving insertion order.
    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.push((key.into(), value));
        self
    }

    /// Look up a metadata entry by key.
    pub fn metadata_value(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_set_missing_required() {
        let mut columns = ColumnSet::minimal();
        assert!(columns.missing_required().is_empty());

        columns.population = false;
        assert_eq!(columns.missing_required(), vec!["population"]);
        assert_eq!(columns.present_required(), vec!["country", "date"]);
    }

    #[test]
    fn test_numeric_cell_coercion() {
        assert_eq!(NumericCell::coerce(None), NumericCell::Missing);
        assert_eq!(NumericCell::coerce(Some("")), NumericCell::Missing);
        assert_eq!(NumericCell::coerce(Some("  ")), NumericCell::Missing);
        assert_eq!(NumericCell::coerce(Some("abc")), NumericCell::Invalid);
        assert_eq!(NumericCell::coerce(Some("17.5")), NumericCell::Value(17.5));
        assert_eq!(NumericCell::coerce(Some(" 42 ")), NumericCell::Value(42.0));
        // Non-finite parses collapse to missing, like coercing "NaN" text
        assert_eq!(NumericCell::coerce(Some("NaN")), NumericCell::Missing);
        assert_eq!(NumericCell::coerce(Some("inf")), NumericCell::Missing);
    }

    #[test]
    fn test_validation_result_polarity() {
        let pass = ValidationResult::pass("some_check", "ok");
        assert!(pass.passed);
        assert_eq!(pass.severity, Severity::Warn);

        let fail = ValidationResult::fail("some_check", "bad");
        assert!(!fail.passed);
        assert_eq!(fail.severity, Severity::Error);

        let advisory = ValidationResult::advisory("some_check", false, "documented");
        assert!(!advisory.passed);
        assert_eq!(advisory.severity, Severity::Warn);
    }

    #[test]
    fn test_metadata_order_preserved() {
        let result = ValidationResult::pass("some_check", "ok")
            .with_metadata("b", MetadataValue::Int(2))
            .with_metadata("a", MetadataValue::Int(1));

        let keys: Vec<&str> = result.metadata.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(result.metadata_value("a"), Some(&MetadataValue::Int(1)));
    }
}
