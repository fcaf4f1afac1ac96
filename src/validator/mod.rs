//! Integrity checks over the cleaned table.
//!
//! Five independent checks, each a pure function of the cleaned table with
//! no shared state, producing a structured [`ValidationResult`] rather than
//! raising. "Failure" here is a semantic check outcome consumed by the
//! orchestration layer for observability; it never interrupts the run.
//!
//! The checks are order-insensitive; [`run_all`] evaluates them in a fixed
//! order purely for stable reporting.

pub mod checks;

#[cfg(test)]
pub mod tests;

pub use checks::{
    future_dates, new_cases_non_negative, population_positive, required_columns, uniqueness,
};

use tracing::info;

use crate::models::{CleanedTable, ValidationResult};

/// Stable check identifiers.
pub mod check_names {
    pub const FUTURE_DATES: &str = "future_dates";
    pub const REQUIRED_COLUMNS: &str = "required_columns";
    pub const UNIQUENESS: &str = "uniqueness_country_date";
    pub const POPULATION_POSITIVE: &str = "population_positive";
    pub const NEW_CASES_NON_NEGATIVE: &str = "new_cases_non_negative";
}

/// Run all five checks and return their results in reporting order.
pub fn run_all(table: &CleanedTable) -> Vec<ValidationResult> {
    let results = vec![
        future_dates(table),
        required_columns(table),
        uniqueness(table),
        population_positive(table),
        new_cases_non_negative(table),
    ];

    let passed = results.iter().filter(|r| r.passed).count();
    info!(
        passed,
        total = results.len(),
        "validation checks complete"
    );

    results
}
