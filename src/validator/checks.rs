//! The five integrity checks.
//!
//! Severity polarity throughout: a passing check is tagged `Warn`, a failing
//! check `Error`. The new-cases check is the exception and stays `Warn`
//! whatever the outcome, since negative corrections are a documented,
//! non-blocking anomaly in the origin data.

use chrono::Local;

use super::check_names;
use crate::constants::columns;
use crate::models::{CleanedTable, MetadataValue, ValidationResult};

/// No row may be dated after today.
pub fn future_dates(table: &CleanedTable) -> ValidationResult {
    if !table.columns.date {
        return ValidationResult::fail(check_names::FUTURE_DATES, "date column does not exist");
    }

    let today = Local::now().date_naive();
    match table.rows.iter().map(|row| row.date).max() {
        Some(max_date) if max_date > today => {
            ValidationResult::fail(check_names::FUTURE_DATES, format!("future date: {max_date}"))
                .with_metadata("max_date", MetadataValue::Text(max_date.to_string()))
        }
        Some(max_date) => ValidationResult::pass(
            check_names::FUTURE_DATES,
            format!("maximum date: {max_date}"),
        )
        .with_metadata("max_date", MetadataValue::Text(max_date.to_string())),
        // An empty table contains no future dates
        None => ValidationResult::pass(check_names::FUTURE_DATES, "no rows to evaluate")
            .with_metadata("max_date", MetadataValue::Text("none".to_string())),
    }
}

/// The three required columns must all be present.
pub fn required_columns(table: &CleanedTable) -> ValidationResult {
    let missing = table.columns.missing_required();
    let present = table.columns.present_required();

    let result = if missing.is_empty() {
        ValidationResult::pass(check_names::REQUIRED_COLUMNS, "all required columns present")
    } else {
        ValidationResult::fail(
            check_names::REQUIRED_COLUMNS,
            format!("missing columns: {missing:?}"),
        )
    };

    result
        .with_metadata("missing_columns", MetadataValue::Json(missing.into()))
        .with_metadata("present_columns", MetadataValue::Json(present.into()))
}

/// `(country, date)` must be unique. Every member of a duplicate group
/// counts, not just the extras.
pub fn uniqueness(table: &CleanedTable) -> ValidationResult {
    use std::collections::HashMap;

    if !table.columns.country || !table.columns.date {
        return ValidationResult::fail(
            check_names::UNIQUENESS,
            "country or date column missing; uniqueness cannot be verified",
        );
    }

    let total_rows = table.len();
    let mut group_sizes: HashMap<(&str, chrono::NaiveDate), usize> = HashMap::new();
    for row in &table.rows {
        *group_sizes.entry((row.country.as_str(), row.date)).or_insert(0) += 1;
    }

    let unique_rows = group_sizes.len();
    let duplicate_rows: usize = group_sizes.values().filter(|&&n| n > 1).sum();

    let result = if duplicate_rows == 0 {
        ValidationResult::pass(
            check_names::UNIQUENESS,
            format!("no duplicates: {unique_rows} unique rows"),
        )
    } else {
        ValidationResult::fail(
            check_names::UNIQUENESS,
            format!("{duplicate_rows} duplicated rows found (unique rows: {unique_rows})"),
        )
    };

    result
        .with_metadata("total_rows", MetadataValue::Int(total_rows as i64))
        .with_metadata("duplicate_rows", MetadataValue::Int(duplicate_rows as i64))
        .with_metadata("unique_rows", MetadataValue::Int(unique_rows as i64))
}

/// Every population value must be a positive number.
pub fn population_positive(table: &CleanedTable) -> ValidationResult {
    if !table.columns.population {
        return ValidationResult::fail(
            check_names::POPULATION_POSITIVE,
            "population column absent",
        );
    }

    // The cleaner guarantees positive finite values, so on a genuinely
    // cleaned table every counter below is zero. The classification is kept
    // for tables constructed by other means.
    let mut nulls = 0usize;
    let mut zeros = 0usize;
    let mut negatives = 0usize;
    let mut non_numeric = 0usize;
    for row in &table.rows {
        let v = row.population;
        if v.is_nan() {
            nulls += 1;
        } else if v.is_infinite() {
            non_numeric += 1;
        } else if v == 0.0 {
            zeros += 1;
        } else if v < 0.0 {
            negatives += 1;
        }
    }

    let problems = nulls + zeros + negatives + non_numeric;
    let finite_values: Vec<f64> = table
        .rows
        .iter()
        .map(|row| row.population)
        .filter(|v| v.is_finite())
        .collect();
    let min = finite_values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite_values
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    let result = if problems == 0 {
        let description = if finite_values.is_empty() {
            "all populations are positive (no rows)".to_string()
        } else {
            format!("all populations are positive (min: {min:.0}, max: {max:.0})")
        };
        ValidationResult::pass(check_names::POPULATION_POSITIVE, description)
    } else {
        let mut parts = Vec::new();
        if nulls > 0 {
            parts.push(format!("{nulls} nulls"));
        }
        if zeros > 0 {
            parts.push(format!("{zeros} zeros"));
        }
        if negatives > 0 {
            parts.push(format!("{negatives} negatives"));
        }
        if non_numeric > 0 {
            parts.push(format!("{non_numeric} non-numeric"));
        }
        ValidationResult::fail(
            check_names::POPULATION_POSITIVE,
            format!("problems found: {}", parts.join(", ")),
        )
    };

    let mut result = result
        .with_metadata("null_values", MetadataValue::Int(nulls as i64))
        .with_metadata("zero_values", MetadataValue::Int(zeros as i64))
        .with_metadata("negative_values", MetadataValue::Int(negatives as i64))
        .with_metadata("non_numeric_values", MetadataValue::Int(non_numeric as i64))
        .with_metadata("total_rows", MetadataValue::Int(table.len() as i64));
    if !finite_values.is_empty() {
        result = result
            .with_metadata("min_population", MetadataValue::Float(min))
            .with_metadata("max_population", MetadataValue::Float(max));
    }
    result
}

/// New-case counts should not be negative. The column is optional: when it
/// is absent the check passes with a note and the metric that needs it is
/// simply omitted downstream. Severity stays `Warn` either way.
pub fn new_cases_non_negative(table: &CleanedTable) -> ValidationResult {
    if !table.columns.new_cases {
        return ValidationResult::advisory(
            check_names::NEW_CASES_NON_NEGATIVE,
            true,
            format!("column '{}' does not exist - check skipped", columns::NEW_CASES),
        );
    }

    let total_rows = table.len();
    let nulls = table.rows.iter().filter(|r| r.new_cases.is_none()).count();
    let negative_rows: Vec<&crate::models::CleanedRecord> = table
        .rows
        .iter()
        .filter(|r| matches!(r.new_cases, Some(v) if v < 0.0))
        .collect();
    let negatives = negative_rows.len();

    let mut description = if negatives == 0 {
        format!("all {} values are >= 0", columns::NEW_CASES)
    } else {
        let examples: Vec<String> = negative_rows
            .iter()
            .take(3)
            .map(|r| {
                format!(
                    "{} {} {}",
                    r.country,
                    r.date,
                    r.new_cases.unwrap_or_default()
                )
            })
            .collect();
        format!(
            "DOCUMENTED: {negatives} negative values found. Examples: {}",
            examples.join("; ")
        )
    };
    if nulls > 0 {
        description.push_str(&format!(" | {nulls} null values"));
    }

    let negative_pct = if total_rows > 0 {
        negatives as f64 / total_rows as f64 * 100.0
    } else {
        0.0
    };

    ValidationResult::advisory(check_names::NEW_CASES_NON_NEGATIVE, negatives == 0, description)
        .with_metadata("negative_values", MetadataValue::Int(negatives as i64))
        .with_metadata("null_values", MetadataValue::Int(nulls as i64))
        .with_metadata("total_rows", MetadataValue::Int(total_rows as i64))
        .with_metadata("negative_pct", MetadataValue::Float(negative_pct))
}
