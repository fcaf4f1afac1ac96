//! Table cleaning: repair of data-quality defects ahead of validation.
//!
//! The cleaner runs a fixed sequence of repair steps and is deterministic
//! for a fixed input row order: future-dated rows are discarded, missing
//! required columns are synthesized with defaults, population is coerced
//! and floored to a valid positive value, malformed dates are dropped, and
//! `(country, date)` duplicates are resolved by keeping the last occurrence.
//!
//! Keep-last deduplication makes the result depend on the order the origin
//! delivered the rows in. That order is carried through unchanged from the
//! source stage, which is what makes reruns reproducible.

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::constants::{DEFAULT_POPULATION, UNKNOWN_COUNTRY};
use crate::models::{CleanedRecord, CleanedTable, NumericCell, RawTable};

/// Per-run repair counters, logged for diagnostics. Not part of the
/// cleaning contract itself.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CleaningStats {
    pub input_rows: usize,
    pub future_rows_dropped: usize,
    pub synthesized_columns: Vec<&'static str>,
    pub population_nulls: usize,
    pub population_non_positive: usize,
    pub countries_filled: usize,
    pub invalid_dates_dropped: usize,
    pub duplicates_removed: usize,
    pub output_rows: usize,
}

/// Repairs a raw table into the cleaned form validation operates on
#[derive(Debug)]
pub struct Cleaner {
    today: NaiveDate,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl Cleaner {
    pub fn new() -> Self {
        Self {
            today: Local::now().date_naive(),
        }
    }

    /// Pin the ingestion day, for reproducible runs and tests.
    pub fn with_today(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Clean a raw table. Infallible: every defect is repaired or the
    /// offending row dropped, with counts emitted to the log.
    pub fn clean(&self, raw: &RawTable) -> CleanedTable {
        let (cleaned, stats) = self.clean_with_stats(raw);

        for column in &stats.synthesized_columns {
            warn!("column '{column}' was absent; synthesized with default values");
        }
        info!(
            nulls = stats.population_nulls,
            non_positive = stats.population_non_positive,
            "population repaired: defective values replaced with {DEFAULT_POPULATION}"
        );
        if stats.duplicates_removed > 0 {
            info!(removed = stats.duplicates_removed, "duplicates removed");
        }
        info!(
            input_rows = stats.input_rows,
            output_rows = stats.output_rows,
            "cleaning complete"
        );

        cleaned
    }

    /// As [`Cleaner::clean`], also returning the repair counters. Used by
    /// the pipeline runner for its report.
    pub fn clean_with_stats(&self, raw: &RawTable) -> (CleanedTable, CleaningStats) {
        let mut stats = CleaningStats {
            input_rows: raw.len(),
            ..Default::default()
        };

        // Step 1: discard rows dated strictly after today. Rows with a null
        // date survive this step; they are handled later.
        let mut rows: Vec<&crate::models::RawRecord> = if raw.columns.date {
            raw.rows
                .iter()
                .filter(|row| match row.date {
                    Some(date) => date <= self.today,
                    None => true,
                })
                .collect()
        } else {
            raw.rows.iter().collect()
        };
        stats.future_rows_dropped = raw.len() - rows.len();

        // Step 2: note which required columns must be synthesized. A
        // synthesized population is 1 everywhere, a synthesized country is
        // the sentinel, and a synthesized date is null everywhere, which
        // step 5 then removes entirely.
        for column in raw.columns.missing_required() {
            stats.synthesized_columns.push(column);
        }
        let population_present = raw.columns.population;
        let country_present = raw.columns.country;

        // Steps 3 and 4: coerce population and fill missing countries. The
        // date stays optional until step 5 resolves it.
        let mut working: Vec<(Option<NaiveDate>, CleanedRecord)> = Vec::with_capacity(rows.len());
        for row in rows.drain(..) {
            let population = if population_present {
                match NumericCell::coerce(row.population.as_deref()) {
                    NumericCell::Value(v) if v > 0.0 => v,
                    NumericCell::Value(_) => {
                        stats.population_non_positive += 1;
                        DEFAULT_POPULATION
                    }
                    NumericCell::Missing | NumericCell::Invalid => {
                        stats.population_nulls += 1;
                        DEFAULT_POPULATION
                    }
                }
            } else {
                DEFAULT_POPULATION
            };

            let country = match (country_present, row.country.clone()) {
                (true, Some(country)) => country,
                _ => {
                    stats.countries_filled += 1;
                    UNKNOWN_COUNTRY.to_string()
                }
            };

            working.push((
                row.date,
                CleanedRecord {
                    country,
                    date: NaiveDate::default(),
                    population,
                    new_cases: NumericCell::coerce(row.new_cases.as_deref()).value(),
                    people_vaccinated: NumericCell::coerce(row.people_vaccinated.as_deref()).value(),
                },
            ));
        }

        // Step 5: remove rows whose date never parsed, whether a malformed
        // origin cell or a synthesized column (distinct from the
        // future-date filter in step 1).
        let before = working.len();
        let working: Vec<CleanedRecord> = working
            .into_iter()
            .filter_map(|(date, record)| {
                Some(CleanedRecord {
                    date: date?,
                    ..record
                })
            })
            .collect();
        stats.invalid_dates_dropped = before - working.len();

        // Step 6: deduplicate on (country, date), keeping the last
        // occurrence in the current row order.
        let before = working.len();
        let deduplicated = keep_last(working);
        stats.duplicates_removed = before - deduplicated.len();
        stats.output_rows = deduplicated.len();

        let mut columns = raw.columns;
        columns.country = true;
        columns.date = true;
        columns.population = true;

        (
            CleanedTable {
                columns,
                rows: deduplicated,
            },
            stats,
        )
    }
}

/// Keep the last occurrence of each `(country, date)` key, preserving the
/// relative order of the survivors.
fn keep_last(rows: Vec<CleanedRecord>) -> Vec<CleanedRecord> {
    use std::collections::HashMap;

    let mut last_index: HashMap<(String, NaiveDate), usize> = HashMap::new();
    for (i, row) in rows.iter().enumerate() {
        last_index.insert((row.country.clone(), row.date), i);
    }

    rows.into_iter()
        .enumerate()
        .filter(|(i, row)| last_index[&(row.country.clone(), row.date)] == *i)
        .map(|(_, row)| row)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnSet, RawRecord, RawTable};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn cleaner() -> Cleaner {
        Cleaner::with_today(today())
    }

    fn raw_row(country: &str, date: &str, population: &str) -> RawRecord {
        RawRecord {
            country: Some(country.to_string()),
            date: crate::source::parse::parse_date(date),
            population: Some(population.to_string()),
            ..Default::default()
        }
    }

    fn table(rows: Vec<RawRecord>) -> RawTable {
        RawTable {
            columns: ColumnSet::minimal(),
            rows,
        }
    }

    #[test]
    fn test_future_dates_dropped() {
        let raw = table(vec![
            raw_row("Peru", "2024-05-30", "33000000"),
            raw_row("Peru", "2024-06-11", "33000000"), // 10 days ahead
        ]);

        let (cleaned, stats) = cleaner().clean_with_stats(&raw);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(stats.future_rows_dropped, 1);
        assert_eq!(
            cleaned.rows[0].date,
            NaiveDate::from_ymd_opt(2024, 5, 30).unwrap()
        );
    }

    #[test]
    fn test_population_repair() {
        let mut bad_null = raw_row("A", "2024-01-01", "");
        bad_null.population = None;
        let raw = table(vec![
            bad_null,
            raw_row("B", "2024-01-01", "abc"),
            raw_row("C", "2024-01-01", "0"),
            raw_row("D", "2024-01-01", "-5"),
            raw_row("E", "2024-01-01", "1000"),
        ]);

        let (cleaned, stats) = cleaner().clean_with_stats(&raw);
        assert_eq!(stats.population_nulls, 2); // null + non-numeric
        assert_eq!(stats.population_non_positive, 2); // zero + negative
        assert!(cleaned.rows.iter().all(|r| r.population > 0.0));
        assert_eq!(cleaned.rows[4].population, 1000.0);
    }

    #[test]
    fn test_missing_population_column_synthesized() {
        let mut columns = ColumnSet::minimal();
        columns.population = false;
        let raw = RawTable {
            columns,
            rows: vec![raw_row("Peru", "2024-01-01", "ignored")],
        };

        let (cleaned, stats) = cleaner().clean_with_stats(&raw);
        assert_eq!(stats.synthesized_columns, vec!["population"]);
        assert!(cleaned.columns.population);
        assert_eq!(cleaned.rows[0].population, DEFAULT_POPULATION);
    }

    #[test]
    fn test_missing_country_filled_with_sentinel() {
        let mut row = raw_row("x", "2024-01-01", "100");
        row.country = None;
        let raw = table(vec![row]);

        let (cleaned, stats) = cleaner().clean_with_stats(&raw);
        assert_eq!(cleaned.rows[0].country, UNKNOWN_COUNTRY);
        assert_eq!(stats.countries_filled, 1);
    }

    #[test]
    fn test_invalid_dates_dropped() {
        let raw = table(vec![
            raw_row("Peru", "not-a-date", "100"),
            raw_row("Peru", "2024-01-01", "100"),
        ]);

        let (cleaned, stats) = cleaner().clean_with_stats(&raw);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(stats.invalid_dates_dropped, 1);
    }

    #[test]
    fn test_dedup_keeps_last_occurrence() {
        let mut first = raw_row("A", "2024-01-01", "1000");
        first.new_cases = Some("10".to_string());
        let mut second = raw_row("A", "2024-01-01", "2000");
        second.new_cases = Some("5".to_string());

        let (cleaned, stats) = cleaner().clean_with_stats(&table(vec![first, second]));
        assert_eq!(cleaned.len(), 1);
        assert_eq!(stats.duplicates_removed, 1);
        assert_eq!(cleaned.rows[0].population, 2000.0);
        assert_eq!(cleaned.rows[0].new_cases, Some(5.0));
    }

    #[test]
    fn test_dedup_preserves_survivor_order() {
        let raw = table(vec![
            raw_row("A", "2024-01-01", "1"),
            raw_row("B", "2024-01-01", "2"),
            raw_row("A", "2024-01-01", "3"),
            raw_row("C", "2024-01-01", "4"),
        ]);

        let cleaned = cleaner().clean(&raw);
        let countries: Vec<&str> = cleaned.rows.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(countries, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let raw = table(vec![
            raw_row("A", "2024-01-01", "abc"),
            raw_row("A", "2024-01-01", "2000"),
            raw_row("B", "2024-01-02", "-1"),
            raw_row("B", "bad-date", "100"),
        ]);

        let first = cleaner().clean(&raw);
        let second = cleaner().clean(&first.to_raw());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input_keeps_required_schema() {
        let raw = RawTable {
            columns: ColumnSet::empty(),
            rows: Vec::new(),
        };

        let cleaned = cleaner().clean(&raw);
        assert!(cleaned.is_empty());
        assert!(cleaned.columns.missing_required().is_empty());
    }
}
