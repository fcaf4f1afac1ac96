//! Tests for the validation checks.


use chrono::NaiveDate;

use crate::models::{CleanedRecord, CleanedTable, ColumnSet};

/// Create a cleaned record with sensible defaults
pub fn record(country: &str, date: (i32, u32, u32), population: f64) -> CleanedRecord {
    CleanedRecord {
        country: country.to_string(),
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        population,
        new_cases: Some(0.0),
        people_vaccinated: None,
    }
}

/// Create a cleaned table with the given rows and the full column set
pub fn cleaned_table(rows: Vec<CleanedRecord>) -> CleanedTable {
    CleanedTable {
        columns: ColumnSet::full(),
        rows,
    }
}

/// Create a cleaned table without the optional new_cases column
pub fn table_without_new_cases(rows: Vec<CleanedRecord>) -> CleanedTable {
    let mut table = cleaned_table(rows);
    table.columns.new_cases = false;
    table.rows.iter_mut().for_each(|r| r.new_cases = None);
    table
}
