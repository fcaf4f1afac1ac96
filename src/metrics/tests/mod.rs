//! Tests for the metric engine.

pub mod incidence_tests;

use chrono::{Duration, NaiveDate};

use crate::models::{ColumnSet, SelectedRecord, SelectedTable};

/// Build a selected table of daily rows for one country, starting at
/// 2021-01-01, with the given new-case counts and a fixed population.
pub fn daily_series(location: &str, new_cases: &[f64], population: f64) -> SelectedTable {
    let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
    let rows = new_cases
        .iter()
        .enumerate()
        .map(|(i, &cases)| SelectedRecord {
            location: location.to_string(),
            date: start + Duration::days(i as i64),
            new_cases: Some(cases),
            people_vaccinated: None,
            population: Some(population),
        })
        .collect();

    let mut columns = ColumnSet::minimal();
    columns.new_cases = true;
    SelectedTable { columns, rows }
}

pub fn one_country() -> Vec<String> {
    vec!["Peru".to_string()]
}
