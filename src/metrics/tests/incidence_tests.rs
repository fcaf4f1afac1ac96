//! Unit tests for the 7-day incidence rate.

use super::{daily_series, one_country};
use crate::metrics::{incidence_7d, rolling_mean_min1};

#[test]
fn test_output_length_matches_input_length() {
    // Partial windows are allowed, so no leading rows are lost.
    let table = daily_series("Peru", &[10.0, 20.0, 30.0], 100_000.0);
    let points = incidence_7d(&table, &one_country());
    assert_eq!(points.len(), 3);
}

#[test]
fn test_partial_window_averages_available_days() {
    // Population of 100,000 makes daily incidence equal new_cases.
    let table = daily_series("Peru", &[10.0, 20.0, 30.0], 100_000.0);
    let points = incidence_7d(&table, &one_country());

    assert_eq!(points[0].incidence_7d, 10.0);
    assert_eq!(points[1].incidence_7d, 15.0);
    assert_eq!(points[2].incidence_7d, 20.0);
}

#[test]
fn test_full_window_is_trailing_seven_days() {
    let cases: Vec<f64> = (1..=10).map(|i| i as f64).collect();
    let table = daily_series("Peru", &cases, 100_000.0);
    let points = incidence_7d(&table, &one_country());

    // Day 10 averages days 4..=10
    let expected = (4..=10).sum::<i32>() as f64 / 7.0;
    assert_eq!(points[9].incidence_7d, expected);
}

#[test]
fn test_scaled_per_hundred_thousand() {
    let table = daily_series("Peru", &[50.0], 1_000_000.0);
    let points = incidence_7d(&table, &one_country());
    assert_eq!(points[0].incidence_7d, 5.0);
}

#[test]
fn test_missing_columns_yield_no_points() {
    let mut table = daily_series("Peru", &[1.0, 2.0], 100.0);
    table.columns.new_cases = false;
    assert!(incidence_7d(&table, &one_country()).is_empty());

    let mut table = daily_series("Peru", &[1.0, 2.0], 100.0);
    table.columns.population = false;
    assert!(incidence_7d(&table, &one_country()).is_empty());
}

#[test]
fn test_country_without_rows_is_omitted() {
    let table = daily_series("Peru", &[1.0, 2.0], 100.0);
    let countries = vec!["Peru".to_string(), "Ecuador".to_string()];
    let points = incidence_7d(&table, &countries);

    assert_eq!(points.len(), 2);
    assert!(points.iter().all(|p| p.location == "Peru"));
}

#[test]
fn test_null_population_rows_still_emit_points() {
    let mut table = daily_series("Peru", &[10.0, 20.0], 100_000.0);
    table.rows[0].population = None;
    let points = incidence_7d(&table, &one_country());

    // The row with no population contributes nothing to the window but a
    // point is still emitted for it.
    assert_eq!(points.len(), 2);
    assert!(points[0].incidence_7d.is_nan());
    assert_eq!(points[1].incidence_7d, 20.0);
}

#[test]
fn test_rolling_mean_skips_non_finite_values() {
    let means = rolling_mean_min1(&[f64::NAN, 4.0, 8.0], 7);
    assert!(means[0].is_nan());
    assert_eq!(means[1], 4.0);
    assert_eq!(means[2], 6.0);
}
