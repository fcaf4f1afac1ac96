//! 7-day growth factor.

use tracing::debug;

use crate::constants::{MIN_GROWTH_ROWS, ROLLING_WINDOW_DAYS};
use crate::models::{GrowthPoint, SelectedTable};

/// Derive the weekly growth factor for each country, in the given order.
///
/// Requires the `new_cases` column and at least 14 date-ascending rows for
/// the country. The weekly sum is a full trailing 7-day window (a null
/// anywhere in the window yields no sum), the previous week is the same
/// series shifted by 7 rows. Rows lacking either sum, rows whose previous
/// sum is non-positive (undefined ratio) and non-finite ratios are all
/// dropped silently.
pub fn growth_factor_7d(table: &SelectedTable, countries: &[String]) -> Vec<GrowthPoint> {
    let mut points = Vec::new();

    if !table.columns.new_cases {
        debug!("growth factor requires the new_cases column; skipping");
        return points;
    }

    for country in countries {
        let rows = table.rows_for(country);
        if rows.len() < MIN_GROWTH_ROWS {
            debug!(
                country = %country,
                rows = rows.len(),
                "fewer than {MIN_GROWTH_ROWS} rows; growth factor omitted"
            );
            continue;
        }

        let cases: Vec<Option<f64>> = rows.iter().map(|row| row.new_cases).collect();
        let weekly = trailing_week_sums(&cases);

        // The first 13 rows can never have both a current and a previous
        // week behind them.
        for i in (MIN_GROWTH_ROWS - 1)..rows.len() {
            let (Some(current), Some(previous)) =
                (weekly[i], weekly[i - ROLLING_WINDOW_DAYS])
            else {
                continue;
            };
            if previous <= 0.0 {
                continue;
            }
            let factor = current / previous;
            if !factor.is_finite() {
                continue;
            }
            points.push(GrowthPoint {
                week_end_date: rows[i].date,
                location: rows[i].location.clone(),
                weekly_cases: current,
                growth_factor_7d: factor,
            });
        }
    }

    points
}

/// Trailing 7-day sums with full windows only: positions without seven
/// preceding values, or with a null anywhere in the window, yield `None`.
fn trailing_week_sums(cases: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut sums = Vec::with_capacity(cases.len());
    for i in 0..cases.len() {
        if i + 1 < ROLLING_WINDOW_DAYS {
            sums.push(None);
            continue;
        }
        let window = &cases[i + 1 - ROLLING_WINDOW_DAYS..=i];
        let sum = window
            .iter()
            .try_fold(0.0, |acc, v| v.map(|v| acc + v))
            .filter(|s| s.is_finite());
        sums.push(sum);
    }
    sums
}
