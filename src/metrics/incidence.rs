//! 7-day incidence rate.

use tracing::debug;

use crate::constants::{INCIDENCE_SCALE, ROLLING_WINDOW_DAYS};
use crate::models::{IncidencePoint, SelectedTable};

use super::rolling_mean_min1;

/// Derive the 7-day incidence rate for each country, in the given order.
///
/// Requires the `new_cases` and `population` columns and at least one row
/// for the country; countries that do not qualify contribute no rows.
/// Daily incidence is `new_cases / population x 100,000`; the trailing
/// 7-day mean allows partial windows, so every input row produces exactly
/// one output point.
pub fn incidence_7d(table: &SelectedTable, countries: &[String]) -> Vec<IncidencePoint> {
    let mut points = Vec::new();

    if !table.columns.new_cases || !table.columns.population {
        debug!("incidence requires new_cases and population columns; skipping");
        return points;
    }

    for country in countries {
        let rows = table.rows_for(country);
        if rows.is_empty() {
            debug!(country = %country, "no rows for country; incidence omitted");
            continue;
        }

        let daily: Vec<f64> = rows
            .iter()
            .map(|row| match (row.new_cases, row.population) {
                (Some(cases), Some(population)) if population != 0.0 => {
                    cases / population * INCIDENCE_SCALE
                }
                _ => f64::NAN,
            })
            .collect();

        let means = rolling_mean_min1(&daily, ROLLING_WINDOW_DAYS);
        points.extend(rows.iter().zip(means).map(|(row, incidence_7d)| {
            IncidencePoint {
                date: row.date,
                location: row.location.clone(),
                incidence_7d,
            }
        }));
    }

    points
}
