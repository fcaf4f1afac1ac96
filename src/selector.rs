//! Projection of the raw table to the comparison country subset.
//!
//! Selection deliberately reads the RAW table, not the cleaned one: the
//! metric branch and the validation branch are contractually decoupled, so
//! quality repairs never alter the derived indicators. Population nulls are
//! therefore possible here and are not filtered; only rows unusable as
//! metric input are dropped.

use tracing::info;

use crate::models::{NumericCell, RawTable, SelectedRecord, SelectedTable};

/// Project a raw table to the given countries and the metric column subset.
///
/// Rows are filtered to the country set, projected to whichever of the
/// known columns exist, stripped of rows with a null in a present metric
/// column (`new_cases` / `people_vaccinated`) or an unparsable date, renamed
/// to the canonical `location` column, and sorted by `(location, date)`
/// ascending.
pub fn select(raw: &RawTable, countries: &[String]) -> SelectedTable {
    let mut rows: Vec<SelectedRecord> = raw
        .rows
        .iter()
        .filter_map(|row| {
            let location = row.country.as_deref()?;
            if !countries.iter().any(|c| c == location) {
                return None;
            }
            // The date is both the sort key and a metric output column;
            // a row without one is unusable downstream.
            let date = row.date?;

            let new_cases = NumericCell::coerce(row.new_cases.as_deref()).value();
            let people_vaccinated = NumericCell::coerce(row.people_vaccinated.as_deref()).value();

            // Null in a metric column that the origin actually provided
            // disqualifies the row. Absent columns disqualify nothing.
            if raw.columns.new_cases && new_cases.is_none() {
                return None;
            }
            if raw.columns.people_vaccinated && people_vaccinated.is_none() {
                return None;
            }

            Some(SelectedRecord {
                location: location.to_string(),
                date,
                new_cases,
                people_vaccinated,
                population: NumericCell::coerce(row.population.as_deref()).value(),
            })
        })
        .collect();

    rows.sort_by(|a, b| (&a.location, a.date).cmp(&(&b.location, b.date)));

    info!(
        selected = rows.len(),
        countries = ?countries,
        "raw table projected to comparison subset"
    );

    SelectedTable {
        columns: raw.columns,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnSet, RawRecord};
    use crate::source::parse::parse_date;
    use chrono::NaiveDate;

    fn row(country: &str, date: &str, new_cases: Option<&str>, pop: Option<&str>) -> RawRecord {
        RawRecord {
            country: Some(country.to_string()),
            date: parse_date(date),
            population: pop.map(str::to_string),
            new_cases: new_cases.map(str::to_string),
            people_vaccinated: None,
        }
    }

    fn countries() -> Vec<String> {
        vec!["Ecuador".to_string(), "Peru".to_string()]
    }

    #[test]
    fn test_filters_to_country_set() {
        let mut columns = ColumnSet::minimal();
        columns.new_cases = true;
        let raw = RawTable {
            columns,
            rows: vec![
                row("Ecuador", "2021-01-01", Some("5"), Some("17000000")),
                row("Chile", "2021-01-01", Some("9"), Some("19000000")),
                row("Peru", "2021-01-01", Some("7"), Some("33000000")),
            ],
        };

        let selected = select(&raw, &countries());
        assert_eq!(selected.len(), 2);
        assert!(selected.rows.iter().all(|r| r.location != "Chile"));
    }

    #[test]
    fn test_drops_null_metric_inputs_only_when_column_present() {
        let mut columns = ColumnSet::minimal();
        columns.new_cases = true;
        let raw = RawTable {
            columns,
            rows: vec![
                row("Peru", "2021-01-01", None, Some("33000000")),
                row("Peru", "2021-01-02", Some("7"), Some("33000000")),
            ],
        };
        assert_eq!(select(&raw, &countries()).len(), 1);

        // Same rows, but the origin never provided new_cases at all: the
        // null no longer disqualifies anything.
        let raw_without = RawTable {
            columns: ColumnSet::minimal(),
            ..raw
        };
        assert_eq!(select(&raw_without, &countries()).len(), 2);
    }

    #[test]
    fn test_population_nulls_are_not_filtered() {
        let mut columns = ColumnSet::minimal();
        columns.new_cases = true;
        let raw = RawTable {
            columns,
            rows: vec![row("Peru", "2021-01-01", Some("7"), None)],
        };

        let selected = select(&raw, &countries());
        assert_eq!(selected.len(), 1);
        assert_eq!(selected.rows[0].population, None);
    }

    #[test]
    fn test_sorted_by_location_then_date() {
        let raw = RawTable {
            columns: ColumnSet::minimal(),
            rows: vec![
                row("Peru", "2021-01-02", None, Some("1")),
                row("Ecuador", "2021-01-05", None, Some("1")),
                row("Peru", "2021-01-01", None, Some("1")),
                row("Ecuador", "2021-01-03", None, Some("1")),
            ],
        };

        let selected = select(&raw, &countries());
        let keys: Vec<(&str, NaiveDate)> = selected
            .rows
            .iter()
            .map(|r| (r.location.as_str(), r.date))
            .collect();
        let mut expected = keys.clone();
        expected.sort();
        assert_eq!(keys, expected);
        assert_eq!(keys[0].0, "Ecuador");
    }

    #[test]
    fn test_unparsable_dates_dropped() {
        let raw = RawTable {
            columns: ColumnSet::minimal(),
            rows: vec![
                row("Peru", "bad", None, Some("1")),
                row("Peru", "2021-01-01", None, Some("1")),
            ],
        };
        assert_eq!(select(&raw, &countries()).len(), 1);
    }
}
