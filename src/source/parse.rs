//! CSV decoding of the origin table.
//!
//! Picks the five known columns out of the header by name and ignores the
//! rest of the origin's (wide) schema. Dates are parsed here; cells that do
//! not parse become null. Undecodable rows are skipped and counted, never
//! raised.

use std::io::Read;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::constants::columns;
use crate::error::Result;
use crate::models::{ColumnSet, RawRecord, RawTable};

/// Header positions of the known columns, if present.
#[derive(Debug, Default, Clone, Copy)]
struct ColumnIndices {
    country: Option<usize>,
    date: Option<usize>,
    population: Option<usize>,
    new_cases: Option<usize>,
    people_vaccinated: Option<usize>,
}

impl ColumnIndices {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut indices = Self::default();
        for (i, name) in headers.iter().enumerate() {
            match name.trim() {
                columns::COUNTRY => indices.country = Some(i),
                columns::DATE => indices.date = Some(i),
                columns::POPULATION => indices.population = Some(i),
                columns::NEW_CASES => indices.new_cases = Some(i),
                columns::PEOPLE_VACCINATED => indices.people_vaccinated = Some(i),
                _ => {}
            }
        }
        indices
    }

    fn column_set(&self) -> ColumnSet {
        ColumnSet {
            country: self.country.is_some(),
            date: self.date.is_some(),
            population: self.population.is_some(),
            new_cases: self.new_cases.is_some(),
            people_vaccinated: self.people_vaccinated.is_some(),
        }
    }
}

/// Decode a CSV byte stream into a raw table.
pub fn parse_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let indices = ColumnIndices::from_headers(csv_reader.headers()?);
    let column_set = indices.column_set();

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in csv_reader.records() {
        match record {
            Ok(record) => rows.push(decode_record(&record, &indices)),
            Err(e) => {
                debug!("skipping undecodable row: {e}");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, "some rows could not be decoded and were skipped");
    }

    Ok(RawTable {
        columns: column_set,
        rows,
    })
}

fn decode_record(record: &csv::StringRecord, indices: &ColumnIndices) -> RawRecord {
    RawRecord {
        country: cell(record, indices.country),
        date: cell(record, indices.date).as_deref().and_then(parse_date),
        population: cell(record, indices.population),
        new_cases: cell(record, indices.new_cases),
        people_vaccinated: cell(record, indices.people_vaccinated),
    }
}

/// A cell by index; absent columns and blank cells both yield `None`.
fn cell(record: &csv::StringRecord, index: Option<usize>) -> Option<String> {
    let text = record.get(index?)?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Parse a date cell. The origin uses ISO dates; a datetime form is
/// tolerated for re-ingested data.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date())
        })
        .ok()
}
