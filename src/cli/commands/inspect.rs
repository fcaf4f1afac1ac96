//! The inspect command: profile the structure of the origin dataset.
//!
//! Pure diagnostics with no contract: fetches the raw table, reports which
//! of the critical columns exist, the date range and the country count, and
//! optionally writes the profile as a CSV table.

use std::collections::BTreeSet;
use std::path::Path;

use colored::*;
use serde::Serialize;

use crate::Result;
use crate::cli::args::InspectArgs;
use crate::config::PipelineConfig;
use crate::constants::columns;
use crate::models::RawTable;
use crate::source::DatasetSource;

#[derive(Debug, Serialize)]
struct ProfileRow {
    metric: &'static str,
    value: String,
    description: &'static str,
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let mut config = PipelineConfig::default();
    if let Some(url) = &args.source_url {
        config = config.with_source_url(url.clone());
    }
    if let Some(path) = &args.fallback_path {
        config = config.with_fallback_path(path.clone());
    }
    if let Some(countries) = &args.countries {
        config = config.with_countries(countries.clone());
    }

    println!("{}", "Inspecting dataset".bright_green().bold());
    println!("  {} {}", "Origin:".bright_cyan(), config.source_url);

    let table = DatasetSource::from_config(&config).fetch();
    let profile = build_profile(&table);

    println!("\n{}", "Structure".bright_green().bold());
    for row in &profile {
        println!(
            "  {:<28} {}",
            format!("{}:", row.metric).bright_cyan(),
            row.value.bright_white()
        );
    }

    println!("\n{}", "Critical columns".bright_green().bold());
    for (name, present) in [
        (columns::COUNTRY, table.columns.country),
        (columns::DATE, table.columns.date),
        (columns::NEW_CASES, table.columns.new_cases),
        (columns::PEOPLE_VACCINATED, table.columns.people_vaccinated),
        (columns::POPULATION, table.columns.population),
    ] {
        let mark = if present {
            "present".bright_green()
        } else {
            "absent".bright_red()
        };
        println!("  {:<20} {mark}", name);
    }

    print_samples(&table, &config.countries, args.sample_rows);

    if let Some(path) = &args.profile_out {
        write_profile(path, &profile)?;
        println!(
            "\n  {} {}",
            "Profile written to:".bright_cyan(),
            path.display()
        );
    }

    Ok(())
}

fn build_profile(table: &RawTable) -> Vec<ProfileRow> {
    let countries: BTreeSet<&str> = table
        .rows
        .iter()
        .filter_map(|r| r.country.as_deref())
        .collect();
    let min_date = table.rows.iter().filter_map(|r| r.date).min();
    let max_date = table.rows.iter().filter_map(|r| r.date).max();
    let date_text = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.to_string()).unwrap_or_else(|| "none".to_string())
    };

    vec![
        ProfileRow {
            metric: "total_rows",
            value: table.len().to_string(),
            description: "Total rows in the dataset",
        },
        ProfileRow {
            metric: "total_countries",
            value: countries.len().to_string(),
            description: "Number of unique countries",
        },
        ProfileRow {
            metric: "min_date",
            value: date_text(min_date),
            description: "Oldest date in the data",
        },
        ProfileRow {
            metric: "max_date",
            value: date_text(max_date),
            description: "Most recent date in the data",
        },
    ]
}

fn print_samples(table: &RawTable, countries: &[String], sample_rows: usize) {
    println!(
        "\n{} ({})",
        "Sample rows".bright_green().bold(),
        countries.join(", ")
    );
    let samples = table
        .rows
        .iter()
        .filter(|r| {
            r.country
                .as_deref()
                .is_some_and(|c| countries.iter().any(|wanted| wanted == c))
        })
        .take(sample_rows);

    let mut printed = 0usize;
    for row in samples {
        println!(
            "  {} {} new_cases={} people_vaccinated={} population={}",
            row.country.as_deref().unwrap_or("-"),
            row.date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
            row.new_cases.as_deref().unwrap_or("-"),
            row.people_vaccinated.as_deref().unwrap_or("-"),
            row.population.as_deref().unwrap_or("-"),
        );
        printed += 1;
    }
    if printed == 0 {
        println!("  {}", "no rows for the requested countries".bright_yellow());
    }
}

fn write_profile(path: &Path, profile: &[ProfileRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in profile {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
