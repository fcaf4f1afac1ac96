//! The run command: execute the full pipeline and print a summary.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::Result;
use crate::cli::args::RunArgs;
use crate::models::Severity;
use crate::pipeline::Pipeline;

pub fn run_pipeline(args: &RunArgs) -> Result<()> {
    let config = args.to_config();
    config.validate()?;

    println!("{}", "Starting epi pipeline run".bright_green().bold());
    println!("  {} {}", "Origin:".bright_cyan(), config.source_url);
    println!(
        "  {} {}",
        "Countries:".bright_cyan(),
        config.countries.join(", ")
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Fetching, cleaning and deriving indicators...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let report = Pipeline::new(config).run();

    spinner.finish_and_clear();

    println!("\n{}", "Run Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Raw rows:".bright_cyan(),
        report.raw_rows.to_string().bright_white()
    );
    println!(
        "  {} {} ({} duplicates removed)",
        "Cleaned rows:".bright_cyan(),
        report.cleaned_rows.to_string().bright_white(),
        report.duplicates_removed
    );
    println!(
        "  {} {}",
        "Selected rows:".bright_cyan(),
        report.selected_rows.to_string().bright_white()
    );
    println!(
        "  {} {} incidence, {} growth-factor",
        "Metric points:".bright_cyan(),
        report.incidence_rows.to_string().bright_white(),
        report.growth_rows.to_string().bright_white()
    );

    println!(
        "\n{} ({}/{} passed)",
        "Validation Checks".bright_green().bold(),
        report.checks_passed(),
        report.validations.len()
    );
    for validation in &report.validations {
        let mark = if validation.passed {
            "PASS".bright_green()
        } else {
            match validation.severity {
                Severity::Warn => "WARN".bright_yellow(),
                Severity::Error => "FAIL".bright_red().bold(),
            }
        };
        println!(
            "  [{mark}] {} - {}",
            validation.check_name.bright_white(),
            validation.description
        );
    }

    match &report.report {
        Some(paths) => println!(
            "\n  {} {}",
            "Report written to:".bright_cyan(),
            paths.report_dir.display()
        ),
        None => println!("\n  {}", "No report written".bright_yellow()),
    }

    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        report.elapsed_ms.to_string().bright_white()
    );

    Ok(())
}
