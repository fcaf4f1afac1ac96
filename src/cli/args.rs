//! Command-line argument definitions for the epi pipeline.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::PipelineConfig;

/// CLI arguments for the epi pipeline
///
/// Cleans, validates and derives rolling epidemiological indicators from
/// the OWID COVID-19 compact dataset.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "epi-pipeline",
    version,
    about = "Clean, validate and derive rolling indicators from the OWID COVID-19 dataset",
    long_about = "Ingests the OWID COVID-19 compact dataset, repairs data-quality defects, \
                  verifies five integrity invariants, and derives the 7-day incidence rate \
                  and 7-day growth factor for a configurable set of countries, exporting \
                  the results as timestamped CSV reports."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run the full pipeline: fetch, clean, validate, derive, export
    Run(RunArgs),
    /// Inspect the structure of the origin dataset without deriving metrics
    Inspect(InspectArgs),
}

/// Arguments for the run command
#[derive(Debug, Clone, Parser)]
pub struct RunArgs {
    /// Origin URL for the raw dataset
    ///
    /// Defaults to the OWID COVID-19 compact dataset.
    #[arg(long = "source-url", value_name = "URL")]
    pub source_url: Option<String>,

    /// Local cached CSV consulted once when the origin is unreachable
    #[arg(long = "fallback", value_name = "PATH")]
    pub fallback_path: Option<PathBuf>,

    /// Output directory for the CSV report
    ///
    /// A timestamped report directory is created underneath. If not given,
    /// no report is written.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output_path: Option<PathBuf>,

    /// Comparison countries (comma-separated list)
    ///
    /// Defaults to the two-country comparison: Ecuador, Peru.
    #[arg(
        short = 'c',
        long = "countries",
        value_name = "LIST",
        value_delimiter = ','
    )]
    pub countries: Option<Vec<String>>,

    /// Timeout for the origin fetch, in seconds
    #[arg(long = "timeout-secs", value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

impl RunArgs {
    /// Fold the CLI overrides into a pipeline configuration.
    pub fn to_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        if let Some(url) = &self.source_url {
            config = config.with_source_url(url.clone());
        }
        if let Some(path) = &self.fallback_path {
            config = config.with_fallback_path(path.clone());
        }
        if let Some(countries) = &self.countries {
            config = config.with_countries(countries.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_http_timeout_secs(secs);
        }
        if let Some(path) = &self.output_path {
            config = config.with_output_root(path.clone());
        }
        config
    }
}

/// Arguments for the inspect command
#[derive(Debug, Clone, Parser)]
pub struct InspectArgs {
    /// Origin URL for the raw dataset
    #[arg(long = "source-url", value_name = "URL")]
    pub source_url: Option<String>,

    /// Local cached CSV consulted once when the origin is unreachable
    #[arg(long = "fallback", value_name = "PATH")]
    pub fallback_path: Option<PathBuf>,

    /// Countries to show sample rows for (comma-separated list)
    #[arg(
        short = 'c',
        long = "countries",
        value_name = "LIST",
        value_delimiter = ','
    )]
    pub countries: Option<Vec<String>>,

    /// Number of sample rows to print
    #[arg(long = "sample-rows", value_name = "N", default_value_t = 10)]
    pub sample_rows: usize,

    /// Write the profiling table to this CSV file
    #[arg(long = "profile-out", value_name = "PATH")]
    pub profile_out: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args_defaults_match_default_config() {
        let args = Args::parse_from(["epi-pipeline", "run"]);
        let Some(Commands::Run(run_args)) = args.command else {
            panic!("expected run subcommand");
        };

        let config = run_args.to_config();
        assert_eq!(config.countries, vec!["Ecuador", "Peru"]);
        assert!(config.output_root.is_none());
    }

    #[test]
    fn test_countries_list_is_comma_separated() {
        let args = Args::parse_from(["epi-pipeline", "run", "--countries", "Chile,Bolivia"]);
        let Some(Commands::Run(run_args)) = args.command else {
            panic!("expected run subcommand");
        };

        assert_eq!(
            run_args.to_config().countries,
            vec!["Chile".to_string(), "Bolivia".to_string()]
        );
    }
}
