use clap::Parser;
use epi_pipeline::cli::{args::Args, commands};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Log to stderr; level controlled via RUST_LOG, defaulting to info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match commands::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {error:#}");
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Epi Pipeline - OWID COVID-19 Indicator Derivation");
    println!("=================================================");
    println!();
    println!("Clean, validate and derive rolling epidemiological indicators from the");
    println!("OWID COVID-19 compact dataset.");
    println!();
    println!("USAGE:");
    println!("    epi-pipeline <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    run         Run the full pipeline and export a CSV report (main command)");
    println!("    inspect     Profile the structure of the origin dataset");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Run with the default two-country comparison (Ecuador, Peru):");
    println!("    epi-pipeline run --output ./reports");
    println!();
    println!("    # Run for a custom country set with a local fallback file:");
    println!("    epi-pipeline run --countries Chile,Bolivia --fallback ./compact.csv");
    println!();
    println!("    # Inspect the origin dataset structure:");
    println!("    epi-pipeline inspect --profile-out profile.csv");
    println!();
    println!("For detailed help on any command, use:");
    println!("    epi-pipeline <COMMAND> --help");
}
