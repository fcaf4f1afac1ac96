//! Command implementations for the epi pipeline CLI.
//!
//! Each subcommand lives in its own module; this module dispatches.

pub mod inspect;
pub mod run;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Dispatch to the selected subcommand. `None` is handled by the binary
/// entry point before this is reached.
pub fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Run(run_args)) => run::run_pipeline(&run_args),
        Some(Commands::Inspect(inspect_args)) => inspect::run_inspect(&inspect_args),
        None => Ok(()),
    }
}
