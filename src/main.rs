#![doc = include_str!("../README.md")]
use std::process::ExitCode;

use color_eyre::eyre::Result;

mod clap;
mod cmds;
mod dice;
mod distribution;

/// Application entry point
///
/// See [`clap::Cli`] for a description of the CLI itself.
fn main() -> Result<ExitCode> {
    let Some(args) = clap::Cli::try_parse_args()? else {
        return Ok(ExitCode::SUCCESS);
    };
    args.init_colors()?;
    args.init_logging();
    args.run_command()
}
