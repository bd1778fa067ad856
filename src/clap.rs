//! Command-line interface definition
use std::process::ExitCode;

use ::clap::error::{ContextKind, ContextValue, ErrorKind};
use ::clap::{Args, CommandFactory, Parser};
use color_eyre::eyre::{Report, Result};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cmds::{self, Columns};
use crate::dice::{DiceError, DiceSet, Die};

#[doc(hidden)]
mod shadow {
    shadow_rs::shadow!(build);
}

/// Calculate the odds of rolling each sum with a set of dice
///
/// Computes the number of ways each sum can be rolled with the given dice,
/// and displays it as a table of occurrences and/or probabilities, or as a
/// graph. Can also roll the dice once.
#[derive(Parser)]
#[command(
    name = "dice-odds",
    version,
    author,
    long_version = shadow::build::CLAP_LONG_VERSION,
    arg_required_else_help(true),
    args_override_self(true),
    after_help = "Example: dice-odds d6 d8 -p -g -o",
)]
pub struct Cli {
    #[clap(flatten)]
    global_opts: GlobalOpts,

    /// Dice to roll, e.g. `d6` or `d20`
    #[clap(value_name = "DIE")]
    dice: Vec<String>,

    #[clap(flatten)]
    views: Views,
}

impl Cli {
    /// Parse command-line arguments
    ///
    /// Requests for help or version information are printed immediately, in
    /// which case `Ok(None)` is returned. Parse failures are translated into
    /// [`DiceError`]s where possible, and reported using the default colors
    /// since `--color` could not be read.
    pub fn try_parse_args() -> Result<Option<Self>> {
        let error = match Self::try_parse() {
            Ok(cli) => return Ok(Some(cli)),
            Err(error) => error,
        };
        match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                error.print()?;
                Ok(None)
            }
            _ => {
                install_hooks(clap::ColorChoice::Auto)?;
                Err(translate_error(error)?)
            }
        }
    }

    /// Initialize logging, based on arguments
    pub fn init_logging(&self) {
        env_logger::Builder::new()
            .filter_level(self.global_opts.verbose.log_level_filter())
            .init();
    }

    /// Initialize color handling, based on arguments
    pub fn init_colors(&self) -> Result<()> {
        install_hooks(self.global_opts.color)
    }

    /// Run the requested computation
    pub fn run_command(self) -> Result<ExitCode> {
        let columns = self.views.columns();
        if columns.is_empty() && !self.views.roll {
            Self::command().print_help()?;
            return Ok(ExitCode::SUCCESS);
        }
        let dice = DiceSet::new(
            self.dice
                .iter()
                .map(|token| Die::try_from(token.as_str()))
                .try_collect()?,
        )?;
        log::info!("Computing odds for {dice}");
        let report = match self.views.roll {
            true => cmds::report(&dice, columns, Some(&mut self.views.rng())),
            false => cmds::report::<StdRng>(&dice, columns, None),
        }?;
        print!("{report}");
        Ok(ExitCode::SUCCESS)
    }
}

/// Translate a clap parse failure into a domain error, where possible
fn translate_error(error: ::clap::Error) -> Result<Report> {
    Ok(match error.kind() {
        ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            error.print()?;
            DiceError::NoArguments.into()
        }
        ErrorKind::UnknownArgument => match error.get(ContextKind::InvalidArg) {
            Some(ContextValue::String(flag)) => DiceError::InvalidFlag(flag.clone()).into(),
            _ => error.into(),
        },
        _ => error.into(),
    })
}

/// Install error report hooks & color overrides
fn install_hooks(color: clap::ColorChoice) -> Result<()> {
    let hooks = color_eyre::config::HookBuilder::default();
    match color {
        clap::ColorChoice::Always => {
            owo_colors::set_override(true);
            hooks.theme(color_eyre::config::Theme::dark()).install()
        }
        clap::ColorChoice::Auto => {
            owo_colors::unset_override();
            hooks.theme(color_eyre::config::Theme::dark()).install()
        }
        clap::ColorChoice::Never => {
            owo_colors::set_override(false);
            hooks.theme(color_eyre::config::Theme::new()).install()
        }
    }
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// Whether to use colors or not
    #[clap(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: clap::ColorChoice,

    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

#[derive(Debug, Args)]
struct Views {
    /// Show probabilities
    #[clap(long = "prob", short = 'p')]
    probability: bool,

    /// Show occurrences
    #[clap(long = "occ", short = 'o')]
    occurrences: bool,

    /// Show a graph of occurrences
    #[clap(long, short = 'g')]
    graph: bool,

    /// Roll the specified dice
    #[clap(long, short = 'r')]
    roll: bool,

    /// Seed the random number generator used when rolling
    #[clap(long, value_name = "SEED", requires = "roll")]
    seed: Option<u64>,
}

impl Views {
    /// The requested table columns
    fn columns(&self) -> Columns {
        Columns {
            occurrences: self.occurrences,
            probability: self.probability,
            graph: self.graph,
        }
    }

    /// Random number generator for rolling, seeded if requested
    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
