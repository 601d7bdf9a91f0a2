//! SymForge CLI - compile constraint text from the terminal
//!
//! Reads constraint text from a file or stdin and:
//! - lists the variables it references
//! - prints its penalty form or solver form
//! - evaluates the composed penalty at a point
//! - repairs a point with the composed constraint function

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

mod commands;
mod error;

use commands::{CouplingArg, PenaltyArg};
use error::CliResult;

/// SymForge CLI application
#[derive(Debug, Parser)]
#[command(name = "symforge")]
#[command(about = "SymForge - symbolic constraint compiler", long_about = None)]
#[command(version)]
struct Cli {
    /// Compiler configuration file (TOML, or YAML by extension)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Explicit variable names, in index order
    #[arg(long, global = true, value_delimiter = ',')]
    variables: Option<Vec<String>>,

    /// Declared number of variables
    #[arg(short, long, global = true)]
    nvars: Option<usize>,

    /// Fail on lines without a relational operator
    #[arg(long, global = true)]
    strict: bool,

    /// Compile pure-arithmetic conditions to native code
    #[arg(long, global = true)]
    jit: bool,

    /// Print compiler events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// List the variables referenced by the constraints
    Variables {
        /// Constraint file; stdin when absent or `-`
        input: Option<PathBuf>,
    },

    /// Print the penalty form, one tagged expression per line
    PenaltyForm { input: Option<PathBuf> },

    /// Print the solver form, one assignment per line
    SolverForm { input: Option<PathBuf> },

    /// Evaluate the composed penalty at a point
    Penalty {
        input: Option<PathBuf>,

        /// Point components, comma separated
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        point: Vec<f64>,

        /// Penalty kind; once for all conditions or once per condition
        #[arg(short, long = "kind", value_enum)]
        kinds: Vec<PenaltyArg>,

        /// Print the composed terms before the value
        #[arg(short, long)]
        describe: bool,
    },

    /// Repair a point with the composed constraint function
    Repair {
        input: Option<PathBuf>,

        /// Point components, comma separated
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        point: Vec<f64>,

        /// Coupling kind; once for all solvers or once per solver
        #[arg(long = "coupling", value_enum)]
        couplings: Vec<CouplingArg>,

        /// Print the composed steps before the point
        #[arg(short, long)]
        describe: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.verbose {
        symforge_console::init();
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".bright_red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let compiler = commands::compiler(&cli)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Variables { input } => {
            commands::variables(&compiler, &commands::read_input(input.as_deref())?, &mut out)
        }
        Commands::PenaltyForm { input } => {
            commands::penalty_form(&compiler, &commands::read_input(input.as_deref())?, &mut out)
        }
        Commands::SolverForm { input } => {
            commands::solver_form(&compiler, &commands::read_input(input.as_deref())?, &mut out)
        }
        Commands::Penalty {
            input,
            point,
            kinds,
            describe,
        } => commands::penalty(
            &compiler,
            &commands::read_input(input.as_deref())?,
            &point,
            &kinds,
            describe,
            &mut out,
        ),
        Commands::Repair {
            input,
            point,
            couplings,
            describe,
        } => commands::repair(
            &compiler,
            &commands::read_input(input.as_deref())?,
            &point,
            &couplings,
            describe,
            &mut out,
        ),
    }
}
