use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "structbind - bind macromolecular structures to alignment sequences and pick common superposition fit columns.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Select the alignment columns usable as common fit points and print per-structure ranges.
    Superpose(SuperposeArgs),
    /// Print which alignment positions map to which structure residues.
    Describe(DescribeArgs),
}

/// Inputs shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Path to the aligned FASTA file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub alignment: PathBuf,

    /// Path to the structure manifest in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub structures: PathBuf,
}

/// Arguments for the `superpose` subcommand.
#[derive(Args, Debug)]
pub struct SuperposeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Overrides ---
    /// Override the minimum number of fit columns required.
    #[arg(short = 'm', long, value_name = "INT")]
    pub min_columns: Option<usize>,

    /// Override the base structure-load timeout, in milliseconds.
    #[arg(short = 't', long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Write the residue selected at each fit column to a CSV file.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

/// Arguments for the `describe` subcommand.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub input: InputArgs,
}
