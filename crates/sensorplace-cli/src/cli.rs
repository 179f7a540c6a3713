use clap::{Args, Parser, Subcommand};
use sensorplace::core::io::sensors::CoordinateFormat;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The sensorplace developers",
    version,
    about = "sensorplace - spreads observation sensors over a rectangular grid by minimizing a repulsion energy.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to evaluate the energy.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Optimize a sensor layout for a grid and write it to a sensor-location file.
    Place(PlaceArgs),
    /// Report the energy of an existing sensor-location file.
    Score(ScoreArgs),
}

/// Arguments for the `place` subcommand.
#[derive(Args, Debug)]
pub struct PlaceArgs {
    // --- Core Arguments ---
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory that receives `sensors_Nx{NX}_Ny{NY}.txt`.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    // --- Domain Overrides ---
    /// Number of grid cells along x.
    #[arg(long, value_name = "INT")]
    pub nx: Option<usize>,

    /// Number of grid cells along y.
    #[arg(long, value_name = "INT")]
    pub ny: Option<usize>,

    /// Fraction of grid cells that receive a sensor, in (0, 1].
    #[arg(short, long, value_name = "FLOAT")]
    pub fraction: Option<f64>,

    // --- Optimization Overrides ---
    /// Total pair-repulsion weight W [default: the sensor count, a unit weight per pair].
    #[arg(short, long, value_name = "FLOAT")]
    pub weight: Option<f64>,

    /// Seed of the initial random layout. A fresh seed is drawn and printed if omitted.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Maximum number of accepted descent iterations.
    #[arg(long, value_name = "INT")]
    pub max_iterations: Option<usize>,

    /// Stop instead of restarting momentum when a step stalls.
    #[arg(long)]
    pub no_restart: bool,

    /// Fail if the iteration limit is reached before the energy settles.
    #[arg(long)]
    pub strict: bool,

    /// Coordinate format of the written file: pixel, normalized or cell.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<CoordinateFormat>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S descent.initial-step=0.05
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Sensor-location file to evaluate.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Number of grid cells along x the file was written for.
    #[arg(long, required = true, value_name = "INT")]
    pub nx: usize,

    /// Number of grid cells along y the file was written for.
    #[arg(long, required = true, value_name = "INT")]
    pub ny: usize,

    /// Total pair-repulsion weight W [default: the sensor count].
    #[arg(short, long, value_name = "FLOAT")]
    pub weight: Option<f64>,

    /// Coordinate format of the file: pixel or normalized.
    #[arg(long, value_name = "FORMAT", default_value_t = CoordinateFormat::Pixel)]
    pub format: CoordinateFormat,
}
