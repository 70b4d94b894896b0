//! Command line interface definitions
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use cloudnet_rs::time_axis::DayEpoch;

/// Inspect the time grids and bin edges used in Cloudnet processing.
#[derive(Debug, Parser)]
pub(crate) struct Cli {
    #[clap(subcommand)]
    pub(crate) command: Commands,

    #[command(flatten)]
    pub(crate) verbosity: Verbosity<InfoLevel>,
}

#[derive(Debug, Clone, Subcommand)]
pub(crate) enum Commands {
    /// Print the decimal hour time grid, one point per line
    TimeGrid(TimeGridCli),
    /// Convert seconds since midnight UTC to decimal hours
    DecimalHours(DecimalHoursCli),
    /// Print the bin edges derived from a list of bin centers
    Edges(EdgesCli),
    /// Create an example of the configuration file
    ConfigTemplate(TemplateCli),
}

#[derive(Debug, Clone, Args)]
pub(crate) struct TimeGridCli {
    /// Time resolution in seconds (1 to 60). If neither this nor --config
    /// is given, the default resolution is used.
    #[clap(short, long, conflicts_with = "config")]
    pub(crate) resolution: Option<i64>,

    /// Path to a TOML configuration file to take the resolution from.
    #[clap(short, long)]
    pub(crate) config: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct DecimalHoursCli {
    /// The day the times are relative to, as YYYY-MM-DD. Required unless
    /// the configuration file given by --config has a date.
    #[clap(short, long)]
    pub(crate) date: Option<DayEpoch>,

    /// Path to a TOML configuration file to take the date from.
    #[clap(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Sample times, in seconds since midnight UTC of the date.
    #[clap(required = true, allow_negative_numbers = true)]
    pub(crate) times: Vec<f64>,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct EdgesCli {
    /// Do not round the outer edges to whole numbers.
    #[clap(long)]
    pub(crate) exact: bool,

    /// Bin centers, at least two, in increasing order.
    #[clap(required = true, allow_negative_numbers = true)]
    pub(crate) centers: Vec<f64>,
}

/// Create an example of the configuration file
#[derive(Debug, Clone, Args)]
pub(crate) struct TemplateCli {
    /// Path to write the template to
    pub(crate) template_file: PathBuf,
}
