use std::{path::Path, process::ExitCode};

use clap::Parser;
use cloudnet_rs::{
    binning::{derive_edges_with, EdgeRounding},
    config::ProcessingConfig,
    logging::init_logging,
    time_axis::{build_time_grid, epoch_to_decimal_hour},
};
use error_stack::ResultExt;
use ndarray::ArrayView1;

mod cli;

fn main() -> ExitCode {
    let clargs = cli::Cli::parse();
    if let Err(e) = init_logging(clargs.verbosity.log_level_filter()) {
        eprintln!("WARNING: {e}");
    }

    if let Err(e) = main_inner(clargs) {
        eprintln!("ERROR: {e:?}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn main_inner(clargs: cli::Cli) -> error_stack::Result<(), CliError> {
    match clargs.command {
        cli::Commands::TimeGrid(grid_cli) => print_time_grid(grid_cli),
        cli::Commands::DecimalHours(hours_cli) => print_decimal_hours(hours_cli),
        cli::Commands::Edges(edges_cli) => print_edges(edges_cli),
        cli::Commands::ConfigTemplate(template_cli) => {
            ProcessingConfig::write_template(&template_cli.template_file)
                .change_context(CliError::Config)?;
            log::info!(
                "Wrote example configuration to {}",
                template_cli.template_file.display()
            );
            Ok(())
        }
    }
}

fn print_time_grid(cli: cli::TimeGridCli) -> error_stack::Result<(), CliError> {
    let grid = if let Some(reso) = cli.resolution {
        build_time_grid(reso).change_context(CliError::InvalidInput)?
    } else if let Some(config_file) = cli.config.as_deref() {
        load_config(config_file)?.time_grid()
    } else {
        ProcessingConfig::default().time_grid()
    };

    for h in grid.iter() {
        println!("{h}");
    }
    Ok(())
}

fn print_decimal_hours(cli: cli::DecimalHoursCli) -> error_stack::Result<(), CliError> {
    let config_date = match cli.config.as_deref() {
        Some(config_file) => load_config(config_file)?.date,
        None => None,
    };

    let epoch = cli.date.or(config_date).ok_or_else(|| {
        CliError::context("a date must be given with --date or in the configuration file")
    })?;

    let hours = epoch_to_decimal_hour(&epoch, &cli.times)
        .change_context(CliError::InvalidInput)
        .attach_printable_lazy(|| format!("converting times relative to {epoch}"))?;

    for h in hours {
        println!("{h}");
    }
    Ok(())
}

fn print_edges(cli: cli::EdgesCli) -> error_stack::Result<(), CliError> {
    let rounding = if cli.exact {
        EdgeRounding::Exact
    } else {
        EdgeRounding::NearestEven
    };

    let edges = derive_edges_with(ArrayView1::from(&cli.centers), rounding)
        .change_context(CliError::InvalidInput)?;

    for e in edges.iter() {
        println!("{e}");
    }
    Ok(())
}

fn load_config(config_file: &Path) -> error_stack::Result<ProcessingConfig, CliError> {
    ProcessingConfig::from_toml_file(config_file)
        .change_context(CliError::Config)
        .attach_printable_lazy(|| format!("configuration file: {}", config_file.display()))
}

/// Program error type
#[derive(Debug, thiserror::Error)]
enum CliError {
    /// Indicates the configuration could not be read or written.
    #[error("Configuration error")]
    Config,

    /// Indicates one of the command line values was not acceptable.
    #[error("Invalid input")]
    InvalidInput,

    /// Wrapper type used to add information to an inner error.
    #[error("{0}")]
    Context(String),
}

impl CliError {
    fn context<S: ToString>(ctx: S) -> Self {
        Self::Context(ctx.to_string())
    }
}
