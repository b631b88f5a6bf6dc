#![forbid(unsafe_code)]
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use log::{debug, error};
use psplib::Format;

mod commands;

#[derive(Debug, Parser)]
/// Read RCPSP-family benchmark instances
struct App {
    #[clap(flatten)]
    verbose: Verbosity,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse an instance and print a summary of it
    Parse {
        /// One of rcpsp-ps, mplib1, mplib2, mslib
        format: Format,
        path: PathBuf,
        /// Print the parsed instance as JSON instead of a summary
        #[clap(long)]
        json: bool,
        /// Pretty print the JSON output
        #[clap(long, requires = "json")]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    let args: App = App::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    debug!("{args:?}");

    if let Err(err) = match args.command {
        Commands::Parse {
            format,
            path,
            json,
            pretty,
        } => commands::parse(format, path, json, pretty),
    } {
        error!("An error occurred: {:#}", err);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
