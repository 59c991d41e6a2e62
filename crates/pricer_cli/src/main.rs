//! `card-pricer`: prices a card list across the supported web shops.
mod app;
mod args;
mod config;
mod effects;
mod render;

use std::process::ExitCode;

use clap::Parser;
use pricer_logging::pricer_error;

fn main() -> ExitCode {
    let args = args::CliArgs::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            pricer_error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
