//! detype: removes TypeScript types while keeping the code as written.

mod cli;
mod config;
mod runner;

use clap::Parser;
use cli::Args;
use log::LevelFilter;
use miette::{IntoDiagnostic, Result};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    runner::run(args).into_diagnostic()
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::new().filter_or("DETYPE_LOG", "warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}
