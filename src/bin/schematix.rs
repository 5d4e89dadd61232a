// src/bin/schematix.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use schematix::{
    CancellationToken,
    cli::{Cli, Commands, handlers},
    system::executor,
};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

fn main() {
    env_logger::init();
    let cancellation_token: CancellationToken = Arc::new(AtomicBool::new(false));

    if let Err(e) = run(Cli::parse(), &cancellation_token) {
        // A cancelled execution exits like an interrupted shell command,
        // without noise.
        if let Some(exec_err) = e.downcast_ref::<executor::ExecutionError>()
            && matches!(exec_err, executor::ExecutionError::Cancelled)
        {
            std::process::exit(130);
        }
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli, cancellation_token: &CancellationToken) -> Result<()> {
    match cli.command {
        Commands::Generate { path } => handlers::generate::handle(path, cli.root, cancellation_token),
        Commands::Quick { schematic, path } => {
            handlers::quick::handle(&schematic, path, cli.root, cancellation_token)
        }
    }
}
