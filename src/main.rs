mod cli;
mod commands;
mod config;
mod db;
mod error;
mod services;

use std::process::ExitCode;

use canvas::gateway::MemoryGateway;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::AppError;
use crate::services::store::{ProjectStore, SqliteGateway};

fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, "failed to load .env");
        }
    }

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: &Config) -> Result<(), AppError> {
    let canvas_config = config.canvas_config();
    let mut stdout = std::io::stdout().lock();

    if cli.memory {
        let mut store = MemoryGateway::new();
        store.create_project("Scratch", false)?;
        info!("using in-memory store");
        return commands::run(&mut store, cli.command, &canvas_config, &mut stdout);
    }

    let database_url = cli.database_url.as_deref().unwrap_or(&config.database_url);
    if cli.database_url.is_none() {
        std::fs::create_dir_all(&config.data_dir)?;
    }
    let mut store = SqliteGateway::connect(database_url)?;
    commands::run(&mut store, cli.command, &canvas_config, &mut stdout)
}
