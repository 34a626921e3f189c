mod api;
mod cli;
mod commands;
mod config;
mod errors;
mod gateway;
mod helpers;
mod models;
mod routes;
mod session;
mod state;
mod views;

#[cfg(test)]
mod test_support;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::commands::Outcome;
use crate::config::Config;
use crate::routes::Navigator;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let state = AppState::build(config, cli.ephemeral)?;
    info!(
        "HirePortal client v{} -> {}",
        env!("CARGO_PKG_VERSION"),
        state.config.api_base_url
    );
    let mut nav = Navigator::new(Arc::clone(&state.session));

    let result = commands::execute(cli.command, &state.gateway, &state.session, &mut nav).await;
    debug!("Ended at {} after visiting {:?}", nav.location(), nav.history());

    match result {
        Ok(Outcome::Output(text)) => {
            println!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        Ok(Outcome::Denied(message)) => {
            eprintln!("{message}");
            Ok(ExitCode::FAILURE)
        }
        Ok(Outcome::SessionExpired) => {
            eprintln!("Your session has expired. Please sign in again.");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => {
            eprintln!("{err}");
            Ok(ExitCode::FAILURE)
        }
    }
}
