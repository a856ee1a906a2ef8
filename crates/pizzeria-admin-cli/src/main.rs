//! pizzeria-admin - command-line admin client for the pizzeria platform.
//!
//! Manages users, restaurants (tenants), categories and products through
//! the platform's auth and catalog services.

mod app;
mod cli;
mod forms;
mod output;

use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use pizzeria_admin_core::{ApiError, Config};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use cli::Cli;
use output::Output;

/// File name prefix for the daily rolling log
const LOG_FILE_PREFIX: &str = "pizzeria-admin.log";

/// Initialize the tracing subscriber for logging.
///
/// `RUST_LOG` controls the level (default `warn`). With a log directory
/// configured, output also goes to a daily rolling file; the returned
/// guard must live until exit so buffered lines are flushed.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr = fmt::layer().with_writer(io::stderr);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(stderr)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(stderr)
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let _log_guard = init_tracing(config.log_dir.as_deref());
    if let Some(e) = config_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }
    info!(command = ?cli.command, "pizzeria-admin starting");

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let mut app = App::new(config, cli.url, Output::new(cli.json))?;
    app.run(cli.command).await
}

fn report(error: &anyhow::Error) {
    eprintln!("{}", describe(error));
}

fn describe(error: &anyhow::Error) -> String {
    match error.downcast_ref::<ApiError>() {
        Some(api @ ApiError::Validation { .. }) => format!("Error: {}", api.user_message()),
        Some(api) => match api.status() {
            Some(status) => format!("Error: {} [HTTP {}]\n  {}", api.user_message(), status, api),
            None => format!("Error: {}\n  {}", api.user_message(), api),
        },
        None => format!("Error: {:#}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_includes_http_status() {
        let error = anyhow::Error::new(ApiError::ServerError {
            status: 502,
            body: "upstream down".to_string(),
        });
        assert_eq!(
            describe(&error),
            "Error: An unexpected error occurred [HTTP 502]\n  Server error (502): upstream down"
        );

        let error = anyhow::Error::new(ApiError::InvalidRequest("no body".into()));
        assert!(!describe(&error).contains("HTTP"));

        let error = anyhow::anyhow!("plain failure");
        assert_eq!(describe(&error), "Error: plain failure");
    }
}
