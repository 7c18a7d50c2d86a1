//! eventd CLI entry point.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::Level;

use eventd_client::cli::{Cli, Command};
use eventd_client::commands;
use eventd_client::commands::serve::ServeOptions;
use eventd_client::error::ClientResult;
use eventd_client::socket::DaemonClient;
use eventd_core::{LogFormat, TracingConfig, init_tracing};
use eventd_server::default_socket_path;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = match &cli.command {
        Command::Serve { log_json, .. } => {
            let config = TracingConfig::daemon();
            if *log_json {
                config
            } else {
                config.with_format(LogFormat::Compact)
            }
        }
        _ => TracingConfig::cli(),
    };
    let tracing_config = if cli.debug {
        tracing_config.with_level(Level::DEBUG)
    } else {
        tracing_config
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {e}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let socket_path = cli.socket_path.clone().unwrap_or_else(default_socket_path);

    match cli.command {
        Command::Serve {
            data,
            site_url,
            pid_file,
            log_json: _,
        } => {
            commands::serve::run(ServeOptions {
                socket_path,
                data,
                site_url,
                pid_file,
            })
            .await
        }
        command => {
            let client = DaemonClient::new(socket_path, Duration::from_secs(cli.timeout));
            match command {
                Command::Events { from, to, at } => {
                    commands::query::events(&client, from, to, at, cli.json).await
                }
                Command::Month { year, month } => {
                    commands::query::month(&client, year, month, cli.json).await
                }
                Command::Show { id } => commands::query::show(&client, id, cli.json).await,
                Command::Status => commands::query::status(&client).await,
                Command::Ping => commands::query::ping(&client).await,
                Command::Stop => commands::query::stop(&client).await,
                Command::Serve { .. } => unreachable!("handled above"),
            }
        }
    }
}
