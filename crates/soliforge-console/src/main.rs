/*
[INPUT]:  CLI arguments, optional YAML config, SOLIFORGE_* environment, OS signals
[OUTPUT]: Terminal UI or a headless command against the SoliForge API
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

mod cli;
mod logging;
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use soliforge_console::{ConsoleConfig, SessionStore};

use crate::cli::Command;
use crate::logging::LogSink;

#[derive(Parser, Debug)]
#[command(name = "soliforge", version, about = "SoliForge smart contract audit console")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    /// API root, e.g. http://127.0.0.1:8000/api
    #[arg(long = "api-url", value_name = "URL", global = true)]
    api_url: Option<String>,
    /// Bearer token to use instead of the stored session
    #[arg(long, value_name = "TOKEN", env = "SOLIFORGE_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    log_level: Option<String>,
    /// Validate configuration, print it and exit
    #[arg(long = "dry-run", global = true)]
    dry_run: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let config = load_config(&args)?;

    let tui_mode = !args.dry_run && matches!(args.command, None | Some(Command::Tui));
    let log_buffer = tui::new_log_buffer();
    let sink = if tui_mode {
        LogSink::Buffer(log_buffer.clone())
    } else {
        LogSink::Stderr
    };
    let _log_guard = logging::init(&config.logging.level, config.logging.file.as_deref(), sink)?;

    info!(
        config_path = ?args.config_path,
        api_url = %config.api.base_url,
        dry_run = args.dry_run,
        "starting soliforge"
    );

    if args.dry_run {
        info!("dry-run requested; configuration validated");
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    let store = SessionStore::from_config(&config.session)?;
    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    let (client, username) = cli::connect(&config, &store, args.token.as_deref()).await?;

    match args.command {
        None | Some(Command::Tui) => {
            tui::run_tui_with_log(config, store, client, log_buffer, username, shutdown).await
        }
        Some(command) => cli::run(command, &config, &store, client, shutdown).await,
    }
}

fn load_config(args: &Cli) -> Result<ConsoleConfig> {
    let mut config = ConsoleConfig::load(args.config_path.as_deref()).context("load config")?;
    if let Some(api_url) = args.api_url.as_deref() {
        config.api.base_url = api_url.to_string();
    }
    if let Some(level) = args.log_level.as_deref() {
        config.logging.level = level.to_string();
    }
    config.validate().context("validate config")?;
    Ok(config)
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
