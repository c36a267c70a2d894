//! Speedwatch - Router Time-Limit Watcher
//!
//! Main entry point for the CLI application.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::info;

use speedwatch::browser::{CdpDriver, PageScraper, SessionManager};
use speedwatch::cli;
use speedwatch::core::LogLevel;
use speedwatch::sink::{FileSink, LogSink, StatusSink};
use speedwatch::{logging, Config, FetchCycle, PollLoop};

/// Speedwatch - Router Time-Limit Watcher
#[derive(Parser, Debug)]
#[command(name = "speedwatch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path (default: ~/.config/speedwatch/config.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Router status page URL
    #[arg(long)]
    url: Option<String>,

    /// Poll interval in seconds
    #[arg(long)]
    interval: Option<u64>,

    /// Run with a visible browser window
    #[arg(long)]
    headed: bool,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Watch the router and publish status updates (default)
    Watch,
    /// Run a single fetch cycle and print the rendered status
    Fetch,
    /// Inspect or update the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Update one key and save the file atomically
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(Config::config_file);

    // Build configuration
    let mut config = Config::load(&config_path);

    // Apply CLI overrides
    if let Some(url) = args.url {
        config.router.url = url;
    }
    if let Some(interval) = args.interval {
        config.poll.interval_secs = interval;
    }
    if args.headed {
        config.browser.headed = true;
    }
    if args.debug {
        config.logging.level = LogLevel::Debug;
    }
    config.validate()?;

    match args.command.unwrap_or(Command::Watch) {
        Command::Config { action } => run_config(action, &config, &config_path)?,
        Command::Fetch => {
            logging::init(config.logging.level, config.logging.file.as_deref())?;
            run_fetch(config).await?;
        }
        Command::Watch => {
            logging::init(config.logging.level, config.logging.file.as_deref())?;
            run_watch(config, config_path).await;
        }
    }

    Ok(())
}

fn run_config(action: ConfigAction, config: &Config, path: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => println!("{}", cli::show_config(config)),
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Set { key, value } => println!("{}", cli::set_config(path, &key, &value)?),
    }
    Ok(())
}

fn build_fetch_cycle(config: &Config) -> FetchCycle {
    let driver = CdpDriver::new(&config.browser);
    let sessions = SessionManager::new(
        Box::new(driver),
        config.router.url.clone(),
        Duration::from_millis(config.router.settle_delay_ms),
    );
    FetchCycle::new(sessions, PageScraper::new())
}

/// Single fetch mode: one cycle, rendered status on stdout
async fn run_fetch(config: Config) -> anyhow::Result<()> {
    let mut fetch = build_fetch_cycle(&config);
    let result = fetch.fetch_once().await;
    fetch.terminate().await;

    println!("{}", result?.to_display_text());
    Ok(())
}

async fn run_watch(config: Config, config_path: PathBuf) {
    info!(version = env!("CARGO_PKG_VERSION"), "starting speedwatch");

    // Seed the config file so the per-cycle re-read has something to read
    // and operators have a file to edit.
    if !config_path.exists() {
        if let Err(err) = config.save(&config_path) {
            tracing::warn!(%err, "could not write initial config file");
        }
    }

    let sink: Arc<dyn StatusSink> = match &config.display.status_file {
        Some(path) => Arc::new(FileSink::new(path.clone())),
        None => Arc::new(LogSink),
    };

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            let _ = stop_tx.send(true);
        }
    });

    let fetch = build_fetch_cycle(&config);
    PollLoop::new(fetch, sink, config, config_path, stop_rx)
        .run()
        .await;
}
