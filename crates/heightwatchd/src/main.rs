//! heightwatchd: the heightwatch daemon.
//!
//! Single binary that assembles every heightwatch subsystem:
//! - Pool registry fetcher + height poller
//! - Registry and height refresh loops
//! - Discord command handler
//!
//! # Usage
//!
//! ```text
//! heightwatchd --config heightwatch.toml run --token-file token.txt
//! heightwatchd poll
//! ```

mod token;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use secrecy::ExposeSecret;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use heightwatch_core::HeightwatchConfig;
use heightwatch_poller::{HeightPoller, RefreshIntervals, RefreshMonitor, RegistryFetcher};
use heightwatch_state::PoolState;

#[derive(Parser)]
#[command(name = "heightwatchd", about = "Pool height aggregator and Discord bot")]
struct Cli {
    /// Path to heightwatch.toml. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the refresh loops and the Discord bot until interrupted.
    Run {
        /// File whose first line is the bot token. Overrides the config file.
        #[arg(long)]
        token_file: Option<PathBuf>,
    },
    /// Fetch the registry, poll every pool once, and print the result.
    Poll {
        /// Print the report as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = match &cli.config {
        Some(path) => HeightwatchConfig::from_file(path)?,
        None => HeightwatchConfig::default(),
    };

    match cli.command {
        Command::Run { token_file } => run(config, token_file).await,
        Command::Poll { json } => poll_once(config, json).await,
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,heightwatch=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Build the refresh monitor and its shared state from config.
fn build_monitor(config: &HeightwatchConfig) -> anyhow::Result<RefreshMonitor> {
    let client = heightwatch_poller::build_client(config)?;
    let fetcher = RegistryFetcher::new(client.clone(), config.registry_url());
    let poller = HeightPoller::new(client);
    let intervals = RefreshIntervals::from_config(config)?;
    Ok(RefreshMonitor::new(fetcher, poller, PoolState::new(), intervals))
}

async fn run(config: HeightwatchConfig, token_file: Option<PathBuf>) -> anyhow::Result<()> {
    info!("heightwatch daemon starting");

    let token_path = token_file.unwrap_or_else(|| config.token_file());
    let token = token::load_token(&token_path)?;
    info!(path = ?token_path, "bot token loaded");

    let monitor = build_monitor(&config)?;

    // ── Initial snapshots ──────────────────────────────────────

    let pools = monitor
        .refresh_registry()
        .await
        .context("initial pool registry fetch failed")?;
    let report = monitor.refresh_heights().await;
    info!(pools, polled = report.heights.len(), median = ?report.aggregate, "initial snapshots ready");

    // ── Discord ────────────────────────────────────────────────

    let mut client = heightwatch_bot::connect(token.expose_secret(), monitor.state().clone())
        .await
        .context("failed to initialise discord client")?;
    let shard_manager = client.shard_manager.clone();

    // ── Start background tasks ─────────────────────────────────

    let loops = RefreshLoops::spawn(&monitor);
    let mut gateway = tokio::spawn(async move { client.start().await });

    let outcome = tokio::select! {
        signal = wait_for_shutdown() => {
            info!("shutdown requested");
            shard_manager.shutdown_all().await;
            signal
        }
        joined = &mut gateway => {
            match joined {
                Ok(Ok(())) => Err(anyhow::anyhow!("discord gateway closed unexpectedly")),
                Ok(Err(e)) => Err(anyhow::Error::new(e).context("discord gateway failed")),
                Err(e) => Err(anyhow::Error::new(e).context("discord gateway task panicked")),
            }
        }
    };

    // ── Shutdown ───────────────────────────────────────────────

    loops.stop().await;
    if !gateway.is_finished() {
        gateway.abort();
    }

    info!("heightwatch daemon stopped");
    outcome
}

/// The two refresh loops running as background tasks.
struct RefreshLoops {
    shutdown: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl RefreshLoops {
    fn spawn(monitor: &RefreshMonitor) -> Self {
        let (shutdown, shutdown_rx) = watch::channel(false);

        let registry_monitor = monitor.clone();
        let registry_shutdown = shutdown_rx.clone();
        let registry_handle = tokio::spawn(async move {
            registry_monitor.run_registry_loop(registry_shutdown).await;
        });

        let height_monitor = monitor.clone();
        let height_handle = tokio::spawn(async move {
            height_monitor.run_height_loop(shutdown_rx).await;
        });

        Self {
            shutdown,
            handles: vec![registry_handle, height_handle],
        }
    }

    /// Signal both loops and wait for them to finish.
    async fn stop(self) {
        let _ = self.shutdown.send(true);
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}

/// One-shot diagnostic: no Discord connection, no loops.
async fn poll_once(config: HeightwatchConfig, json: bool) -> anyhow::Result<()> {
    let monitor = build_monitor(&config)?;
    monitor
        .refresh_registry()
        .await
        .context("pool registry fetch failed")?;
    let report = monitor.refresh_heights().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&*report)?);
        return Ok(());
    }

    for (name, height) in report.heights.iter() {
        println!("{name:<25} {height}");
    }
    match report.aggregate {
        Some(median) => println!("\nmedian {median} ({} pools)", report.heights.len()),
        None => println!("\nno pool answered"),
    }
    Ok(())
}

/// Resolve on SIGINT, or SIGTERM on unix.
async fn wait_for_shutdown() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = terminate.recv() => {}
        }
    }
    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_run_with_overrides() {
        let cli = Cli::parse_from([
            "heightwatchd",
            "--config",
            "/etc/heightwatch.toml",
            "run",
            "--token-file",
            "/run/secrets/token",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/heightwatch.toml")));
        match cli.command {
            Command::Run { token_file } => {
                assert_eq!(token_file, Some(PathBuf::from("/run/secrets/token")));
            }
            Command::Poll { .. } => panic!("expected run"),
        }
    }

    #[test]
    fn parse_poll_json() {
        let cli = Cli::parse_from(["heightwatchd", "poll", "--json", "--log-format", "json"]);
        assert!(matches!(cli.command, Command::Poll { json: true }));
        assert!(matches!(cli.log_format, LogFormat::Json));
    }

    #[test]
    fn build_monitor_from_defaults() {
        let monitor = build_monitor(&HeightwatchConfig::default()).unwrap();
        assert!(monitor.state().registry().is_empty());
    }

    #[tokio::test]
    async fn refresh_loops_stop_when_signalled() {
        let monitor = build_monitor(&HeightwatchConfig::default()).unwrap();
        let loops = RefreshLoops::spawn(&monitor);

        tokio::time::timeout(std::time::Duration::from_secs(2), loops.stop())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn run_fails_without_token() {
        let err = run(
            HeightwatchConfig::default(),
            Some(PathBuf::from("/nonexistent/token.txt")),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("failed to read token file"));
    }
}
