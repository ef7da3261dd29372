//! jobtracker - checkpoint progress tracker
//!
//! CLI entry point for tracking a job and inspecting its checkpoint counts.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use jobtracker::cli::{Cli, Command, OutputFormat, get_log_path};
use jobtracker::config::Config;
use jobtracker::domain::JobId;
use jobtracker::fetcher::{HttpSnapshotFetcher, SnapshotFetcher};
use jobtracker::sink::{DEFAULT_FORWARD_CAPACITY, channel_callback, spawn_forwarder};
use jobtracker::tracker::{ContinuousJobTracker, JobCounters, TrackerMetrics, TrackingContext};

fn parse_level(level_str: Option<&str>) -> tracing::Level {
    let Some(s) = level_str else {
        return tracing::Level::INFO;
    };

    match s.to_uppercase().as_str() {
        "TRACE" => tracing::Level::TRACE,
        "DEBUG" => tracing::Level::DEBUG,
        "INFO" => tracing::Level::INFO,
        "WARN" | "WARNING" => tracing::Level::WARN,
        "ERROR" => tracing::Level::ERROR,
        _ => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
            tracing::Level::INFO
        }
    }
}

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_path = get_log_path();
    let log_dir = log_path.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = parse_level(cli_log_level.or(config_log_level));

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Track {
            job_id,
            interval_ms,
            base_url,
            duration_secs,
        } => {
            let config = apply_overrides(config, interval_ms, base_url)?;
            cmd_track(&config, JobId::new(job_id), duration_secs.map(Duration::from_secs)).await
        }
        Command::Fetch {
            job_id,
            base_url,
            format,
        } => {
            let config = apply_overrides(config, None, base_url)?;
            cmd_fetch(&config, JobId::new(job_id), format).await
        }
        Command::Config { format } => cmd_config(&config, format),
    }
}

/// Apply CLI overrides and validate the result
fn apply_overrides(mut config: Config, interval_ms: Option<u64>, base_url: Option<String>) -> Result<Config> {
    if let Some(ms) = interval_ms {
        config.tracker.poll_interval_ms = ms;
    }
    if let Some(url) = base_url {
        config.tracker.base_url = url;
        config.tracker.rest_address = None;
        config.tracker.rest_port = None;
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Track a job until Ctrl-C or the optional duration elapses
async fn cmd_track(config: &Config, job_id: JobId, duration: Option<Duration>) -> Result<()> {
    debug!(%job_id, ?duration, "cmd_track: called");
    let sink = config.sink.build().context("Failed to build facet sink")?;
    let sink_type = sink.sink_type();

    let (tx, rx) = mpsc::channel(DEFAULT_FORWARD_CAPACITY);
    let forwarder = spawn_forwarder(sink, rx);

    let metrics = Arc::new(TrackerMetrics::new());
    let tracker = ContinuousJobTracker::from_config(config.tracker.clone()).context("Failed to create tracker")?;
    let context = TrackingContext::new(job_id.clone()).with_metrics(metrics.clone());

    let session_id = tracker
        .start_tracking(context, channel_callback(job_id.clone(), tx))
        .await?;

    eprintln!(
        "{} {} (session {}, every {}ms, sink {})",
        "Tracking".green().bold(),
        job_id,
        session_id,
        config.tracker.poll_interval_ms,
        sink_type
    );

    match duration {
        Some(d) => tokio::time::sleep(d).await,
        None => {
            tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
            info!("Ctrl-C received");
        }
    }

    tracker.stop_tracking().await;

    // The stopped session dropped the last sender, so the forwarder drains and exits
    let delivered = forwarder.await.context("Facet forwarder panicked")?;

    if let Some(counters) = metrics.snapshot(&job_id) {
        print_counters(&counters, delivered);
    }
    Ok(())
}

fn print_counters(counters: &JobCounters, delivered: u64) {
    eprintln!("{}", "Tracking summary".bold());
    eprintln!("  polls:             {}", counters.polls);
    eprintln!("  poll successes:    {}", counters.poll_successes.to_string().green());
    eprintln!("  poll failures:     {}", counters.poll_failures.to_string().red());
    eprintln!("  facets emitted:    {}", counters.emitted);
    eprintln!("  facets delivered:  {}", delivered);
    eprintln!("  callback failures: {}", counters.callback_failures);
    eprintln!("  avg poll latency:  {:.1}ms", counters.avg_poll_latency_ms());
}

/// Fetch and print one snapshot
async fn cmd_fetch(config: &Config, job_id: JobId, format: OutputFormat) -> Result<()> {
    debug!(%job_id, %format, "cmd_fetch: called");
    let fetcher = HttpSnapshotFetcher::from_config(&config.tracker).context("Failed to create fetcher")?;
    let url = fetcher.endpoint(&job_id);
    let snapshot = fetcher
        .fetch(&job_id)
        .await
        .with_context(|| format!("Failed to fetch checkpoints from {}", url))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Text => {
            println!("{} {}", "Job".bold(), job_id);
            println!("  completed:   {}", snapshot.completed.to_string().green());
            println!("  failed:      {}", snapshot.failed.to_string().red());
            println!("  in_progress: {}", snapshot.in_progress.to_string().yellow());
            println!("  restored:    {}", snapshot.restored);
            println!("  total:       {}", snapshot.total.to_string().bold());
        }
    }
    Ok(())
}

/// Print the effective configuration
fn cmd_config(config: &Config, format: OutputFormat) -> Result<()> {
    debug!(%format, "cmd_config: called");
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
        OutputFormat::Text => print!("{}", serde_yaml::to_string(config)?),
    }
    Ok(())
}
