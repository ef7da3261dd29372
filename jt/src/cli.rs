//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// jobtracker - checkpoint progress tracker for streaming jobs
#[derive(Parser)]
#[command(
    name = "jt",
    about = "Track checkpoint progress of a running job and report every change",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll a job's checkpoints and deliver every change to the configured sink
    Track {
        /// Job identifier
        #[arg(value_name = "JOB_ID")]
        job_id: String,

        /// Override the poll interval in milliseconds
        #[arg(short, long)]
        interval_ms: Option<u64>,

        /// Override the jobs API base URL (or `{job_id}` template)
        #[arg(short, long)]
        base_url: Option<String>,

        /// Stop after this many seconds instead of waiting for Ctrl-C
        #[arg(short, long)]
        duration_secs: Option<u64>,
    },

    /// Fetch a job's checkpoint counts once
    Fetch {
        /// Job identifier
        #[arg(value_name = "JOB_ID")]
        job_id: String,

        /// Override the jobs API base URL (or `{job_id}` template)
        #[arg(short, long)]
        base_url: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the effective configuration
    Config {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Default log file location
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jobtracker")
        .join("logs")
        .join("jobtracker.log")
}

/// Output format for fetch/config commands
#[derive(Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => {
                debug!(%s, "OutputFormat::from_str: unknown format");
                Err(format!("Unknown format: {}. Use: text or json", s))
            }
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
