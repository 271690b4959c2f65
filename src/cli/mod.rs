pub mod output;
pub mod poll;
pub mod watch;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::config;
use crate::tailscale::{DisplayDefaults, DisplayFormats, StatusFetcher};
use output::OutputMode;

/// Tailscale connection status for status bars
#[derive(Parser)]
#[command(name = "tswidget", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the current tailscale status label once
    Poll(poll::Args),

    /// Print the status label every interval until interrupted
    Watch(watch::Args),
}

/// Flags shared by `poll` and `watch`.
#[derive(ClapArgs, Debug, Clone)]
pub struct CommonArgs {
    /// Path to config.toml (default: $TSWIDGET_CONFIG or <config dir>/tswidget/config.toml)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Tailscale binary to run instead of `widget.command`
    #[arg(long, env = "TSWIDGET_TAILSCALE_BIN")]
    pub tailscale_bin: Option<String>,

    /// Seconds to wait for `tailscale status` before giving up
    #[arg(long)]
    pub timeout: Option<u64>,

    /// How to print the label
    #[arg(long, short, value_enum, default_value_t = OutputMode::Text)]
    pub output: OutputMode,

    /// Logging verbosity for stderr: off, error, warn, info, debug
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Everything one poll cycle needs, resolved from config and flags.
pub struct Widget {
    pub fetcher: StatusFetcher,
    pub rules: DisplayFormats,
    pub defaults: DisplayDefaults,
    pub interval: Duration,
}

impl CommonArgs {
    /// Initialize logging, load the config and merge the CLI overrides.
    /// CLI flags win over the config file.
    pub fn prepare(&self) -> Result<Widget> {
        init_tracing(self.log_level.as_deref());

        let config = config::load(self.config.as_deref())?;
        let defaults = config.display_defaults();

        let binary = self
            .tailscale_bin
            .clone()
            .unwrap_or_else(|| config.widget.command.clone());
        let timeout_secs = self.timeout.unwrap_or(config.widget.timeout_secs);
        if timeout_secs == 0 {
            anyhow::bail!("--timeout must be at least 1 second");
        }

        Ok(Widget {
            fetcher: StatusFetcher::new(binary, Duration::from_secs(timeout_secs))
                .with_component("tswidget"),
            rules: config.display_formats,
            defaults,
            interval: Duration::from_secs(config.widget.interval_secs),
        })
    }
}

/// Single-threaded runtime; a poll is one child process at a time.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")
}

/// Send tracing output to stderr so stdout carries only labels.
/// `--log-level` wins over `RUST_LOG`; the default is `warn`.
fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level @ ("off" | "error" | "warn" | "info" | "debug" | "trace")) => level.to_string(),
        Some(other) => {
            eprintln!("warning: unknown log level '{}', defaulting to 'warn'", other);
            "warn".to_string()
        }
        None => std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()),
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}
