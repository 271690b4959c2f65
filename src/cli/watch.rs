use std::time::Duration;

use anyhow::Result;
use clap::Args as ClapArgs;
use tokio::time::MissedTickBehavior;

use super::{output, CommonArgs, Widget};
use crate::tailscale;

/// Arguments for the `tswidget watch` subcommand.
#[derive(ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Seconds between polls (default: widget.interval_secs)
    #[arg(long, short)]
    pub interval: Option<u64>,
}

pub fn run(args: Args) -> Result<()> {
    let mut widget = args.common.prepare()?;
    if let Some(secs) = args.interval {
        if secs == 0 {
            anyhow::bail!("--interval must be at least 1 second");
        }
        widget.interval = Duration::from_secs(secs);
    }

    let rt = super::runtime()?;
    rt.block_on(watch(&widget, args.common.output))
}

/// Poll every `widget.interval` until Ctrl-C. Polls never overlap: a slow
/// fetch delays the next tick instead of queueing another one.
async fn watch(widget: &Widget, mode: output::OutputMode) -> Result<()> {
    let mut ticker = tokio::time::interval(widget.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Registered once so a signal arriving between polls is still seen.
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    tracing::info!(interval_secs = widget.interval.as_secs(), "watching tailscale status");

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut ctrl_c => {
                tracing::info!("interrupted, stopping");
                return Ok(());
            }
        }

        let polled = tokio::select! {
            polled = tailscale::poll(&widget.fetcher, &widget.rules, &widget.defaults) => polled,
            _ = &mut ctrl_c => {
                tracing::info!("interrupted during poll, stopping");
                return Ok(());
            }
        };

        if let Some(rendered) = polled? {
            output::emit(&rendered, mode)?;
        }
    }
}
