mod cli;
mod config;
mod error;
mod tailscale;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Poll(args) => cli::poll::run(args),
        Command::Watch(args) => cli::watch::run(args),
    }
}
