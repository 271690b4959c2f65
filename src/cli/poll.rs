use anyhow::Result;
use clap::Args as ClapArgs;

use super::{output, CommonArgs};
use crate::tailscale;

/// Arguments for the `tswidget poll` subcommand.
#[derive(ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Run one cycle. A failed fetch prints nothing and still exits 0 so the
/// bar keeps its previous text; template errors are reported.
pub fn run(args: Args) -> Result<()> {
    let widget = args.common.prepare()?;
    let rt = super::runtime()?;

    let rendered = rt.block_on(tailscale::poll(&widget.fetcher, &widget.rules, &widget.defaults))?;
    if let Some(rendered) = rendered {
        output::emit(&rendered, args.common.output)?;
    }

    Ok(())
}
