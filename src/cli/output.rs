use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;

use crate::tailscale::RenderedText;

/// How a rendered label is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// The bare label
    Text,
    /// The label painted with its colours as ANSI escapes
    Ansi,
    /// One JSON object per line: {"text", "foreground", "background"}
    Json,
}

/// Print one line for `rendered` and flush, so bars reading a pipe see it
/// immediately.
pub fn emit(rendered: &RenderedText, mode: OutputMode) -> Result<()> {
    if mode == OutputMode::Ansi {
        // stdout is usually a pipe here; colour unless NO_COLOR asks otherwise.
        colored::control::set_override(std::env::var_os("NO_COLOR").is_none());
    }

    let line = format_line(rendered, mode)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", line)?;
    stdout.flush()?;
    Ok(())
}

/// The line printed for `rendered` in `mode`, without a trailing newline.
pub fn format_line(rendered: &RenderedText, mode: OutputMode) -> Result<String> {
    let line = match mode {
        OutputMode::Text => rendered.text.clone(),
        OutputMode::Json => serde_json::to_string(rendered)?,
        OutputMode::Ansi => paint(rendered),
    };
    Ok(line)
}

fn paint(rendered: &RenderedText) -> String {
    let mut text = rendered.text.normal();
    if let Some(fg) = rendered.foreground.as_deref().and_then(parse_color) {
        text = text.color(fg);
    }
    if let Some(bg) = rendered.background.as_deref().and_then(parse_color) {
        text = text.on_color(bg);
    }
    text.to_string()
}

/// Parse `"ff8800"`, `"#ff8800"` or a colour name like `"bright blue"`.
pub fn parse_color(value: &str) -> Option<colored::Color> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some(colored::Color::TrueColor {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        });
    }

    let parsed = value.parse::<colored::Color>().ok();
    if parsed.is_none() {
        tracing::debug!("ignoring unrecognized colour '{}'", value);
    }
    parsed
}
