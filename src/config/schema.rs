use serde::{Deserialize, Serialize};

use crate::tailscale::template::validate_template;
use crate::tailscale::{Color, DisplayDefaults, DisplayFormats, DEFAULT_FORMAT, RUNNING_USING_EXIT_NODE};

/// States `tailscaled` reports, plus the synthetic exit-node state.
pub const KNOWN_STATES: &[&str] = &[
    "NoState",
    "NeedsLogin",
    "NeedsMachineAuth",
    "Stopped",
    "Starting",
    "Running",
    RUNNING_USING_EXIT_NODE,
];

/// Top-level `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidgetConfig {
    pub widget: WidgetSettings,
    pub display_formats: DisplayFormats,
}

/// The `[widget]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidgetSettings {
    /// Status binary, looked up on PATH unless it is a path.
    pub command: String,
    pub timeout_secs: u64,
    pub interval_secs: u64,
    pub format: String,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        let defaults = DisplayDefaults::default();
        Self {
            command: "tailscale".to_string(),
            timeout_secs: 5,
            interval_secs: 5,
            format: DEFAULT_FORMAT.to_string(),
            foreground: defaults.foreground,
            background: defaults.background,
        }
    }
}

/// A validation finding. Errors reject the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigMessage {
    Warning(String),
    Error(String),
}

impl WidgetConfig {
    /// Widget-wide format and colours for the presentation layer.
    pub fn display_defaults(&self) -> DisplayDefaults {
        DisplayDefaults {
            format: self.widget.format.clone(),
            foreground: self.widget.foreground.clone(),
            background: self.widget.background.clone(),
        }
    }

    pub fn validate(&self) -> Vec<ConfigMessage> {
        let mut messages = Vec::new();

        if self.widget.command.trim().is_empty() {
            messages.push(ConfigMessage::Error("widget.command must not be empty".to_string()));
        }
        if self.widget.timeout_secs == 0 {
            messages.push(ConfigMessage::Error("widget.timeout_secs must be at least 1".to_string()));
        }
        if self.widget.interval_secs == 0 {
            messages.push(ConfigMessage::Error("widget.interval_secs must be at least 1".to_string()));
        }
        if let Err(e) = validate_template(&self.widget.format) {
            messages.push(ConfigMessage::Error(format!("widget.format: {}", e)));
        }

        for (state, rule) in &self.display_formats {
            if !KNOWN_STATES.contains(&state.as_str()) {
                messages.push(ConfigMessage::Warning(format!(
                    "display_formats.{}: tailscale does not report this state",
                    state
                )));
            }
            if let Some(format) = &rule.format {
                if let Err(e) = validate_template(format) {
                    messages.push(ConfigMessage::Error(format!("display_formats.{}: {}", state, e)));
                }
            }
        }

        messages
    }
}
