pub mod schema;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[allow(unused_imports)]
pub use schema::{ConfigMessage, WidgetConfig, WidgetSettings};

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "TSWIDGET_CONFIG";

/// Load, parse and validate the widget configuration.
///
/// An explicit `path` must exist. Otherwise `$TSWIDGET_CONFIG` and then
/// `<config_dir>/tswidget/config.toml` are tried, and a missing file yields
/// the defaults. Validation warnings are logged; errors fail the load.
pub fn load(path: Option<&Path>) -> Result<WidgetConfig> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => discover_config().filter(|p| p.exists()),
    };

    let Some(config_path) = config_path else {
        tracing::debug!("no config file found, using defaults");
        return Ok(WidgetConfig::default());
    };

    let contents = std::fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read {}", config_path.display()))?;
    let config: WidgetConfig = toml::from_str(&contents)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;

    for msg in config.validate() {
        match msg {
            ConfigMessage::Warning(w) => {
                tracing::warn!("config warning in {}: {}", config_path.display(), w);
            }
            ConfigMessage::Error(e) => {
                anyhow::bail!("config error in {}: {}", config_path.display(), e);
            }
        }
    }

    Ok(config)
}

/// Candidate config path: `$TSWIDGET_CONFIG`, else the platform config dir.
pub fn discover_config() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV)
        .ok()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|d| d.join("tswidget").join("config.toml")))
}
