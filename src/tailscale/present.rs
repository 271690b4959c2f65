//! Map a [`StatusRecord`] to the label shown in the bar.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::normalize::StatusRecord;
use super::template;
use crate::error::TemplateError;

/// Template used when no rule (or a rule without `format`) applies.
pub const DEFAULT_FORMAT: &str = "{backend_state}";

/// A colour as understood by the status bar, e.g. `"ffffff"` or `"#00ff00"`.
pub type Color = String;

/// Per-state display override. Unset fields fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayRule {
    pub format: Option<String>,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

/// Display rules keyed by backend state (`"Running"`, `"Stopped"`, ...).
pub type DisplayFormats = BTreeMap<String, DisplayRule>;

/// Widget-wide format and colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayDefaults {
    pub format: String,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

impl Default for DisplayDefaults {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_string(),
            foreground: Some("ffffff".to_string()),
            background: None,
        }
    }
}

/// The rendered label handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedText {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
}

/// Pick the display rule for `status.backend_state` and render it.
pub fn render(
    status: &StatusRecord,
    rules: &DisplayFormats,
    defaults: &DisplayDefaults,
) -> Result<RenderedText, TemplateError> {
    let rule = rules.get(&status.backend_state);

    let format = rule
        .and_then(|r| r.format.as_deref())
        .unwrap_or(defaults.format.as_str());
    let foreground = rule
        .and_then(|r| r.foreground.clone())
        .or_else(|| defaults.foreground.clone());
    let background = rule
        .and_then(|r| r.background.clone())
        .or_else(|| defaults.background.clone());

    Ok(RenderedText {
        text: template::substitute(format, status)?,
        foreground,
        background,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> StatusRecord {
        StatusRecord {
            backend_state: "Running".into(),
            tailscale_ipv4: "100.64.0.1".into(),
            ..Default::default()
        }
    }

    fn defaults() -> DisplayDefaults {
        DisplayDefaults {
            format: DEFAULT_FORMAT.into(),
            foreground: Some("ffffff".into()),
            background: Some("000000".into()),
        }
    }

    #[test]
    fn test_render_without_rule_uses_defaults() {
        let out = render(&running(), &DisplayFormats::new(), &defaults()).unwrap();
        assert_eq!(out.text, "Running");
        assert_eq!(out.foreground.as_deref(), Some("ffffff"));
        assert_eq!(out.background.as_deref(), Some("000000"));
    }

    #[test]
    fn test_render_rule_format_only() {
        let mut rules = DisplayFormats::new();
        rules.insert(
            "Running".into(),
            DisplayRule {
                format: Some("up: {tailscale_ipv4}".into()),
                ..Default::default()
            },
        );
        let out = render(&running(), &rules, &defaults()).unwrap();
        assert_eq!(out.text, "up: 100.64.0.1");
        assert_eq!(out.foreground.as_deref(), Some("ffffff"));
        assert_eq!(out.background.as_deref(), Some("000000"));
    }

    #[test]
    fn test_render_rule_colors_only() {
        let mut rules = DisplayFormats::new();
        rules.insert(
            "Running".into(),
            DisplayRule {
                foreground: Some("00ff00".into()),
                background: Some("111111".into()),
                ..Default::default()
            },
        );
        let out = render(&running(), &rules, &defaults()).unwrap();
        assert_eq!(out.text, "Running");
        assert_eq!(out.foreground.as_deref(), Some("00ff00"));
        assert_eq!(out.background.as_deref(), Some("111111"));
    }

    #[test]
    fn test_render_rule_for_other_state_ignored() {
        let mut rules = DisplayFormats::new();
        rules.insert(
            "Stopped".into(),
            DisplayRule {
                format: Some("off".into()),
                foreground: Some("ff0000".into()),
                ..Default::default()
            },
        );
        let out = render(&running(), &rules, &defaults()).unwrap();
        assert_eq!(out.text, "Running");
        assert_eq!(out.foreground.as_deref(), Some("ffffff"));
    }

    #[test]
    fn test_render_empty_state_with_default_format() {
        let out = render(&StatusRecord::default(), &DisplayFormats::new(), &defaults()).unwrap();
        assert_eq!(out.text, "");
    }

    #[test]
    fn test_render_bad_template_is_error() {
        let mut rules = DisplayFormats::new();
        rules.insert(
            "Running".into(),
            DisplayRule {
                format: Some("{ipv4}".into()),
                ..Default::default()
            },
        );
        assert!(render(&running(), &rules, &defaults()).is_err());
    }

    #[test]
    fn test_rendered_text_json_omits_absent_colors() {
        let out = RenderedText {
            text: "Running".into(),
            foreground: Some("ffffff".into()),
            background: None,
        };
        let json = serde_json::to_string(&out).unwrap();
        assert_eq!(json, r#"{"text":"Running","foreground":"ffffff"}"#);
    }
}
