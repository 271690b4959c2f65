//! `{placeholder}` substitution for display formats.
//!
//! Only bare names are recognized. `{{` and `}}` produce literal braces;
//! any other brace is an error.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::normalize::StatusRecord;
use crate::error::TemplateError;

/// Names accepted inside `{...}`, in display order.
pub const PLACEHOLDERS: [&str; 9] = [
    "backend_state",
    "tailscale_ipv4",
    "tailscale_ipv6",
    "public_ip",
    "local_ip",
    "exit_node_hostname",
    "exit_node_ipv4",
    "exit_node_ipv6",
    "exit_node_public_ip",
];

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{|\}\}|\{([^{}]*)\}|[{}]").expect("valid regex"))
}

/// Value of a placeholder for `status`, or `None` if the name is unknown.
fn lookup<'a>(status: &'a StatusRecord, name: &str) -> Option<&'a str> {
    let value = match name {
        "backend_state" => &status.backend_state,
        "tailscale_ipv4" => &status.tailscale_ipv4,
        "tailscale_ipv6" => &status.tailscale_ipv6,
        "public_ip" => &status.public_ip,
        "local_ip" => &status.local_ip,
        "exit_node_hostname" => &status.exit_node.host_name,
        "exit_node_ipv4" => &status.exit_node.tailscale_ipv4,
        "exit_node_ipv6" => &status.exit_node.tailscale_ipv6,
        "exit_node_public_ip" => &status.exit_node.public_ip,
        _ => return None,
    };
    Some(value)
}

/// Substitute every placeholder in `template` with the matching field of
/// `status`.
pub fn substitute(template: &str, status: &StatusRecord) -> Result<String, TemplateError> {
    expand(template, |name| lookup(status, name))
}

/// Check that `template` would render for any status record.
pub fn validate_template(template: &str) -> Result<(), TemplateError> {
    let empty = StatusRecord::default();
    substitute(template, &empty).map(|_| ())
}

fn expand<'a>(
    template: &str,
    resolve: impl Fn(&str) -> Option<&'a str>,
) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in token_re().captures_iter(template) {
        let token = caps.get(0).expect("group 0 always present");
        out.push_str(&template[last..token.start()]);
        last = token.end();

        match token.as_str() {
            "{{" => out.push('{'),
            "}}" => out.push('}'),
            "{" | "}" => {
                return Err(TemplateError::UnbalancedBrace {
                    brace: token.as_str().chars().next().unwrap_or('{'),
                    position: token.start(),
                    template: template.to_string(),
                })
            }
            _ => out.push_str(placeholder(&caps, template, &resolve)?),
        }
    }

    out.push_str(&template[last..]);
    Ok(out)
}

fn placeholder<'a>(
    caps: &Captures<'_>,
    template: &str,
    resolve: &impl Fn(&str) -> Option<&'a str>,
) -> Result<&'a str, TemplateError> {
    let name = caps.get(1).map_or("", |m| m.as_str());
    resolve(name).ok_or_else(|| TemplateError::UnknownPlaceholder {
        name: name.to_string(),
        template: template.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StatusRecord {
        let mut status = StatusRecord {
            backend_state: "RunningUsingExitNode".into(),
            tailscale_ipv4: "100.64.0.1".into(),
            tailscale_ipv6: "fd7a::1".into(),
            public_ip: "203.0.113.7".into(),
            local_ip: "192.168.1.20".into(),
            ..Default::default()
        };
        status.exit_node.host_name = "exit-box".into();
        status.exit_node.tailscale_ipv4 = "100.64.0.9".into();
        status.exit_node.tailscale_ipv6 = "fd7a::9".into();
        status.exit_node.public_ip = "198.51.100.9".into();
        status
    }

    #[test]
    fn test_substitute_all_placeholders() {
        let template = PLACEHOLDERS
            .iter()
            .map(|p| format!("{{{}}}", p))
            .collect::<Vec<_>>()
            .join("|");
        let text = substitute(&template, &sample()).unwrap();
        assert_eq!(
            text,
            "RunningUsingExitNode|100.64.0.1|fd7a::1|203.0.113.7|192.168.1.20|exit-box|100.64.0.9|fd7a::9|198.51.100.9"
        );
    }

    #[test]
    fn test_substitute_empty_values() {
        let text = substitute("[{exit_node_hostname}]", &StatusRecord::default()).unwrap();
        assert_eq!(text, "[]");
    }

    #[test]
    fn test_plain_text_passthrough() {
        assert_eq!(substitute("ts", &sample()).unwrap(), "ts");
        assert_eq!(substitute("", &sample()).unwrap(), "");
    }

    #[test]
    fn test_escaped_braces() {
        let text = substitute("{{{backend_state}}}", &sample()).unwrap();
        assert_eq!(text, "{RunningUsingExitNode}");
        assert_eq!(substitute("{{literal}}", &sample()).unwrap(), "{literal}");
    }

    #[test]
    fn test_unknown_placeholder() {
        let err = substitute("up: {hostname}", &sample()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnknownPlaceholder {
                name: "hostname".into(),
                template: "up: {hostname}".into(),
            }
        );
    }

    #[test]
    fn test_format_spec_is_not_a_placeholder() {
        assert!(matches!(
            substitute("{backend_state:>10}", &sample()),
            Err(TemplateError::UnknownPlaceholder { .. })
        ));
        assert!(matches!(
            substitute("{}", &sample()),
            Err(TemplateError::UnknownPlaceholder { .. })
        ));
    }

    #[test]
    fn test_unbalanced_braces() {
        assert!(matches!(
            substitute("up {backend_state", &sample()),
            Err(TemplateError::UnbalancedBrace { brace: '{', position: 3, .. })
        ));
        assert!(matches!(
            substitute("up }", &sample()),
            Err(TemplateError::UnbalancedBrace { brace: '}', .. })
        ));
    }

    #[test]
    fn test_validate_template() {
        assert!(validate_template("{tailscale_ipv4} via {exit_node_hostname}").is_ok());
        assert!(validate_template("{nope}").is_err());
    }
}
