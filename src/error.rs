use thiserror::Error;

/// Failure of a single status fetch. Each variant ends the current poll
/// cycle without output; the next cycle is an independent attempt.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{component}: tailscale command not found ({binary})")]
    NotFound { component: String, binary: String },

    #[error("{component}: failed to connect to local tailscaled (exit code {code:?}): {stderr}")]
    CommandFailed {
        component: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{component}: tailscale status timed out after {timeout:?}")]
    Timeout {
        component: String,
        timeout: std::time::Duration,
    },

    #[error("tailscale status returned invalid json: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A user-supplied display template that cannot be rendered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown placeholder '{{{name}}}' in format \"{template}\"")]
    UnknownPlaceholder { name: String, template: String },

    #[error("unbalanced '{brace}' at byte {position} in format \"{template}\"")]
    UnbalancedBrace {
        brace: char,
        position: usize,
        template: String,
    },
}
