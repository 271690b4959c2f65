//! Tailscale status polling: fetch, normalize, render.

pub mod fetch;
pub mod normalize;
pub mod present;
pub mod template;

#[allow(unused_imports)]
pub use fetch::{StatusFetcher, STATUS_ARGS};
#[allow(unused_imports)]
pub use normalize::{normalize, ExitNodeInfo, RawStatusPayload, StatusRecord, RUNNING_USING_EXIT_NODE};
#[allow(unused_imports)]
pub use present::{render, Color, DisplayDefaults, DisplayFormats, DisplayRule, RenderedText, DEFAULT_FORMAT};

use crate::error::{FetchError, TemplateError};

/// Run one poll cycle.
///
/// Returns `Ok(None)` when the status could not be fetched or decoded; the
/// caller keeps whatever it displayed last. Template errors are returned
/// since they need fixing in the configuration.
pub async fn poll(
    fetcher: &StatusFetcher,
    rules: &DisplayFormats,
    defaults: &DisplayDefaults,
) -> Result<Option<RenderedText>, TemplateError> {
    let raw = match fetcher.fetch().await {
        Ok(raw) => raw,
        Err(FetchError::Decode(e)) => {
            tracing::warn!("{}: could not decode tailscale status: {}", fetcher.binary(), e);
            return Ok(None);
        }
        Err(e) => {
            // Already logged by the fetcher.
            tracing::debug!("poll skipped: {}", e);
            return Ok(None);
        }
    };

    let status = normalize(&raw);
    tracing::debug!(?status, "normalized tailscale status");

    render(&status, rules, defaults).map(Some)
}
