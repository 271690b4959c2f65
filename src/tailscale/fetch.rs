use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use super::normalize::RawStatusPayload;
use crate::error::FetchError;

/// Arguments passed to the status binary: self node only, JSON output.
pub const STATUS_ARGS: [&str; 4] = ["status", "--active=true", "--json=true", "--self=true"];

/// Runs `tailscale status` once per call and decodes its JSON output.
#[derive(Debug, Clone)]
pub struct StatusFetcher {
    binary: String,
    timeout: Duration,
    component: String,
}

impl StatusFetcher {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
            component: "Tailscale".to_string(),
        }
    }

    /// Name reported in warnings, identifying who asked for the status.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = component.into();
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Invoke the status command and decode stdout.
    ///
    /// NotFound, CommandFailed and Timeout each emit one warning before being
    /// returned. Decode errors are returned without logging.
    pub async fn fetch(&self) -> Result<RawStatusPayload, FetchError> {
        let binary = self.resolve_binary()?;

        let mut cmd = Command::new(&binary);
        cmd.args(STATUS_ARGS)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| {
            tracing::debug!("spawn {} failed: {}", binary.display(), e);
            self.not_found()
        })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(self.command_failed(None, e.to_string())),
            Err(_) => {
                // The child is killed when its handle drops here.
                tracing::warn!(
                    component = %self.component,
                    timeout_secs = self.timeout.as_secs_f64(),
                    "{}: Failed to connect to local tailscaled (timed out).",
                    self.component
                );
                return Err(FetchError::Timeout {
                    component: self.component.clone(),
                    timeout: self.timeout,
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(self.command_failed(output.status.code(), stderr));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }

    fn resolve_binary(&self) -> Result<PathBuf, FetchError> {
        which::which(&self.binary).map_err(|e| {
            tracing::debug!("which {}: {}", self.binary, e);
            self.not_found()
        })
    }

    fn not_found(&self) -> FetchError {
        tracing::warn!(
            component = %self.component,
            binary = %self.binary,
            "{}: Tailscale command not found.",
            self.component
        );
        FetchError::NotFound {
            component: self.component.clone(),
            binary: self.binary.clone(),
        }
    }

    fn command_failed(&self, code: Option<i32>, stderr: String) -> FetchError {
        tracing::warn!(
            component = %self.component,
            exit_code = ?code,
            stderr = %stderr,
            "{}: Failed to connect to local tailscaled.",
            self.component
        );
        FetchError::CommandFailed {
            component: self.component.clone(),
            code,
            stderr,
        }
    }
}
