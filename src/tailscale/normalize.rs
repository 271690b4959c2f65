//! Reduce the daemon's `tailscale status --json` payload to a fixed-shape
//! [`StatusRecord`].
//!
//! The payload is untrusted: every field is looked up with a typed accessor
//! that falls back to an empty string, so normalization never fails.

use serde::Serialize;
use serde_json::Value;

/// Raw decoded output of `tailscale status --json`.
pub type RawStatusPayload = Value;

/// Synthetic state reported while traffic is routed through an exit node.
pub const RUNNING_USING_EXIT_NODE: &str = "RunningUsingExitNode";

/// The exit node currently in use. All fields empty when none is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExitNodeInfo {
    pub host_name: String,
    pub tailscale_ipv4: String,
    pub tailscale_ipv6: String,
    pub public_ip: String,
}

/// Normalized snapshot of one poll. Every field is always populated,
/// possibly with the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusRecord {
    pub backend_state: String,
    pub tailscale_ipv4: String,
    pub tailscale_ipv6: String,
    pub public_ip: String,
    pub local_ip: String,
    pub exit_node: ExitNodeInfo,
}

/// Build a [`StatusRecord`] from a raw payload.
///
/// Steps run in order and each one is skipped when its input is missing
/// or has an unexpected shape.
pub fn normalize(raw: &RawStatusPayload) -> StatusRecord {
    let mut status = StatusRecord {
        backend_state: try_str(raw.get("BackendState")).to_string(),
        ..Default::default()
    };

    let self_node = raw.get("Self");

    if let Some([v4, v6]) = try_pair(self_node.and_then(|s| s.get("TailscaleIPs"))) {
        status.tailscale_ipv4 = v4.to_string();
        status.tailscale_ipv6 = v6.to_string();
    }

    if let Some([public, local]) = try_pair(self_node.and_then(|s| s.get("Addrs"))) {
        status.public_ip = host_of(public).to_string();
        status.local_ip = host_of(local).to_string();
    }

    if let Some((exit_node, matches)) = resolve_exit_node(raw) {
        status.exit_node = exit_node;
        if matches == 1 && status.backend_state == "Running" {
            status.backend_state = RUNNING_USING_EXIT_NODE.to_string();
        }
    }

    status
}

/// Find the peer named by `ExitNodeStatus.ID` in the `Peer` map.
///
/// Returns the last matching peer along with how many peers carry that ID.
fn resolve_exit_node(raw: &RawStatusPayload) -> Option<(ExitNodeInfo, usize)> {
    let exit_id = raw
        .get("ExitNodeStatus")
        .and_then(|e| e.get("ID"))
        .and_then(Value::as_str)?;
    let peers = raw.get("Peer").and_then(Value::as_object)?;

    let matching: Vec<&Value> = peers
        .values()
        .filter(|peer| peer.get("ID").and_then(Value::as_str) == Some(exit_id))
        .collect();
    let peer = *matching.last()?;
    if matching.len() > 1 {
        tracing::debug!("exit node id {} matches {} peers", exit_id, matching.len());
    }

    let ips = peer.get("TailscaleIPs").and_then(Value::as_array);
    let ip_at = |i: usize| try_str(ips.and_then(|a| a.get(i))).to_string();

    let exit_node = ExitNodeInfo {
        host_name: try_str(peer.get("HostName")).to_string(),
        tailscale_ipv4: ip_at(0),
        tailscale_ipv6: ip_at(1),
        public_ip: host_of(try_str(peer.get("CurAddr"))).to_string(),
    };
    Some((exit_node, matching.len()))
}

/// The string at `value`, or `""` when absent or not a string.
fn try_str(value: Option<&Value>) -> &str {
    value.and_then(Value::as_str).unwrap_or("")
}

/// An array of exactly two strings.
fn try_pair(value: Option<&Value>) -> Option<[&str; 2]> {
    match value?.as_array()?.as_slice() {
        [a, b] => Some([a.as_str()?, b.as_str()?]),
        _ => None,
    }
}

/// Host portion of a `host:port` transport address.
///
/// `[v6]:port` yields the bracketed address; anything else is cut at the
/// first `':'`.
fn host_of(addr: &str) -> &str {
    if let Some(rest) = addr.strip_prefix('[') {
        if let Some((host, _)) = rest.split_once(']') {
            return host;
        }
    }
    addr.split(':').next().unwrap_or("")
}
