//! Port-forward records and SSH command generation.
//!
//! The generated command is a display string for the operator to copy and
//! run; portward never executes it itself. Host and user fields must pass
//! [`crate::validation`] before they reach the template.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SSH port that needs no explicit `-p` flag.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Parameters describing one forwarding tunnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardSpec {
    pub local_port: u16,
    pub remote_host: String,
    pub remote_port: u16,
    pub ssh_user: String,
    pub ssh_host: String,
    pub ssh_port: u16,
    pub reverse: bool,
}

/// A saved port-forward configuration.
///
/// `command` is derived from the spec at creation time and never mutated
/// afterwards. Ids come from the store's persisted counter and are never
/// reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortForward {
    pub id: u64,
    pub name: String,
    #[serde(flatten)]
    pub spec: ForwardSpec,
    pub command: String,
    pub created: DateTime<Utc>,
}

impl PortForward {
    /// Build a record from a validated spec, deriving the command string.
    pub fn new(id: u64, name: String, spec: ForwardSpec) -> Self {
        let command = build_forward_command(&spec);
        Self {
            id,
            name,
            spec,
            command,
            created: Utc::now(),
        }
    }
}

/// Render the `ssh` invocation for a forwarding spec.
///
/// Local forwarding binds `local_port` on the client to
/// `remote_host:remote_port` as reachable from the SSH server; reverse
/// (remote) forwarding binds `remote_port` on the server's loopback back to
/// `local_port` on the client. `-N -f` keeps the connection detached with
/// no remote command.
pub fn build_forward_command(spec: &ForwardSpec) -> String {
    let mut cmd = if spec.reverse {
        format!(
            "ssh -R {}:localhost:{} {}@{}",
            spec.remote_port, spec.local_port, spec.ssh_user, spec.ssh_host
        )
    } else {
        format!(
            "ssh -L {}:{}:{} {}@{}",
            spec.local_port, spec.remote_host, spec.remote_port, spec.ssh_user, spec.ssh_host
        )
    };

    if spec.ssh_port != DEFAULT_SSH_PORT {
        cmd.push_str(&format!(" -p {}", spec.ssh_port));
    }

    cmd.push_str(" -N -f");
    cmd
}
