//! OS account provisioning through the system user-management tools.
//!
//! Accounts are created login-disabled (`-s /bin/false`) and homeless
//! (`-M`). The provisioner assumes the calling context already holds the
//! privilege needed to run `useradd`/`chpasswd`/`userdel`; it performs no
//! privilege escalation of its own. Calls run to completion with no
//! timeout and no retry.

use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Provisioning failures carry the external tool's diagnostic text.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} failed: {diagnostic}")]
    Tool {
        tool: &'static str,
        diagnostic: String,
    },
}

/// Seam over the external account tools so the sweeper and API handlers
/// can be exercised without touching real OS state.
#[async_trait]
pub trait AccountProvisioner: Send + Sync {
    /// Create a login-disabled, homeless account and set its password.
    async fn create_account(&self, username: &str, password: &str) -> Result<(), ProvisionError>;

    /// Delete the account.
    async fn delete_account(&self, username: &str) -> Result<(), ProvisionError>;
}

/// Provisioner backed by the real `useradd`/`chpasswd`/`userdel` binaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProvisioner;

#[async_trait]
impl AccountProvisioner for SystemProvisioner {
    async fn create_account(&self, username: &str, password: &str) -> Result<(), ProvisionError> {
        debug!(username, "creating temporary account");
        run_checked(
            "useradd",
            Command::new("useradd").args(["-s", "/bin/false", "-M", username]),
        )
        .await?;

        // chpasswd reads "user:password" lines on stdin.
        let mut child = Command::new("chpasswd")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ProvisionError::Spawn { tool: "chpasswd", source })?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(format!("{username}:{password}\n").as_bytes())
                .await
                .map_err(|source| ProvisionError::Spawn { tool: "chpasswd", source })?;
        }
        let output = child
            .wait_with_output()
            .await
            .map_err(|source| ProvisionError::Spawn { tool: "chpasswd", source })?;
        if output.status.success() {
            Ok(())
        } else {
            Err(tool_failure("chpasswd", &output.stderr))
        }
    }

    async fn delete_account(&self, username: &str) -> Result<(), ProvisionError> {
        debug!(username, "deleting temporary account");
        run_checked("userdel", Command::new("userdel").arg(username)).await
    }
}

async fn run_checked(tool: &'static str, cmd: &mut Command) -> Result<(), ProvisionError> {
    let output = cmd
        .output()
        .await
        .map_err(|source| ProvisionError::Spawn { tool, source })?;
    if output.status.success() {
        Ok(())
    } else {
        Err(tool_failure(tool, &output.stderr))
    }
}

fn tool_failure(tool: &'static str, stderr: &[u8]) -> ProvisionError {
    ProvisionError::Tool {
        tool,
        diagnostic: String::from_utf8_lossy(stderr).trim().to_string(),
    }
}
