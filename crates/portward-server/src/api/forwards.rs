//! Port-forward config endpoints.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use portward_core::forward::DEFAULT_SSH_PORT;
use portward_core::{ForwardSpec, PortForward, validation};

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCommandRequest {
    pub local_port: u16,
    pub remote_port: u16,
    pub ssh_user: String,
    pub ssh_host: String,
    #[serde(default = "default_remote_host")]
    pub remote_host: String,
    #[serde(default = "default_ssh_port")]
    pub ssh_port: u16,
    #[serde(default)]
    pub reverse: bool,
    #[serde(default)]
    pub name: Option<String>,
}

fn default_remote_host() -> String {
    "localhost".to_string()
}

const fn default_ssh_port() -> u16 {
    DEFAULT_SSH_PORT
}

/// `POST /api/generate-command` — build the command, persist the config,
/// return both.
pub async fn generate_command(
    State(state): State<AppState>,
    Json(req): Json<GenerateCommandRequest>,
) -> Result<Json<Value>, ApiError> {
    validation::validate_user("sshUser", &req.ssh_user)?;
    validation::validate_host("sshHost", &req.ssh_host)?;
    validation::validate_host("remoteHost", &req.remote_host)?;
    if let Some(name) = &req.name {
        validation::validate_name("name", name)?;
    }

    let spec = ForwardSpec {
        local_port: req.local_port,
        remote_host: req.remote_host,
        remote_port: req.remote_port,
        ssh_user: req.ssh_user,
        ssh_host: req.ssh_host,
        ssh_port: req.ssh_port,
        reverse: req.reverse,
    };

    let store = state.store.lock().await;
    let mut configs = store.load_forwards()?;
    let id = store.next_forward_id()?;
    let name = req.name.unwrap_or_else(|| format!("Port Forward {id}"));
    let record = PortForward::new(id, name, spec);
    configs.push(record.clone());
    store.save_forwards(&configs)?;

    info!(id, command = %record.command, "generated forward command");
    Ok(Json(json!({
        "success": true,
        "command": record.command,
        "config": record,
    })))
}

/// `GET /api/configs` — the full saved collection.
pub async fn list_configs(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let store = state.store.lock().await;
    let configs = store.load_forwards()?;
    Ok(Json(json!({ "success": true, "configs": configs })))
}

/// `DELETE /api/configs/{id}` — idempotent: an absent id is still a
/// success.
pub async fn delete_config(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store.lock().await;
    let mut configs = store.load_forwards()?;
    configs.retain(|c| c.id != id);
    store.save_forwards(&configs)?;
    Ok(Json(json!({ "success": true })))
}
