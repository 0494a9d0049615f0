//! Temporary-user endpoints.
//!
//! Listing runs the expiry sweep first, so a GET here mutates the store
//! when expired records exist. Passwords appear in plaintext in both the
//! create and list responses; that is the documented contract.

use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use portward_core::credentials::{self, DEFAULT_PASSWORD_LENGTH};
use portward_core::{TempUser, validation};

use super::{ApiError, AppState};
use crate::sweep::sweep_temp_users;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTempUserRequest {
    pub expires_hours: Option<i64>,
    pub ssh_host: Option<String>,
    pub ssh_port: Option<u16>,
}

/// `POST /api/create-temp-user` — provision the OS account first; only on
/// success is the record persisted and returned (password included, once
/// here and again on every listing).
pub async fn create_temp_user(
    State(state): State<AppState>,
    body: Option<Json<CreateTempUserRequest>>,
) -> Result<Json<Value>, ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();

    let ssh_host = req.ssh_host.unwrap_or_else(|| state.config.ssh_host.clone());
    validation::validate_host("sshHost", &ssh_host)?;
    let ssh_port = req.ssh_port.unwrap_or(state.config.ssh_port);
    let expires_hours = req.expires_hours.unwrap_or(state.config.expires_hours);

    let username = credentials::generate_username();
    let password = credentials::generate_password(DEFAULT_PASSWORD_LENGTH);

    // Reject an unrepresentable expiry before the OS account exists, so a
    // bad request cannot leak a provisioned account.
    let user = TempUser::new(username, password, expires_hours, ssh_host, ssh_port)
        .ok_or_else(|| ApiError::BadRequest(format!("expiresHours out of range: {expires_hours}")))?;

    state.provisioner.create_account(&user.username, &user.password).await?;

    let store = state.store.lock().await;
    let mut users = store.load_temp_users()?;
    users.push(user.clone());
    store.save_temp_users(&users)?;

    info!(username = %user.username, expires_at = %user.expires_at, "created temp user");
    Ok(Json(json!({ "success": true, "user": user })))
}

/// `GET /api/temp-users` — sweep expired accounts, return the active set.
pub async fn list_temp_users(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let store = state.store.lock().await;
    let users = sweep_temp_users(&store, state.provisioner.as_ref(), Utc::now()).await?;
    Ok(Json(json!({ "success": true, "users": users })))
}

/// `DELETE /api/temp-users/{username}` — deprovision, then remove the
/// record. A provisioning failure leaves the record in place and surfaces
/// the tool's diagnostic.
pub async fn delete_temp_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    validation::validate_user("username", &username)?;

    state.provisioner.delete_account(&username).await?;

    let store = state.store.lock().await;
    let mut users = store.load_temp_users()?;
    users.retain(|u| u.username != username);
    store.save_temp_users(&users)?;

    info!(username = %username, "deleted temp user");
    Ok(Json(json!({ "success": true })))
}
