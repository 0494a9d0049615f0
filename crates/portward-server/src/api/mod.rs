//! HTTP API surface.
//!
//! All store access goes through one async mutex in [`AppState`], so
//! read-modify-write cycles on the record files serialize instead of
//! racing.

pub mod forwards;
pub mod health;
pub mod temp_users;

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::Json;
use serde_json::json;
use tokio::sync::Mutex;

use portward_core::Config;
use portward_core::validation::ValidationError;

use crate::provision::{AccountProvisioner, ProvisionError};
use crate::storage::{FileStore, StorageError};

/// Shared state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<FileStore>>,
    pub provisioner: Arc<dyn AccountProvisioner>,
    pub config: Arc<Config>,
}

/// Build the complete axum router.
pub fn build_router(
    store: FileStore,
    provisioner: Arc<dyn AccountProvisioner>,
    config: Config,
) -> Router {
    let state = AppState {
        store: Arc::new(Mutex::new(store)),
        provisioner,
        config: Arc::new(config),
    };

    Router::new()
        .route("/health", get(health::get_health))
        .route("/api/generate-command", post(forwards::generate_command))
        .route("/api/configs", get(forwards::list_configs))
        .route("/api/configs/{id}", delete(forwards::delete_config))
        .route("/api/create-temp-user", post(temp_users::create_temp_user))
        .route("/api/temp-users", get(temp_users::list_temp_users))
        .route("/api/temp-users/{username}", delete(temp_users::delete_temp_user))
        .with_state(state)
}

/// Handler-level failures, rendered as the `{success: false, error}`
/// envelope.
#[derive(Debug)]
pub enum ApiError {
    /// Caller error: bad field, rejected charset, failed external tool.
    BadRequest(String),
    /// Store corruption or I/O failure; unrecoverable within the request.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::BadRequest(error) => (StatusCode::BAD_REQUEST, error),
            Self::Internal(error) => (StatusCode::INTERNAL_SERVER_ERROR, error),
        };
        (status, Json(json!({ "success": false, "error": error }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<ProvisionError> for ApiError {
    fn from(err: ProvisionError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::Internal(err.to_string())
    }
}
