//! Portward Server Library
//!
//! Core functionality for the portward server:
//! - Flat-file JSON storage for forward configs and temp users
//! - OS account provisioning through the system user-management tools
//! - Lazy expiry sweeping of temporary accounts
//! - axum HTTP API for clients

pub mod api;
pub mod provision;
pub mod storage;
pub mod sweep;
