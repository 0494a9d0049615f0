//! `Portward` Core Library
//!
//! Shared functionality for `Portward` components:
//! - Port-forward records and SSH command generation
//! - Temporary-user records and credential generation
//! - Input validation for command-template fields
//! - Configuration resolution
//! - Common error types

pub mod config;
pub mod credentials;
pub mod error;
pub mod forward;
pub mod temp_user;
pub mod tracing_init;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use forward::{ForwardSpec, PortForward, build_forward_command};
pub use temp_user::TempUser;
