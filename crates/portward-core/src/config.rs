//! Configuration resolution for Portward.
//!
//! Resolution order, lowest to highest:
//! 1. Built-in defaults
//! 2. Global config (`~/.config/portward/settings.json`)
//! 3. Environment variables (`PORTWARD_*`)
//! 4. CLI arguments (applied by the server binary)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Complete Portward configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Directory holding the persisted record files.
    pub data_dir: Option<PathBuf>,
    /// Host advertised to temp-user recipients for their SSH login.
    pub ssh_host: String,
    /// Port advertised alongside `ssh_host`.
    pub ssh_port: u16,
    /// Default lifetime of a temporary account, in hours.
    pub expires_hours: i64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            ssh_host: "your-vps-host".to_string(),
            ssh_port: 22,
            expires_hours: 24,
            log_level: "info".to_string(),
        }
    }
}

/// Load configuration with hierarchical resolution.
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_config_path() {
        if global_path.exists() {
            config = load_config_file(&global_path)?;
        }
    }

    apply_env_overrides(&mut config)?;

    Ok(config)
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("portward").join("settings.json"))
}

/// Default data directory when none is configured.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("portward"))
}

fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

fn apply_env_overrides(config: &mut Config) -> Result<()> {
    apply_env_from(config, |key| std::env::var(key).ok())
}

/// Apply `PORTWARD_*` overrides through an injected lookup. An override
/// that is set but unparsable is a configuration error, not a silent
/// fallback to the default.
fn apply_env_from(config: &mut Config, get: impl Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(val) = get("PORTWARD_DATA_DIR") {
        config.data_dir = Some(PathBuf::from(val));
    }
    if let Some(val) = get("PORTWARD_SSH_HOST") {
        config.ssh_host = val;
    }
    if let Some(val) = get("PORTWARD_SSH_PORT") {
        config.ssh_port = val
            .parse()
            .map_err(|_| Error::Config(format!("invalid PORTWARD_SSH_PORT value {val:?}")))?;
    }
    if let Some(val) = get("PORTWARD_EXPIRES_HOURS") {
        config.expires_hours = val
            .parse()
            .map_err(|_| Error::Config(format!("invalid PORTWARD_EXPIRES_HOURS value {val:?}")))?;
    }
    if let Some(val) = get("PORTWARD_LOG_LEVEL") {
        config.log_level = val;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_24_hour_expiry() {
        let config = Config::default();
        assert_eq!(config.expires_hours, 24);
        assert_eq!(config.ssh_port, 22);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn partial_settings_file_keeps_defaults() {
        let config: Config = serde_json::from_str(r#"{"sshHost": "bastion.example.net"}"#).unwrap();
        // serde(default) fills the rest
        assert_eq!(config.ssh_host, "bastion.example.net");
        assert_eq!(config.expires_hours, 24);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn env_overrides_apply() {
        let mut config = Config::default();
        apply_env_from(&mut config, |key| match key {
            "PORTWARD_SSH_HOST" => Some("bastion.example.net".to_string()),
            "PORTWARD_EXPIRES_HOURS" => Some("48".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.ssh_host, "bastion.example.net");
        assert_eq!(config.expires_hours, 48);
    }

    #[test]
    fn unparsable_env_override_is_an_error() {
        let mut config = Config::default();
        let result = apply_env_from(&mut config, |key| {
            (key == "PORTWARD_SSH_PORT").then(|| "not-a-port".to_string())
        });
        assert!(matches!(result, Err(Error::Config(_))));
        // The typo'd override must not fall back to the default silently.
        assert_eq!(config.ssh_port, 22);
    }
}
