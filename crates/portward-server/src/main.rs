//! Portward Server
//!
//! Serves the port-forward command generator and temp-user provisioning
//! API over HTTP, backed by flat JSON files in the data directory.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use portward_core::config::{default_data_dir, load_config};
use portward_core::tracing_init::init_tracing;
use portward_server::api::build_router;
use portward_server::provision::{AccountProvisioner, SystemProvisioner};
use portward_server::storage::FileStore;

#[derive(Parser, Debug)]
#[command(name = "portward-server")]
#[command(version, about = "Portward - SSH forward commands and temp-user sharing")]
struct Args {
    /// TCP bind address
    #[arg(long, default_value = "127.0.0.1:8700", env = "PORTWARD_ADDR")]
    addr: SocketAddr,

    /// Directory for the persisted record files
    #[arg(long, env = "PORTWARD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Host advertised to temp-user recipients for their SSH login
    #[arg(long, env = "PORTWARD_SSH_HOST")]
    ssh_host: Option<String>,

    /// Port advertised alongside the SSH host
    #[arg(long, env = "PORTWARD_SSH_PORT")]
    ssh_port: Option<u16>,

    /// Default temp-user lifetime in hours
    #[arg(long, env = "PORTWARD_EXPIRES_HOURS")]
    expires_hours: Option<i64>,

    /// Output logs as JSON (for structured log aggregation)
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = load_config()?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = Some(data_dir);
    }
    if let Some(ssh_host) = args.ssh_host {
        config.ssh_host = ssh_host;
    }
    if let Some(ssh_port) = args.ssh_port {
        config.ssh_port = ssh_port;
    }
    if let Some(expires_hours) = args.expires_hours {
        config.expires_hours = expires_hours;
    }

    init_tracing(&format!("portward_server={}", config.log_level), args.log_json);

    let data_dir = config
        .data_dir
        .clone()
        .or_else(default_data_dir)
        .context("cannot determine a data directory; pass --data-dir")?;
    let store = FileStore::new(&data_dir)?;
    info!(data_dir = %data_dir.display(), "opened record store");

    let provisioner: Arc<dyn AccountProvisioner> = Arc::new(SystemProvisioner);
    let app = build_router(store, provisioner, config);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("failed to bind {}", args.addr))?;
    info!(addr = %args.addr, "portward server listening");
    info!("temp-user provisioning requires privileges to run useradd/userdel/chpasswd");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("portward server shut down");
    Ok(())
}

async fn shutdown_signal() {
    // Serve until interrupted.
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
