use anyhow::{Context, Result};
use camera_core::{CameraBackend, CameraController, CameraRegistry};
use camera_daemon::config::DaemonConfig;
use camera_daemon::web;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "camera-daemon")]
#[command(about = "Serves local and network cameras over HTTP")]
struct Args {
    /// Path to the camera configuration file
    #[arg(long, default_value = "cameras.yaml")]
    config: String,

    /// Bind address, overriding the config file
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let args = Args::parse();
    let config = DaemonConfig::load(&args.config)?;
    let bind: SocketAddr = args
        .bind
        .as_ref()
        .unwrap_or(&config.bind)
        .parse()
        .context("invalid bind address")?;

    let backend = default_backend();
    let mut registry = CameraRegistry::new();
    for camera in &config.cameras {
        info!(name = %camera.name, source = %camera.source, "registering camera");
        registry.register(CameraController::new(
            camera.name.clone(),
            camera.source.clone(),
            Arc::clone(&backend),
        ));
    }

    // All cameras come up before the server starts taking requests.
    registry.start_all();

    web::serve(Arc::new(registry), bind).await
}

#[cfg(feature = "opencv")]
fn default_backend() -> Arc<dyn CameraBackend> {
    Arc::new(camera_core::OpenCvBackend)
}

#[cfg(not(feature = "opencv"))]
fn default_backend() -> Arc<dyn CameraBackend> {
    Arc::new(camera_core::MockBackend)
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
