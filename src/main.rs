//! Maker-space scheduler HTTP server.
//!
//! # Environment Variables
//!
//! - `SCHEDULER_CONFIG_DIR`: directory holding `scheduler.yaml` and
//!   `calendar.yaml` (default: config/default)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log filter (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use makerspace_scheduler::api::{AppState, create_router};
use makerspace_scheduler::config::ConfigLoader;
use makerspace_scheduler::engine::Scheduler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let config_dir =
        env::var("SCHEDULER_CONFIG_DIR").unwrap_or_else(|_| "config/default".to_string());
    let loader = ConfigLoader::load(&config_dir)?;
    let scheduler = Scheduler::from_config(loader.config())?;
    info!(config_dir = %config_dir, "Configuration loaded");

    let app = create_router(AppState::new(scheduler));

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
