//! HTTP server for the attendance engine.
//!
//! Reads `ATTENDANCE_CONFIG_DIR` (default `./config/sotsuken`) and
//! `ATTENDANCE_BIND` (default `127.0.0.1:3000`). Log filtering follows
//! `RUST_LOG`, falling back to `info`.

use std::env;

use attendance_engine::api::{AppState, create_router};
use attendance_engine::config::ConfigLoader;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_DIR: &str = "./config/sotsuken";
const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new("info")?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();

    let config_dir =
        env::var("ATTENDANCE_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let bind = env::var("ATTENDANCE_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());

    let config = ConfigLoader::load(&config_dir)?;
    info!(
        config_dir = %config_dir,
        program = %config.program().code,
        required_points = %config.policy().required_points(),
        "Loaded program configuration"
    );

    let router = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(address = %bind, "Attendance engine listening");

    axum::serve(listener, router).await?;
    Ok(())
}
