//! Standalone dashboard server binary.
//!
//! ## Purpose
//! Runs the record-browsing dashboard on its own.
//!
//! ## Intended use
//! Useful for development and debugging when the identity proxy is mocked
//! with a forwarded header. Deployments normally run the workspace's main
//! `chartview-run` binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the chartview dashboard server.
///
/// Reads configuration from the environment (see
/// [`api_rest::bootstrap_from_env`]), binds the listen address, and serves
/// the dashboard until the process is stopped.
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - required configuration is missing or invalid,
/// - the database pool cannot be created, or
/// - the server address cannot be bound.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let (addr, app) = api_rest::bootstrap_from_env().await?;

    tracing::info!("-- Starting chartview dashboard on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
