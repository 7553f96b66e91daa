//! Main entry point for the chartview workspace.
//!
//! Boots the record-browsing dashboard: configuration from the
//! environment, one database pool, one HTTP server. The `api-rest` crate
//! owns the routes and pages; this binary is the deployment wrapper.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Starts the dashboard server.
///
/// # Environment Variables
/// - `CHART_REST_ADDR`: server address (default: "0.0.0.0:3000")
/// - `DATABASE_URL`: Postgres connection string (required)
/// - `CHART_ALLOWED_EMAIL_DOMAIN`: accepted sign-in domain (required)
///
/// # Errors
/// Returns an error if configuration is missing or invalid, the database
/// pool cannot be created, or the server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chartview_run=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let (addr, app) = api_rest::bootstrap_from_env().await?;

    tracing::info!("-- Starting chartview on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
