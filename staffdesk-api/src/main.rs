//! # StaffDesk API Server
//!
//! Role-gated internal web service for viewing and maintaining the company
//! personnel/project database: overview pages backed by join/aggregation
//! queries, admin-only mutations for employees and project assignments, and
//! bulk import/export via spreadsheet and CSV.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/company \
//! SECRET_KEY=$(openssl rand -hex 32) \
//! cargo run -p staffdesk-api
//! ```

use staffdesk_api::{
    app::{build_router, AppState},
    config::Config,
};
use staffdesk_shared::db::pool::{create_pool, DatabaseConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "staffdesk_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "StaffDesk API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Missing DATABASE_URL or SECRET_KEY is fatal here, before any traffic.
    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, exiting...");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install CTRL+C handler");
}
