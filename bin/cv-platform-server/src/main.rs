//! Convene Platform Server
//!
//! Serves the REST API:
//! - `/api/v1/auth`: registration and login
//! - `/api/v1/events`: events and their attendee lists
//! - `/api/v1/attendees`: events per attendee
//! - `/health` and Swagger UI at `/swagger-ui`
//!
//! Configuration is described in `cv-config`; the log level follows
//! `RUST_LOG` (default `info`).

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use cv_common::{init_logging, shutdown_signal};
use cv_config::AppConfig;
use cv_platform::api::{api_router, ApiSettings};
use cv_platform::{PlatformServices, Store};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    init_logging(config.logging.format).map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    info!("Starting Convene Platform Server");
    if config.dev_mode {
        warn!("Dev mode enabled; do not run this configuration in production");
    }

    let store = Store::connect(&config.database)
        .await
        .context("failed to connect to the database")?;
    store.init_schema().await.context("failed to initialize schema")?;

    let services = PlatformServices::from_config(store, &config).context("failed to build platform services")?;

    let app = api_router(
        &services,
        ApiSettings {
            case_insensitive_email: config.auth.case_insensitive_email,
        },
    )
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("API server listening on http://{}", addr);
    info!("Swagger UI at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    services.store.pool().close().await;
    info!("Convene Platform Server shutdown complete");
    Ok(())
}
