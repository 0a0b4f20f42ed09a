//! Service entry point: configuration, logging, pool, HTTP server.

mod server;

use std::sync::Arc;

use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::outbound::persistence::{DbPool, DieselFeedbackRepository, PoolConfig};
use server::{AppConfig, RuntimeMode};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::from_env(&DefaultEnv::new());

    let builder = fmt().with_env_filter(EnvFilter::from_default_env());
    let init_result = match config.mode {
        RuntimeMode::Production => builder.json().try_init(),
        RuntimeMode::Development => builder.try_init(),
    };
    if let Err(e) = init_result {
        warn!(error = %e, "tracing init failed");
    }

    let pool = DbPool::new(PoolConfig::new(config.db.url()))
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let repository = Arc::new(DieselFeedbackRepository::new(pool));

    info!(host = %config.host, port = config.port, "starting feedback API server");
    server::create_server(config, repository)?.await
}
