use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;

use tk_api::app::{build_token_service, create_app};
use tk_api::routes::AppState;
use tk_api::telemetry::init_tracing;
use tk_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging)?;

    tracing::info!(environment = %config.environment, "Starting TokenKeeper API server");

    let token_service = build_token_service(&config)
        .await
        .context("failed to initialize token service")?;
    let app_state = web::Data::new(AppState::new(Arc::new(token_service)));

    let bind_address = config.server.bind_address();
    let max_payload_size = config.server.max_payload_size;
    tracing::info!(address = %bind_address, "Server will bind");

    let mut server = HttpServer::new(move || create_app(app_state.clone(), max_payload_size))
        .keep_alive(config.server.keep_alive_duration());
    if let Some(workers) = config.server.worker_count() {
        server = server.workers(workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    Ok(())
}
