//! Application state and factory
//!
//! Builds the token service from configuration and provides the factory for
//! creating the Actix-web application.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    error::InternalError,
    web, App, HttpResponse,
};
use tracing_actix_web::TracingLogger;

use tk_core::repositories::{AccessTokenRepository, InMemoryAccessTokenRepository};
use tk_core::services::TokenService;
use tk_infra::database::{DatabasePool, MySqlAccessTokenRepository};
use tk_shared::config::AppConfig;
use tk_shared::errors::error_codes;

use crate::dto::{ErrorResponse, ErrorResponseExt};
use crate::routes::{tokens, AppState};

/// Store chosen at startup
pub type DynTokenRepository = Arc<dyn AccessTokenRepository>;

/// Build the token service over MySQL when a database is configured, or the
/// in-memory store otherwise
pub async fn build_token_service(
    config: &AppConfig,
) -> anyhow::Result<TokenService<DynTokenRepository>> {
    let repository: DynTokenRepository = match &config.database {
        Some(database) => {
            let pool = DatabasePool::new(database.clone()).await?;
            tracing::info!("Using MySQL token store");
            Arc::new(MySqlAccessTokenRepository::new(pool.get_pool().clone()))
        }
        None => {
            tracing::warn!("No database configured; tokens are kept in memory only");
            Arc::new(InMemoryAccessTokenRepository::new())
        }
    };

    Ok(TokenService::from_config(repository, &config.jwt)?)
}

/// Create and configure the application with all dependencies
pub fn create_app<R>(
    app_state: web::Data<AppState<R>>,
    max_payload_size: usize,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    R: AccessTokenRepository + 'static,
{
    let json_config = web::JsonConfig::default()
        .limit(max_payload_size)
        .error_handler(|err, _req| {
            let response = ErrorResponse::new(error_codes::BAD_REQUEST, err.to_string())
                .to_response(actix_web::http::StatusCode::BAD_REQUEST);
            InternalError::from_response(err, response).into()
        });

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(web::scope("/api/v1").configure(tokens::configure::<R>))
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "tokenkeeper-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    crate::handlers::not_found("The requested resource was not found")
}
