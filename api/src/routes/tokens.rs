//! Token lifecycle endpoints
//!
//! Every handler is a thin adapter over one `TokenService` operation.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use tk_core::repositories::AccessTokenRepository;
use tk_core::services::TokenService;

use crate::dto::{AccessTokenResponse, CreateTokenRequest, TokenListResponse};
use crate::handlers::{handle_domain_error, handle_validation_errors, not_found};

/// Application state that holds shared services
pub struct AppState<R>
where
    R: AccessTokenRepository,
{
    pub token_service: Arc<TokenService<R>>,
}

impl<R: AccessTokenRepository> AppState<R> {
    pub fn new(token_service: Arc<TokenService<R>>) -> Self {
        Self { token_service }
    }
}

/// Handler for POST /api/v1/users/{user_id}/tokens
///
/// # Request Body
///
/// ```json
/// {
///     "name": "laptop",
///     "access_token": null,
///     "refresh_token": null
/// }
/// ```
///
/// ## Success (201 Created)
/// The stored record, including both token strings.
///
/// ## Errors
/// - 400 Bad Request: invalid body or a rejected pre-signed token
/// - 409 Conflict: the user already has a token with that name
/// - 503 Service Unavailable: store unreachable
pub async fn create_token<R>(
    state: web::Data<AppState<R>>,
    path: web::Path<String>,
    request: web::Json<CreateTokenRequest>,
) -> HttpResponse
where
    R: AccessTokenRepository + 'static,
{
    let user_id = path.into_inner();
    let request = request.into_inner();

    if let Err(errors) = request.validate() {
        tracing::warn!(user_id = %user_id, "Create token request failed validation");
        return handle_validation_errors(&errors);
    }

    match state
        .token_service
        .create_access_token(
            user_id,
            &request.name,
            request.access_token,
            request.refresh_token,
        )
        .await
    {
        Ok(record) => HttpResponse::Created().json(AccessTokenResponse::from(record)),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for GET /api/v1/users/{user_id}/tokens
pub async fn list_tokens<R>(
    state: web::Data<AppState<R>>,
    path: web::Path<String>,
) -> HttpResponse
where
    R: AccessTokenRepository + 'static,
{
    match state.token_service.get_by_user(path.into_inner()).await {
        Ok(records) => HttpResponse::Ok().json(TokenListResponse::from(records)),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for GET /api/v1/users/{user_id}/tokens/by-name/{name}
pub async fn get_token_by_name<R>(
    state: web::Data<AppState<R>>,
    path: web::Path<(String, String)>,
) -> HttpResponse
where
    R: AccessTokenRepository + 'static,
{
    let (user_id, name) = path.into_inner();

    match state.token_service.get_by_name(user_id, &name).await {
        Ok(Some(record)) => HttpResponse::Ok().json(AccessTokenResponse::from(record)),
        Ok(None) => not_found(format!("No token named '{}'", name)),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for GET /api/v1/users/{user_id}/tokens/by-jti/{jti}
pub async fn get_token_by_jti<R>(
    state: web::Data<AppState<R>>,
    path: web::Path<(String, String)>,
) -> HttpResponse
where
    R: AccessTokenRepository + 'static,
{
    let (user_id, jti) = path.into_inner();

    match state.token_service.get_by_jti(user_id, &jti).await {
        Ok(Some(record)) => HttpResponse::Ok().json(AccessTokenResponse::from(record)),
        Ok(None) => not_found("No token with that identifier"),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for GET /api/v1/tokens/{token_id}
pub async fn get_token<R>(state: web::Data<AppState<R>>, path: web::Path<Uuid>) -> HttpResponse
where
    R: AccessTokenRepository + 'static,
{
    match state.token_service.get(path.into_inner()).await {
        Ok(Some(record)) => HttpResponse::Ok().json(AccessTokenResponse::from(record)),
        Ok(None) => not_found("Token not found"),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for POST /api/v1/users/{user_id}/tokens/{token_id}/revoke
///
/// Always 204 unless the store fails; unknown or foreign ids are ignored.
pub async fn revoke_token<R>(
    state: web::Data<AppState<R>>,
    path: web::Path<(String, Uuid)>,
) -> HttpResponse
where
    R: AccessTokenRepository + 'static,
{
    let (user_id, token_id) = path.into_inner();

    match state
        .token_service
        .revoke_access_token(user_id, token_id)
        .await
    {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for DELETE /api/v1/users/{user_id}/tokens/{token_id}
pub async fn delete_token<R>(
    state: web::Data<AppState<R>>,
    path: web::Path<(String, Uuid)>,
) -> HttpResponse
where
    R: AccessTokenRepository + 'static,
{
    let (user_id, token_id) = path.into_inner();

    match state
        .token_service
        .delete_access_token(user_id, token_id)
        .await
    {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => handle_domain_error(&error),
    }
}

/// Register the token routes on an `/api/v1` scope
pub fn configure<R>(cfg: &mut web::ServiceConfig)
where
    R: AccessTokenRepository + 'static,
{
    cfg.service(
        web::scope("/users/{user_id}/tokens")
            .route("", web::post().to(create_token::<R>))
            .route("", web::get().to(list_tokens::<R>))
            .route("/by-name/{name}", web::get().to(get_token_by_name::<R>))
            .route("/by-jti/{jti}", web::get().to(get_token_by_jti::<R>))
            .route("/{token_id}/revoke", web::post().to(revoke_token::<R>))
            .route("/{token_id}", web::delete().to(delete_token::<R>)),
    )
    .route("/tokens/{token_id}", web::get().to(get_token::<R>));
}
