use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
    body::Body,
};
use tracing::debug;

use shared_backend::BackendClient;
use shared_models::auth::AuthContext;
use shared_models::error::AppError;

/// Pulls the bearer token out of the `Authorization` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    let Some(auth_header) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    match auth_value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        _ => Err(AppError::Auth("Invalid authorization header format".to_string())),
    }
}

// Resolves the caller against the backend and stores the AuthContext in the
// request extensions
pub async fn auth_middleware(
    State(backend): State<Arc<BackendClient>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let user = backend
        .current_user(&token)
        .await
        .map_err(AppError::from)?;

    debug!("Authenticated user {} ({:?})", user.id, user.role);

    request.extensions_mut().insert(AuthContext::authenticated(token, user));

    Ok(next.run(request).await)
}
