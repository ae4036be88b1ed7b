use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Route the client is sent to after the backend rejects its session.
pub const LOGIN_ROUTE: &str = "/login";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::ExternalService(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        tracing::error!("Error: {}: {}", status, message);

        let body = match &self {
            AppError::Auth(_) => Json(json!({
                "error": message,
                "redirect": LOGIN_ROUTE
            })),
            _ => Json(json!({
                "error": message
            })),
        };

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let status = |err: AppError| err.into_response().status();

        assert_eq!(status(AppError::Auth(String::new())), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AppError::Forbidden(String::new())), StatusCode::FORBIDDEN);
        assert_eq!(status(AppError::NotFound(String::new())), StatusCode::NOT_FOUND);
        assert_eq!(status(AppError::BadRequest(String::new())), StatusCode::BAD_REQUEST);
        assert_eq!(status(AppError::ValidationError(String::new())), StatusCode::BAD_REQUEST);
        assert_eq!(status(AppError::Conflict(String::new())), StatusCode::CONFLICT);
        assert_eq!(status(AppError::ExternalService(String::new())), StatusCode::BAD_GATEWAY);
    }
}
