use reqwest::StatusCode;
use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Session rejected by backend: {0}")]
    Unauthorized(String),

    #[error("Operation not allowed: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Backend unavailable ({status}): {message}")]
    Unavailable { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BackendError {
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status.as_u16() {
            401 => BackendError::Unauthorized(message),
            403 => BackendError::Forbidden(message),
            404 => BackendError::NotFound(message),
            code if status.is_server_error() => BackendError::Unavailable { status: code, message },
            code => BackendError::Rejected { status: code, message },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BackendError::Unauthorized(_))
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unauthorized(_) => AppError::Auth("Your session has expired, please sign in again".to_string()),
            BackendError::Forbidden(_) => AppError::Forbidden("You are not allowed to perform this action".to_string()),
            BackendError::NotFound(msg) => AppError::NotFound(msg),
            BackendError::Rejected { message, .. } => AppError::BadRequest(message),
            BackendError::Unavailable { .. } | BackendError::Http(_) | BackendError::Json(_) => {
                AppError::ExternalService("Service temporarily unavailable, please try again".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(BackendError::from_status(StatusCode::UNAUTHORIZED, String::new()).is_unauthorized());
        assert!(BackendError::from_status(StatusCode::NOT_FOUND, String::new()).is_not_found());
        assert!(matches!(
            BackendError::from_status(StatusCode::FORBIDDEN, String::new()),
            BackendError::Forbidden(_)
        ));
        assert!(matches!(
            BackendError::from_status(StatusCode::BAD_GATEWAY, String::new()),
            BackendError::Unavailable { status: 502, .. }
        ));
        assert!(matches!(
            BackendError::from_status(StatusCode::UNPROCESSABLE_ENTITY, "bad".to_string()),
            BackendError::Rejected { status: 422, .. }
        ));
    }

    #[test]
    fn test_backend_errors_map_to_generic_messages() {
        let err: AppError = BackendError::Unavailable { status: 500, message: "stack trace".to_string() }.into();
        match err {
            AppError::ExternalService(msg) => assert!(!msg.contains("stack trace")),
            other => panic!("unexpected error: {:?}", other),
        }

        let err: AppError = BackendError::Unauthorized("expired".to_string()).into();
        assert!(matches!(err, AppError::Auth(_)));
    }
}
