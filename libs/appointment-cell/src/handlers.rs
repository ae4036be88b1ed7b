// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

use shared_config::AppConfig;
use shared_models::auth::{permissions, AuthContext};
use shared_models::error::AppError;

use crate::models::AdminBookingInput;
use crate::services::submission::AppointmentService;

/// Built once per router; handlers share its backend connection pool.
#[derive(Clone)]
pub struct AppointmentState {
    pub config: Arc<AppConfig>,
    pub appointments: Arc<AppointmentService>,
}

/// Staff booking. Requires `appointments.create`; admins always pass.
#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<AppointmentState>,
    Extension(auth): Extension<AuthContext>,
    Json(input): Json<AdminBookingInput>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if !auth.has_permission(permissions::APPOINTMENTS_CREATE) {
        warn!(
            "User {:?} tried to create an appointment without permission",
            auth.user().map(|u| u.id)
        );
        return Err(AppError::Forbidden(
            "You do not have permission to create appointments".to_string(),
        ));
    }

    let appointment = state
        .appointments
        .book_for_admin(input, state.config.utc_offset_minutes, auth.token())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "appointment": appointment,
            "message": "Appointment created successfully"
        })),
    ))
}
