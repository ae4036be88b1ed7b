// libs/portal-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use catalog_cell::EntityId;
use customer_cell::LookupOutcome;
use shared_models::auth::AuthContext;
use shared_models::error::AppError;

use crate::models::{
    CreateSessionRequest, DateRequest, LookupRequest, NavigateRequest, PortalView, ProfessionalRequest,
    QuantityRequest, RegisterRequest, TimeRequest, VerifyRequest,
};
use crate::services::PortalService;

// ==============================================================================
// SESSION HANDLERS
// ==============================================================================

/// Opens a booking session for a company. A bearer token is optional on
/// the public portal and, when present, is forwarded to the backend.
#[axum::debug_handler]
pub async fn create_session(
    State(portal): State<Arc<PortalService>>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<PortalView>), AppError> {
    let auth = match bearer {
        Some(TypedHeader(auth)) => AuthContext::with_token(auth.token()),
        None => AuthContext::anonymous(),
    };

    let view = portal.open_session(request, auth).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[axum::debug_handler]
pub async fn get_session(
    State(portal): State<Arc<PortalService>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<PortalView>, AppError> {
    Ok(Json(portal.view(session_id).await?))
}

#[axum::debug_handler]
pub async fn delete_session(
    State(portal): State<Arc<PortalService>>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    portal.close_session(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==============================================================================
// SELECTION HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn toggle_service(
    State(portal): State<Arc<PortalService>>,
    Path((session_id, service_id)): Path<(Uuid, EntityId)>,
) -> Result<Json<PortalView>, AppError> {
    Ok(Json(portal.toggle_service(session_id, service_id).await?))
}

#[axum::debug_handler]
pub async fn set_service_quantity(
    State(portal): State<Arc<PortalService>>,
    Path((session_id, service_id)): Path<(Uuid, EntityId)>,
    Json(request): Json<QuantityRequest>,
) -> Result<Json<PortalView>, AppError> {
    Ok(Json(
        portal
            .set_service_quantity(session_id, service_id, request.quantity)
            .await?,
    ))
}

#[axum::debug_handler]
pub async fn select_professional(
    State(portal): State<Arc<PortalService>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ProfessionalRequest>,
) -> Result<Json<PortalView>, AppError> {
    Ok(Json(
        portal
            .select_professional(session_id, request.professional_id)
            .await?,
    ))
}

#[axum::debug_handler]
pub async fn select_date(
    State(portal): State<Arc<PortalService>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<DateRequest>,
) -> Result<Json<PortalView>, AppError> {
    Ok(Json(portal.select_date(session_id, request.date).await?))
}

#[axum::debug_handler]
pub async fn select_time(
    State(portal): State<Arc<PortalService>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<TimeRequest>,
) -> Result<Json<PortalView>, AppError> {
    Ok(Json(portal.select_time(session_id, &request.time).await?))
}

#[axum::debug_handler]
pub async fn set_product_quantity(
    State(portal): State<Arc<PortalService>>,
    Path((session_id, product_id)): Path<(Uuid, EntityId)>,
    Json(request): Json<QuantityRequest>,
) -> Result<Json<PortalView>, AppError> {
    Ok(Json(
        portal
            .set_product_quantity(session_id, product_id, request.quantity)
            .await?,
    ))
}

// ==============================================================================
// NAVIGATION HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn navigate(
    State(portal): State<Arc<PortalService>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<Value>, AppError> {
    let (changed, view) = portal.navigate(session_id, request.step).await?;

    Ok(Json(json!({
        "changed": changed,
        "session": view
    })))
}

#[axum::debug_handler]
pub async fn reset(
    State(portal): State<Arc<PortalService>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<PortalView>, AppError> {
    Ok(Json(portal.reset(session_id).await?))
}

// ==============================================================================
// IDENTITY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn lookup_phone(
    State(portal): State<Arc<PortalService>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<LookupRequest>,
) -> Result<Json<Value>, AppError> {
    let (outcome, view) = portal.lookup_phone(session_id, &request.phone).await?;

    let existing = matches!(outcome, LookupOutcome::Existing(_));
    Ok(Json(json!({
        "existingCustomer": existing,
        "session": view
    })))
}

#[axum::debug_handler]
pub async fn verify_code(
    State(portal): State<Arc<PortalService>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<PortalView>, AppError> {
    Ok(Json(portal.verify_code(session_id, &request.code).await?))
}

#[axum::debug_handler]
pub async fn register_customer(
    State(portal): State<Arc<PortalService>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<PortalView>, AppError> {
    Ok(Json(
        portal
            .register_customer(session_id, &request.name, request.email.as_deref())
            .await?,
    ))
}
