// libs/portal-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::handlers;
use crate::services::PortalService;

pub fn portal_routes(portal: Arc<PortalService>) -> Router {
    Router::new()
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/{session_id}", get(handlers::get_session).delete(handlers::delete_session))

        // Selections
        .route("/sessions/{session_id}/services/{service_id}/toggle", post(handlers::toggle_service))
        .route("/sessions/{session_id}/services/{service_id}/quantity", put(handlers::set_service_quantity))
        .route("/sessions/{session_id}/professional", put(handlers::select_professional))
        .route("/sessions/{session_id}/date", put(handlers::select_date))
        .route("/sessions/{session_id}/time", put(handlers::select_time))
        .route("/sessions/{session_id}/products/{product_id}", put(handlers::set_product_quantity))

        // Wizard flow
        .route("/sessions/{session_id}/navigate", post(handlers::navigate))
        .route("/sessions/{session_id}/reset", post(handlers::reset))

        // Customer identity
        .route("/sessions/{session_id}/identity/lookup", post(handlers::lookup_phone))
        .route("/sessions/{session_id}/identity/verify", post(handlers::verify_code))
        .route("/sessions/{session_id}/identity/register", post(handlers::register_customer))
        .with_state(portal)
}
