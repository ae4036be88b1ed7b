// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{middleware, routing::post, Router};

use shared_backend::BackendClient;
use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::{self, AppointmentState};
use crate::services::submission::AppointmentService;

pub fn appointment_routes(config: Arc<AppConfig>) -> Router {
    let backend = Arc::new(BackendClient::new(&config));
    let state = AppointmentState {
        appointments: Arc::new(AppointmentService::with_client(Arc::clone(&backend))),
        config,
    };

    // Staff booking always goes through the backend session check
    let protected_routes = Router::new()
        .route("/", post(handlers::create_appointment))
        .layer(middleware::from_fn_with_state(backend, auth_middleware));

    Router::new()
        .merge(protected_routes)
        .with_state(state)
}
