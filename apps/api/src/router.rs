use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use catalog_cell::router::catalog_routes;
use portal_cell::{portal_routes, PortalService};
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>, portal: Arc<PortalService>) -> Router {
    Router::new()
        .route("/", get(|| async { "Barbershop booking portal is running!" }))
        .nest("/portal", portal_routes(portal))
        .nest("/catalog", catalog_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app() -> Router {
        let config = Arc::new(AppConfig::default());
        let portal = Arc::new(PortalService::new(Arc::clone(&config)));
        create_router(config, portal)
    }

    #[tokio::test]
    async fn test_liveness() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Barbershop booking portal is running!");
    }

    #[tokio::test]
    async fn test_staff_booking_requires_token() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/appointments")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_portal_session() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/portal/sessions/00000000-0000-0000-0000-000000000000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
