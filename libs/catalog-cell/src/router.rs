// libs/catalog-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use shared_config::AppConfig;

use crate::handlers;
use crate::services::CatalogService;

pub fn catalog_routes(config: Arc<AppConfig>) -> Router {
    let catalog_service = Arc::new(CatalogService::new(&config));

    Router::new()
        .route("/{slug}", get(handlers::get_catalog))
        .with_state(catalog_service)
}
