// libs/catalog-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use shared_models::error::AppError;

use crate::models::{Catalog, CompanyRef};
use crate::services::CatalogService;

/// Public read of a company's bookable catalog.
#[axum::debug_handler]
pub async fn get_catalog(
    State(catalog_service): State<Arc<CatalogService>>,
    Path(slug): Path<String>,
) -> Result<Json<Catalog>, AppError> {
    let catalog = catalog_service
        .load_catalog(&CompanyRef::Slug(slug), None)
        .await?;

    Ok(Json(catalog))
}
