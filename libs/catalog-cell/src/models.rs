// libs/catalog-cell/src/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use shared_backend::BackendError;
use shared_models::error::AppError;

/// Backend entities are identified by integer IDs.
pub type EntityId = i64;

fn default_active() -> bool {
    true
}

// ==============================================================================
// REFERENCE DATA
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: EntityId,
    pub name: String,
    pub slug: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    /// Minutes.
    pub duration: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Professional {
    pub id: EntityId,
    pub name: String,
    pub avatar_url: Option<String>,
    pub specialty: Option<String>,
}

/// Everything the portal needs to render one company's booking flow.
/// Fetched once per portal session and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub company: Company,
    pub services: Vec<Service>,
    pub products: Vec<Product>,
    pub professionals: Vec<Professional>,
}

impl Catalog {
    pub fn service(&self, id: EntityId) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn product(&self, id: EntityId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn professional(&self, id: EntityId) -> Option<&Professional> {
        self.professionals.iter().find(|p| p.id == id)
    }
}

/// How a caller names the company whose catalog it wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyRef {
    Slug(String),
    Id(EntityId),
}

impl fmt::Display for CompanyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompanyRef::Slug(slug) => write!(f, "slug '{}'", slug),
            CompanyRef::Id(id) => write!(f, "id {}", id),
        }
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Company not found: {0}")]
    CompanyNotFound(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::CompanyNotFound(company) => AppError::NotFound(format!("Company not found: {}", company)),
            CatalogError::Backend(e) => e.into(),
        }
    }
}
