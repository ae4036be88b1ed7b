use std::sync::Arc;

use tracing::{debug, info};

use shared_backend::{BackendClient, BackendError};
use shared_config::AppConfig;

use crate::models::{Catalog, CatalogError, Company, CompanyRef, EntityId, Product, Professional, Service};

pub struct CatalogService {
    backend: Arc<BackendClient>,
}

impl CatalogService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(Arc::new(BackendClient::new(config)))
    }

    pub fn with_client(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }

    pub async fn fetch_company(
        &self,
        company: &CompanyRef,
        auth_token: Option<&str>,
    ) -> Result<Company, CatalogError> {
        debug!("Fetching company by {}", company);

        let path = match company {
            CompanyRef::Slug(slug) => format!("/companies/slug/{}", urlencoding::encode(slug)),
            CompanyRef::Id(id) => format!("/companies/{}", id),
        };

        self.backend.get(&path, auth_token).await.map_err(|e| match e {
            BackendError::NotFound(_) => CatalogError::CompanyNotFound(company.to_string()),
            other => CatalogError::Backend(other),
        })
    }

    pub async fn fetch_services(&self, company_id: EntityId, auth_token: Option<&str>) -> Result<Vec<Service>, CatalogError> {
        let path = format!("/companies/{}/services", company_id);
        Ok(self.backend.get(&path, auth_token).await?)
    }

    pub async fn fetch_products(&self, company_id: EntityId, auth_token: Option<&str>) -> Result<Vec<Product>, CatalogError> {
        let path = format!("/companies/{}/products", company_id);
        Ok(self.backend.get(&path, auth_token).await?)
    }

    pub async fn fetch_professionals(
        &self,
        company_id: EntityId,
        auth_token: Option<&str>,
    ) -> Result<Vec<Professional>, CatalogError> {
        let path = format!("/companies/{}/professionals", company_id);
        Ok(self.backend.get(&path, auth_token).await?)
    }

    /// Loads the company and its three reference lists. Inactive services
    /// and products are left out since the portal cannot book them.
    pub async fn load_catalog(&self, company: &CompanyRef, auth_token: Option<&str>) -> Result<Catalog, CatalogError> {
        let company = self.fetch_company(company, auth_token).await?;

        let (services, products, professionals) = tokio::try_join!(
            self.fetch_services(company.id, auth_token),
            self.fetch_products(company.id, auth_token),
            self.fetch_professionals(company.id, auth_token),
        )?;

        let services: Vec<Service> = services.into_iter().filter(|s| s.active).collect();
        let products: Vec<Product> = products.into_iter().filter(|p| p.active).collect();

        info!(
            "Loaded catalog for {}: {} services, {} products, {} professionals",
            company.slug,
            services.len(),
            products.len(),
            professionals.len()
        );

        Ok(Catalog {
            company,
            services,
            products,
            professionals,
        })
    }
}
