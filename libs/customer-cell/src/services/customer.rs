use std::sync::Arc;

use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use catalog_cell::EntityId;
use shared_backend::{BackendClient, BackendError};

use crate::models::{CreateCustomerRequest, Customer, CustomerError, VerifyCodeRequest, VerifyCodeResponse};

pub struct CustomerService {
    backend: Arc<BackendClient>,
}

impl CustomerService {
    pub fn with_client(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }

    /// `Ok(None)` when the backend does not know the phone.
    pub async fn find_by_phone(
        &self,
        company_id: EntityId,
        phone: &str,
        auth_token: Option<&str>,
    ) -> Result<Option<Customer>, CustomerError> {
        debug!("Looking up customer by phone for company {}", company_id);

        let path = format!("/customers/phone/{}", urlencoding::encode(phone));
        let result = self
            .backend
            .request_with_query::<Customer, ()>(
                Method::GET,
                &path,
                &[("companyId", company_id.to_string())],
                auth_token,
                None,
            )
            .await;

        match result {
            Ok(customer) => Ok(Some(customer)),
            Err(BackendError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn create_customer(
        &self,
        request: &CreateCustomerRequest,
        auth_token: Option<&str>,
    ) -> Result<Customer, CustomerError> {
        debug!("Creating customer for company {}", request.company_id);

        let customer: Customer = self.backend.post("/customers", auth_token, request).await?;
        info!("Customer {} created", customer.id);

        Ok(customer)
    }

    pub async fn send_verification_code(&self, phone: &str) -> Result<(), CustomerError> {
        let _: Value = self
            .backend
            .post("/customers/send-code", None, &json!({ "phone": phone }))
            .await?;
        Ok(())
    }

    pub async fn check_verification_code(&self, phone: &str, code: &str) -> Result<bool, CustomerError> {
        let request = VerifyCodeRequest {
            phone: phone.to_string(),
            code: code.to_string(),
        };

        let response: VerifyCodeResponse = self.backend.post("/customers/verify-code", None, &request).await?;
        Ok(response.valid)
    }
}
