use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use shared_backend::BackendClient;
use shared_config::{AppConfig, SmsVerificationMode};

use crate::models::CustomerError;
use crate::services::customer::CustomerService;

/// Sends and checks the one-time code that proves phone ownership.
#[async_trait]
pub trait SmsVerifier: Send + Sync {
    async fn send_code(&self, phone: &str) -> Result<(), CustomerError>;

    async fn check_code(&self, phone: &str, code: &str) -> Result<bool, CustomerError>;
}

/// Sends nothing and accepts a single fixed code.
pub struct SimulatedSmsVerifier {
    expected_code: String,
}

impl SimulatedSmsVerifier {
    pub fn new(expected_code: impl Into<String>) -> Self {
        Self {
            expected_code: expected_code.into(),
        }
    }
}

#[async_trait]
impl SmsVerifier for SimulatedSmsVerifier {
    async fn send_code(&self, phone: &str) -> Result<(), CustomerError> {
        info!("Simulated SMS code dispatched to phone ending in {}", phone_suffix(phone));
        Ok(())
    }

    async fn check_code(&self, _phone: &str, code: &str) -> Result<bool, CustomerError> {
        Ok(code.trim() == self.expected_code)
    }
}

pub struct BackendSmsVerifier {
    customers: CustomerService,
}

impl BackendSmsVerifier {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self {
            customers: CustomerService::with_client(backend),
        }
    }
}

#[async_trait]
impl SmsVerifier for BackendSmsVerifier {
    async fn send_code(&self, phone: &str) -> Result<(), CustomerError> {
        self.customers.send_verification_code(phone).await
    }

    async fn check_code(&self, phone: &str, code: &str) -> Result<bool, CustomerError> {
        self.customers.check_verification_code(phone, code.trim()).await
    }
}

pub fn verifier_for(config: &AppConfig, backend: Arc<BackendClient>) -> Arc<dyn SmsVerifier> {
    match config.sms_verification_mode {
        SmsVerificationMode::Simulated => Arc::new(SimulatedSmsVerifier::new(config.simulated_sms_code.clone())),
        SmsVerificationMode::Backend => Arc::new(BackendSmsVerifier::new(backend)),
    }
}

fn phone_suffix(phone: &str) -> &str {
    let split = phone.len().saturating_sub(4);
    phone.get(split..).unwrap_or(phone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_verifier_accepts_only_expected_code() {
        let verifier = SimulatedSmsVerifier::new("123456");

        assert!(verifier.send_code("11999999999").await.is_ok());
        assert!(verifier.check_code("11999999999", "123456").await.unwrap());
        assert!(verifier.check_code("11999999999", " 123456 ").await.unwrap());
        assert!(!verifier.check_code("11999999999", "654321").await.unwrap());
    }

    #[test]
    fn test_phone_suffix() {
        assert_eq!(phone_suffix("11999998888"), "8888");
        assert_eq!(phone_suffix("12"), "12");
    }
}
