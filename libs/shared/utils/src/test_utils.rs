use std::sync::Arc;

use serde_json::{json, Value};

use shared_config::{AppConfig, SmsVerificationMode};

pub struct TestConfig {
    pub api_base_url: String,
    pub sms_code: String,
    pub allow_service_quantity: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3333".to_string(),
            sms_code: "123456".to_string(),
            allow_service_quantity: false,
        }
    }
}

impl TestConfig {
    pub fn with_backend(uri: &str) -> Self {
        Self {
            api_base_url: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api_base_url.clone(),
            request_timeout_secs: 5,
            sms_verification_mode: SmsVerificationMode::Simulated,
            simulated_sms_code: self.sms_code.clone(),
            allow_service_quantity: self.allow_service_quantity,
            utc_offset_minutes: -180,
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Canned backend bodies, shaped like the real API (camelCase).
pub struct MockBackendResponses;

impl MockBackendResponses {
    pub fn company(id: i64, slug: &str) -> Value {
        json!({
            "id": id,
            "name": "Barbearia Central",
            "slug": slug,
            "phone": "1133334444",
            "address": "Rua Augusta, 100"
        })
    }

    pub fn service(id: i64, name: &str, price: f64, duration: i32) -> Value {
        json!({
            "id": id,
            "name": name,
            "description": null,
            "price": price,
            "duration": duration,
            "active": true
        })
    }

    pub fn product(id: i64, name: &str, price: f64) -> Value {
        json!({
            "id": id,
            "name": name,
            "description": null,
            "price": price,
            "stock": 10,
            "imageUrl": null,
            "active": true
        })
    }

    pub fn professional(id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "avatarUrl": null,
            "specialty": "Corte"
        })
    }

    pub fn customer(id: i64, name: &str, phone: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "phone": phone,
            "email": "cliente@example.com"
        })
    }

    pub fn appointment(id: i64, scheduled_at: &str) -> Value {
        json!({
            "id": id,
            "scheduledAt": scheduled_at,
            "status": "SCHEDULED",
            "totalPrice": 50.0,
            "client": {
                "id": 99,
                "name": "Cliente Novo",
                "phone": "11999999999",
                "email": null
            }
        })
    }

    pub fn user(id: i64, role: &str, permissions: &[&str]) -> Value {
        json!({
            "id": id,
            "name": "Gerente",
            "email": "gerente@example.com",
            "role": role,
            "permissions": permissions,
            "companyId": 1
        })
    }

    pub fn error_response(message: &str) -> Value {
        json!({
            "message": message
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::with_backend("http://127.0.0.1:9999").to_app_config();

        assert_eq!(config.api_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.simulated_sms_code, "123456");
        assert_eq!(config.sms_verification_mode, SmsVerificationMode::Simulated);
    }

    #[test]
    fn test_canned_bodies_use_camel_case() {
        let product = MockBackendResponses::product(2, "Pomada", 15.0);
        assert!(product.get("imageUrl").is_some());

        let user = MockBackendResponses::user(1, "admin", &[]);
        assert_eq!(user["companyId"], 1);
    }
}
