// libs/customer-cell/src/models.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;

use catalog_cell::EntityId;
use shared_backend::BackendError;
use shared_models::error::AppError;

// ==============================================================================
// CUSTOMER MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: EntityId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub company_id: EntityId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    pub phone: String,
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyCodeResponse {
    pub valid: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Existing(Customer),
    New,
}

/// Contact details cached per device to prefill the next visit. Never
/// authoritative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPrefill {
    pub phone: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl ContactPrefill {
    pub fn is_empty(&self) -> bool {
        self.phone.is_none() && self.name.is_none() && self.email.is_none()
    }
}

// ==============================================================================
// IDENTITY STATE
// ==============================================================================

/// Who is booking. `phone_verified` flips to true only once the booking is
/// confirmed: after a matching SMS code for existing customers, after a
/// successful creation for new ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerState {
    pub phone: String,
    pub sms_code: String,
    pub name: String,
    pub email: String,
    pub is_existing_client: bool,
    pub phone_verified: bool,
    pub customer_data: Option<Customer>,
    pub show_sms_input: bool,
    pub show_name_input: bool,
}

impl CustomerState {
    /// Forgets the outcome of a previous lookup before a new one.
    pub fn reset_branch(&mut self) {
        self.sms_code.clear();
        self.is_existing_client = false;
        self.customer_data = None;
        self.show_sms_input = false;
        self.show_name_input = false;
    }

    pub fn awaiting_code(&self) -> bool {
        self.is_existing_client && self.show_sms_input && !self.phone_verified
    }

    pub fn awaiting_name(&self) -> bool {
        !self.is_existing_client && self.show_name_input && !self.phone_verified
    }

    pub fn email_opt(&self) -> Option<String> {
        let email = self.email.trim();
        (!email.is_empty()).then(|| email.to_string())
    }

    /// Marks the booking confirmed and hydrates the contact fields from the
    /// customer record, when one came back.
    pub fn confirm(&mut self, customer: Option<Customer>) {
        self.phone_verified = true;
        self.show_sms_input = false;
        self.show_name_input = false;

        if let Some(customer) = customer {
            self.name = customer.name.clone();
            self.phone = customer.phone.clone();
            if let Some(email) = &customer.email {
                self.email = email.clone();
            }
            self.customer_data = Some(customer);
        }
    }

    pub fn apply_prefill(&mut self, prefill: &ContactPrefill) {
        if let Some(phone) = &prefill.phone {
            self.phone = phone.clone();
        }
        if let Some(name) = &prefill.name {
            self.name = name.clone();
        }
        if let Some(email) = &prefill.email {
            self.email = email.clone();
        }
    }

    pub fn to_prefill(&self) -> ContactPrefill {
        let non_empty = |value: &str| (!value.trim().is_empty()).then(|| value.trim().to_string());
        ContactPrefill {
            phone: non_empty(&self.phone),
            name: non_empty(&self.name),
            email: non_empty(&self.email),
        }
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("Enter a valid phone number with area code")]
    InvalidPhone,

    #[error("Name must have at least {min} characters")]
    NameTooShort { min: usize },

    #[error("Enter a valid email address")]
    InvalidEmail,

    #[error("Invalid verification code")]
    CodeMismatch,

    #[error("No verification code was requested for this phone")]
    NotAwaitingCode,

    #[error("Name is only collected for new customers")]
    NotNewCustomer,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl From<CustomerError> for AppError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::Backend(e) => e.into(),
            CustomerError::NotAwaitingCode | CustomerError::NotNewCustomer => AppError::Conflict(err.to_string()),
            other => AppError::ValidationError(other.to_string()),
        }
    }
}
