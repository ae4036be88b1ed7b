// libs/appointment-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use catalog_cell::EntityId;
use customer_cell::{Customer, CustomerError};
use shared_backend::BackendError;
use shared_models::error::AppError;

// ==============================================================================
// LINE ITEMS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLine {
    pub service_id: EntityId,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLine {
    pub product_id: EntityId,
    pub quantity: u32,
}

// ==============================================================================
// SUBMISSION DTOS
// ==============================================================================

/// Sent by the public portal; the customer travels inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalAppointmentRequest {
    pub company_id: EntityId,
    pub professional_id: EntityId,
    pub services: Vec<ServiceLine>,
    pub products: Vec<ProductLine>,
    /// ISO-8601 UTC, seconds and millis zeroed.
    pub scheduled_at: String,
    pub customer_phone: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
}

/// Sent by staff; the client already exists on the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAppointmentRequest {
    pub company_id: EntityId,
    pub professional_id: EntityId,
    pub client_id: EntityId,
    pub services: Vec<ServiceLine>,
    pub products: Vec<ProductLine>,
    pub scheduled_at: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: EntityId,
    pub scheduled_at: String,
    pub status: String,
    pub total_price: Option<f64>,
    pub client: Option<Customer>,
}

// ==============================================================================
// ADMIN INPUT
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClientInput {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

/// Body of the staff booking route. Either `client_id` or `new_client`
/// must be present; the latter is created first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminBookingInput {
    pub company_id: EntityId,
    pub professional_id: EntityId,
    pub client_id: Option<EntityId>,
    pub new_client: Option<NewClientInput>,
    pub services: Vec<ServiceLine>,
    #[serde(default)]
    pub products: Vec<ProductLine>,
    pub date: NaiveDate,
    pub time: String,
    pub notes: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Select at least one service")]
    NoServices,

    #[error("Quantities must be at least 1")]
    InvalidQuantity,

    #[error("A client is required")]
    MissingClient,

    #[error(transparent)]
    Customer(#[from] CustomerError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::Backend(e) => e.into(),
            AppointmentError::Customer(e) => e.into(),
            other => AppError::ValidationError(other.to_string()),
        }
    }
}
