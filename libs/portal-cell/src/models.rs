// libs/portal-cell/src/models.rs
use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use appointment_cell::{Appointment, AppointmentError};
use catalog_cell::{Catalog, CatalogError, EntityId};
use customer_cell::{CustomerError, CustomerState};
use schedule_cell::{DateOption, ScheduleError, SlotBoard};
use shared_backend::BackendError;
use shared_models::error::AppError;

// ==============================================================================
// WIZARD STEPS
// ==============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    #[default]
    Service,
    Barber,
    Date,
    Products,
    Confirm,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Service,
        WizardStep::Barber,
        WizardStep::Date,
        WizardStep::Products,
        WizardStep::Confirm,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<WizardStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }
}

// ==============================================================================
// BOOKING STATE
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSelection {
    pub product_id: EntityId,
    pub quantity: u32,
}

/// What the customer picked so far. Totals are derived from the selections
/// and the catalog after every change and never set directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingState {
    pub selected_service_ids: BTreeSet<EntityId>,
    /// Only read when per-service quantities are enabled.
    pub service_quantities: BTreeMap<EntityId, u32>,
    pub selected_barber_id: Option<EntityId>,
    pub selected_date: Option<NaiveDate>,
    pub selected_time: Option<String>,
    pub selected_products: Vec<ProductSelection>,
    pub total_price: f64,
    pub total_duration: i32,
    pub active_step: WizardStep,
}

impl BookingState {
    pub fn product_quantity(&self, product_id: EntityId) -> u32 {
        self.selected_products
            .iter()
            .find(|p| p.product_id == product_id)
            .map(|p| p.quantity)
            .unwrap_or(0)
    }
}

// ==============================================================================
// VIEW
// ==============================================================================

/// Snapshot returned by every portal route.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalView {
    pub session_id: Uuid,
    pub catalog: Catalog,
    pub step: WizardStep,
    pub booking: BookingState,
    pub customer: CustomerState,
    pub slots: SlotBoard,
    pub available_dates: Vec<DateOption>,
    pub confirmed: bool,
    pub appointment: Option<Appointment>,
}

// ==============================================================================
// REQUEST BODIES
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub company_slug: String,
    pub device_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuantityRequest {
    pub quantity: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalRequest {
    pub professional_id: EntityId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateRequest {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeRequest {
    pub time: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NavigateRequest {
    pub step: WizardStep,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LookupRequest {
    pub phone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyRequest {
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("{0}")]
    Validation(String),

    #[error("This booking is already confirmed")]
    Locked,

    #[error("Service {0} is not offered")]
    UnknownService(EntityId),

    #[error("Product {0} is not offered")]
    UnknownProduct(EntityId),

    #[error("Professional {0} is not available")]
    UnknownProfessional(EntityId),

    #[error("Booking session {0} not found")]
    SessionNotFound(Uuid),

    #[error(transparent)]
    Customer(#[from] CustomerError),

    #[error(transparent)]
    Appointment(#[from] AppointmentError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl PortalError {
    fn backend(&self) -> Option<&BackendError> {
        match self {
            PortalError::Customer(CustomerError::Backend(e))
            | PortalError::Appointment(AppointmentError::Backend(e))
            | PortalError::Appointment(AppointmentError::Customer(CustomerError::Backend(e)))
            | PortalError::Schedule(ScheduleError::Backend(e))
            | PortalError::Catalog(CatalogError::Backend(e)) => Some(e),
            _ => None,
        }
    }

    /// The backend rejected the session token.
    pub fn is_unauthorized(&self) -> bool {
        self.backend().is_some_and(BackendError::is_unauthorized)
    }
}

impl From<PortalError> for AppError {
    fn from(err: PortalError) -> Self {
        match err {
            PortalError::Validation(msg) => AppError::ValidationError(msg),
            PortalError::Locked => AppError::Conflict(err.to_string()),
            PortalError::UnknownService(_)
            | PortalError::UnknownProduct(_)
            | PortalError::UnknownProfessional(_)
            | PortalError::SessionNotFound(_) => AppError::NotFound(err.to_string()),
            PortalError::Customer(e) => e.into(),
            PortalError::Appointment(e) => e.into(),
            PortalError::Schedule(e) => e.into(),
            PortalError::Catalog(e) => e.into(),
        }
    }
}
