// libs/schedule-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use catalog_cell::EntityId;
use shared_backend::BackendError;
use shared_models::error::AppError;

/// One entry of the rolling date picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateOption {
    pub label: String,
    /// ISO date, `YYYY-MM-DD`.
    pub value: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub professional_id: EntityId,
    pub company_id: EntityId,
    pub date: NaiveDate,
}

/// Handed out when a fetch starts; only the ticket carrying the board's
/// latest generation may apply its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTicket {
    pub generation: u64,
    pub query: AvailabilityQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    /// A newer fetch was issued (or the board was reset) meanwhile.
    Stale,
    Loaded(usize),
    Empty,
    Failed,
}

/// Accepts both a bare array and an object wrapping it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum SlotsPayload {
    List(Vec<String>),
    Wrapped {
        #[serde(alias = "availableSlots", alias = "timeSlots")]
        slots: Vec<String>,
    },
}

impl SlotsPayload {
    pub(crate) fn into_slots(self) -> Vec<String> {
        match self {
            SlotsPayload::List(slots) => slots,
            SlotsPayload::Wrapped { slots } => slots,
        }
    }
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Time {0} is not available")]
    SlotNotOffered(String),

    #[error("Date {0} is outside the booking window")]
    DateOutOfWindow(NaiveDate),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::Backend(e) => e.into(),
            other => AppError::ValidationError(other.to_string()),
        }
    }
}
