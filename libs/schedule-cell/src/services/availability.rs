use std::sync::Arc;

use reqwest::Method;
use tracing::{debug, info};

use shared_backend::BackendClient;
use shared_config::AppConfig;

use crate::models::{AvailabilityQuery, ScheduleError, SlotsPayload};

pub struct AvailabilityService {
    backend: Arc<BackendClient>,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(Arc::new(BackendClient::new(config)))
    }

    pub fn with_client(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }

    /// Free time strings ("09:00") for a professional on a given day.
    /// Nothing is cached; every call goes to the backend.
    pub async fn fetch_time_slots(
        &self,
        query: &AvailabilityQuery,
        auth_token: Option<&str>,
    ) -> Result<Vec<String>, ScheduleError> {
        debug!("Fetching time slots for {:?}", query);

        let params = [
            ("professionalId", query.professional_id.to_string()),
            ("companyId", query.company_id.to_string()),
            ("date", query.date.format("%Y-%m-%d").to_string()),
        ];

        let payload: SlotsPayload = self
            .backend
            .request_with_query::<_, ()>(Method::GET, "/appointments/available-slots", &params, auth_token, None)
            .await?;

        let slots = payload.into_slots();
        info!(
            "Professional {} has {} free slots on {}",
            query.professional_id,
            slots.len(),
            query.date
        );

        Ok(slots)
    }
}
