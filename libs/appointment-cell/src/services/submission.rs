use std::sync::Arc;

use tracing::{debug, info};

use customer_cell::services::validation::{normalize_phone, validate_email, validate_name};
use customer_cell::{CreateCustomerRequest, CustomerService};
use shared_backend::BackendClient;

use crate::models::{
    AdminAppointmentRequest, AdminBookingInput, Appointment, AppointmentError, PortalAppointmentRequest,
    ProductLine, ServiceLine,
};
use crate::services::schedule::{format_scheduled_at, merge_schedule};

pub struct AppointmentService {
    backend: Arc<BackendClient>,
    customers: CustomerService,
}

impl AppointmentService {
    pub fn with_client(backend: Arc<BackendClient>) -> Self {
        Self {
            customers: CustomerService::with_client(Arc::clone(&backend)),
            backend,
        }
    }

    fn validate_lines(services: &[ServiceLine], products: &[ProductLine]) -> Result<(), AppointmentError> {
        if services.is_empty() {
            return Err(AppointmentError::NoServices);
        }

        let zero_service = services.iter().any(|line| line.quantity == 0);
        let zero_product = products.iter().any(|line| line.quantity == 0);
        if zero_service || zero_product {
            return Err(AppointmentError::InvalidQuantity);
        }

        Ok(())
    }

    /// Public booking; the backend creates or matches the customer from the
    /// inline contact fields.
    pub async fn create_portal_appointment(
        &self,
        request: &PortalAppointmentRequest,
        auth_token: Option<&str>,
    ) -> Result<Appointment, AppointmentError> {
        Self::validate_lines(&request.services, &request.products)?;

        debug!(
            "Submitting portal appointment for company {} with professional {} at {}",
            request.company_id, request.professional_id, request.scheduled_at
        );

        let appointment: Appointment = self
            .backend
            .post("/appointments/public", auth_token, request)
            .await?;

        info!("Portal appointment {} created", appointment.id);
        Ok(appointment)
    }

    pub async fn create_admin_appointment(
        &self,
        request: &AdminAppointmentRequest,
        auth_token: Option<&str>,
    ) -> Result<Appointment, AppointmentError> {
        Self::validate_lines(&request.services, &request.products)?;

        debug!(
            "Submitting appointment for client {} with professional {}",
            request.client_id, request.professional_id
        );

        let appointment: Appointment = self.backend.post("/appointments", auth_token, request).await?;

        info!("Appointment {} created by staff", appointment.id);
        Ok(appointment)
    }

    /// Staff flow: resolves or creates the client, merges the slot into a UTC
    /// timestamp and submits.
    pub async fn book_for_admin(
        &self,
        input: AdminBookingInput,
        utc_offset_minutes: i32,
        auth_token: Option<&str>,
    ) -> Result<Appointment, AppointmentError> {
        Self::validate_lines(&input.services, &input.products)?;
        let scheduled_at = format_scheduled_at(merge_schedule(input.date, &input.time, utc_offset_minutes)?);

        let client_id = match (input.client_id, input.new_client) {
            (Some(id), _) => id,
            (None, Some(new_client)) => {
                let phone = normalize_phone(&new_client.phone)?;
                let name = validate_name(&new_client.name)?;
                let email = validate_email(new_client.email.as_deref())?;

                let created = self
                    .customers
                    .create_customer(
                        &CreateCustomerRequest {
                            company_id: input.company_id,
                            name,
                            phone,
                            email,
                        },
                        auth_token,
                    )
                    .await?;
                created.id
            }
            (None, None) => return Err(AppointmentError::MissingClient),
        };

        let request = AdminAppointmentRequest {
            company_id: input.company_id,
            professional_id: input.professional_id,
            client_id,
            services: input.services,
            products: input.products,
            scheduled_at,
            notes: input.notes.filter(|n| !n.trim().is_empty()),
        };

        self.create_admin_appointment(&request, auth_token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_validate_lines() {
        let service = |q| ServiceLine { service_id: 1, quantity: q };
        let product = |q| ProductLine { product_id: 2, quantity: q };

        assert!(AppointmentService::validate_lines(&[service(1)], &[]).is_ok());
        assert!(AppointmentService::validate_lines(&[service(2)], &[product(3)]).is_ok());
        assert_matches!(
            AppointmentService::validate_lines(&[], &[product(1)]),
            Err(AppointmentError::NoServices)
        );
        assert_matches!(
            AppointmentService::validate_lines(&[service(0)], &[]),
            Err(AppointmentError::InvalidQuantity)
        );
        assert_matches!(
            AppointmentService::validate_lines(&[service(1)], &[product(0)]),
            Err(AppointmentError::InvalidQuantity)
        );
    }
}
