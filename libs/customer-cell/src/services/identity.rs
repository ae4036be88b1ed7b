use std::sync::Arc;

use tracing::{debug, info, warn};

use catalog_cell::EntityId;
use shared_backend::BackendClient;
use shared_config::AppConfig;

use crate::models::{CustomerError, CustomerState, LookupOutcome};
use crate::services::customer::CustomerService;
use crate::services::validation::{normalize_phone, validate_email, validate_name};
use crate::services::verification::{verifier_for, SmsVerifier};

/// Phone-keyed identity flow of the booking portal.
///
/// A known phone leads to the SMS branch, anything else (including a failed
/// lookup) leads to the new-customer branch. A rejected token is the one
/// lookup failure that is returned to the caller. Validation failures never reach
/// the network and never touch the state.
pub struct IdentityResolver {
    customers: CustomerService,
    verifier: Arc<dyn SmsVerifier>,
}

impl IdentityResolver {
    pub fn new(config: &AppConfig, backend: Arc<BackendClient>) -> Self {
        let verifier = verifier_for(config, Arc::clone(&backend));
        Self::with_verifier(backend, verifier)
    }

    pub fn with_verifier(backend: Arc<BackendClient>, verifier: Arc<dyn SmsVerifier>) -> Self {
        Self {
            customers: CustomerService::with_client(backend),
            verifier,
        }
    }

    pub fn customers(&self) -> &CustomerService {
        &self.customers
    }

    pub async fn lookup(
        &self,
        state: &mut CustomerState,
        company_id: EntityId,
        raw_phone: &str,
        auth_token: Option<&str>,
    ) -> Result<LookupOutcome, CustomerError> {
        let phone = normalize_phone(raw_phone)?;

        state.reset_branch();
        state.phone = phone.clone();

        let found = match self.customers.find_by_phone(company_id, &phone, auth_token).await {
            Ok(found) => found,
            Err(CustomerError::Backend(e)) if e.is_unauthorized() => {
                return Err(CustomerError::Backend(e));
            }
            Err(e) => {
                warn!("Customer lookup failed, continuing as new customer: {}", e);
                None
            }
        };

        match found {
            Some(customer) => {
                info!("Existing customer {} found, sending verification code", customer.id);
                state.is_existing_client = true;
                state.customer_data = Some(customer.clone());

                self.verifier.send_code(&phone).await?;
                state.show_sms_input = true;

                Ok(LookupOutcome::Existing(customer))
            }
            None => {
                debug!("Phone not registered for company {}", company_id);
                state.show_name_input = true;
                Ok(LookupOutcome::New)
            }
        }
    }

    /// Checks the typed code. A mismatch leaves `phone_verified` untouched;
    /// the caller confirms the state once the appointment exists.
    pub async fn check_code(&self, state: &mut CustomerState, code: &str) -> Result<(), CustomerError> {
        if !state.awaiting_code() {
            return Err(CustomerError::NotAwaitingCode);
        }

        state.sms_code = code.trim().to_string();

        if self.verifier.check_code(&state.phone, &state.sms_code).await? {
            debug!("Verification code accepted");
            Ok(())
        } else {
            warn!("Verification code rejected");
            Err(CustomerError::CodeMismatch)
        }
    }

    pub fn capture_new_customer(
        &self,
        state: &mut CustomerState,
        name: &str,
        email: Option<&str>,
    ) -> Result<(), CustomerError> {
        if !state.awaiting_name() {
            return Err(CustomerError::NotNewCustomer);
        }

        let name = validate_name(name)?;
        let email = validate_email(email)?;

        state.name = name;
        state.email = email.unwrap_or_default();
        Ok(())
    }
}
