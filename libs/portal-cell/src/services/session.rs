use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, Utc};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info, warn};
use uuid::Uuid;

use appointment_cell::{Appointment, AppointmentService, PortalAppointmentRequest};
use catalog_cell::{CatalogService, CompanyRef, EntityId};
use customer_cell::{contact_store_for, ContactPrefill, ContactStore, CustomerError, IdentityResolver, LookupOutcome};
use schedule_cell::models::SlotTicket;
use schedule_cell::{booking_window, AvailabilityService};
use shared_backend::BackendClient;
use shared_config::AppConfig;
use shared_models::auth::AuthContext;

use crate::models::{CreateSessionRequest, PortalError, PortalView, WizardStep};
use crate::services::store::{SessionHandle, SessionStore};
use crate::services::wizard::BookingWizard;

/// One customer's trip through the booking portal.
pub struct PortalSession {
    pub id: Uuid,
    pub device_id: Option<String>,
    pub auth: AuthContext,
    pub wizard: BookingWizard,
    pub appointment: Option<Appointment>,
}

impl PortalSession {
    pub fn view(&self) -> PortalView {
        self.wizard.view(self.id, self.appointment.as_ref())
    }

    /// Drops the auth context when the backend rejected the token.
    fn settle<T>(&mut self, result: Result<T, PortalError>) -> Result<T, PortalError> {
        if let Err(e) = &result {
            if e.is_unauthorized() {
                warn!("Backend rejected the token of session {}, clearing auth", self.id);
                self.auth.clear();
            }
        }
        result
    }
}

/// Runs portal sessions against the backend.
pub struct PortalService {
    config: Arc<AppConfig>,
    store: SessionStore,
    catalogs: CatalogService,
    availability: AvailabilityService,
    identity: IdentityResolver,
    appointments: AppointmentService,
    contacts: Arc<dyn ContactStore>,
    today: Option<NaiveDate>,
}

impl PortalService {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let backend = Arc::new(BackendClient::new(&config));

        Self {
            store: SessionStore::new(),
            catalogs: CatalogService::with_client(Arc::clone(&backend)),
            availability: AvailabilityService::with_client(Arc::clone(&backend)),
            identity: IdentityResolver::new(&config, Arc::clone(&backend)),
            appointments: AppointmentService::with_client(backend),
            contacts: contact_store_for(&config),
            today: None,
            config,
        }
    }

    pub fn with_contact_store(mut self, contacts: Arc<dyn ContactStore>) -> Self {
        self.contacts = contacts;
        self
    }

    /// Pins the first day of the booking window.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Today in the business timezone.
    fn today(&self) -> NaiveDate {
        if let Some(today) = self.today {
            return today;
        }

        match FixedOffset::east_opt(self.config.utc_offset_minutes * 60) {
            Some(offset) => Utc::now().with_timezone(&offset).date_naive(),
            None => Utc::now().date_naive(),
        }
    }

    async fn apply_prefill(&self, session: &mut PortalSession) {
        let Some(device) = session.device_id.as_deref() else {
            return;
        };

        if let Some(prefill) = self.contacts.get(device).await {
            debug!("Prefilling contact details for session {}", session.id);
            session.wizard.customer.apply_prefill(&prefill);
        }
    }

    async fn remember_phone(&self, session: &PortalSession) {
        let Some(device) = session.device_id.as_deref() else {
            return;
        };

        let mut prefill = self.contacts.get(device).await.unwrap_or_default();
        prefill.phone = Some(session.wizard.customer.phone.clone());
        self.contacts.set(device, prefill).await;
    }

    async fn remember_contact(&self, session: &PortalSession) {
        let Some(device) = session.device_id.as_deref() else {
            return;
        };

        let prefill: ContactPrefill = session.wizard.customer.to_prefill();
        if !prefill.is_empty() {
            self.contacts.set(device, prefill).await;
        }
    }

    // ==========================================================================
    // SESSIONS
    // ==========================================================================

    pub async fn open_session(&self, request: CreateSessionRequest, auth: AuthContext) -> Result<PortalView, PortalError> {
        let slug = request.company_slug.trim();
        if slug.is_empty() {
            return Err(PortalError::Validation("Company slug is required".to_string()));
        }

        let catalog = self
            .catalogs
            .load_catalog(&CompanyRef::Slug(slug.to_string()), auth.token())
            .await?;

        let window = booking_window(self.today(), self.config.booking_window_months);
        let wizard = BookingWizard::new(Arc::new(catalog), window, self.config.allow_service_quantity);

        let mut session = PortalSession {
            id: Uuid::new_v4(),
            device_id: request.device_id.filter(|d| !d.trim().is_empty()),
            auth,
            wizard,
            appointment: None,
        };
        self.apply_prefill(&mut session).await;

        info!("Opened portal session {} for company {}", session.id, slug);

        let handle = self.store.insert(session).await;
        let view = handle.lock().await.view();
        Ok(view)
    }

    pub async fn view(&self, id: Uuid) -> Result<PortalView, PortalError> {
        let handle = self.store.get(id).await?;
        let view = handle.lock().await.view();
        Ok(view)
    }

    pub async fn close_session(&self, id: Uuid) -> Result<(), PortalError> {
        self.store.remove(id).await
    }

    /// Periodically drops sessions idle for longer than the configured TTL.
    /// The task ends once the service itself is dropped.
    pub fn spawn_session_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let ttl = self.config.session_idle_ttl();
        let portal = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut sweep_interval = interval(ttl / 2);

            loop {
                sweep_interval.tick().await;

                let Some(portal) = portal.upgrade() else {
                    debug!("Session sweeper stopping, portal is gone");
                    break;
                };

                let evicted = portal.store.evict_idle(ttl).await;
                if evicted > 0 {
                    info!("Evicted {} idle portal sessions", evicted);
                }
            }
        })
    }

    async fn mutate<F>(&self, id: Uuid, change: F) -> Result<PortalView, PortalError>
    where
        F: FnOnce(&mut BookingWizard) -> Result<(), PortalError>,
    {
        let handle = self.store.get(id).await?;
        let mut session = handle.lock().await;
        change(&mut session.wizard)?;
        Ok(session.view())
    }

    // ==========================================================================
    // SELECTIONS
    // ==========================================================================

    pub async fn toggle_service(&self, id: Uuid, service_id: EntityId) -> Result<PortalView, PortalError> {
        self.mutate(id, |wizard| wizard.toggle_service(service_id).map(|_| ())).await
    }

    pub async fn set_service_quantity(&self, id: Uuid, service_id: EntityId, quantity: u32) -> Result<PortalView, PortalError> {
        self.mutate(id, |wizard| wizard.set_service_quantity(service_id, quantity)).await
    }

    pub async fn set_product_quantity(&self, id: Uuid, product_id: EntityId, quantity: u32) -> Result<PortalView, PortalError> {
        self.mutate(id, |wizard| wizard.set_product_quantity(product_id, quantity)).await
    }

    pub async fn select_time(&self, id: Uuid, time: &str) -> Result<PortalView, PortalError> {
        self.mutate(id, |wizard| wizard.select_time(time)).await
    }

    pub async fn select_professional(&self, id: Uuid, professional_id: EntityId) -> Result<PortalView, PortalError> {
        let handle = self.store.get(id).await?;
        self.schedule(handle, |wizard| wizard.select_barber(professional_id)).await
    }

    pub async fn select_date(&self, id: Uuid, date: NaiveDate) -> Result<PortalView, PortalError> {
        let handle = self.store.get(id).await?;
        self.schedule(handle, |wizard| wizard.select_date(date)).await
    }

    /// Applies a professional/date change and fetches the new slot list.
    /// The session lock is not held while the backend answers, so a newer
    /// change may start meanwhile; the board's generation decides which
    /// answer is shown.
    async fn schedule<F>(&self, handle: SessionHandle, change: F) -> Result<PortalView, PortalError>
    where
        F: FnOnce(&mut BookingWizard) -> Result<Option<SlotTicket>, PortalError>,
    {
        let (ticket, token) = {
            let mut session = handle.lock().await;
            let ticket = change(&mut session.wizard)?;
            (ticket, session.auth.token().map(str::to_owned))
        };

        let Some(ticket) = ticket else {
            let view = handle.lock().await.view();
            return Ok(view);
        };

        let result = self.availability.fetch_time_slots(&ticket.query, token.as_deref()).await;

        let mut session = handle.lock().await;
        let applied = match &result {
            Ok(slots) => Ok(slots.clone()),
            Err(e) => Err(e.to_string()),
        };
        let outcome = session.wizard.apply_slots(&ticket, applied);
        debug!("Slot fetch for session {} finished: {:?}", session.id, outcome);

        // Other failures already show up as the board's error message
        if let Err(e) = result {
            let err = PortalError::from(e);
            if err.is_unauthorized() {
                return session.settle(Err(err));
            }
        }

        Ok(session.view())
    }

    // ==========================================================================
    // NAVIGATION
    // ==========================================================================

    /// Returns whether the step changed along with the new view.
    pub async fn navigate(&self, id: Uuid, step: WizardStep) -> Result<(bool, PortalView), PortalError> {
        let handle = self.store.get(id).await?;
        let mut session = handle.lock().await;
        let changed = session.wizard.go_to(step)?;
        Ok((changed, session.view()))
    }

    /// Starts the booking over, keeping the session and its device prefill.
    pub async fn reset(&self, id: Uuid) -> Result<PortalView, PortalError> {
        let handle = self.store.get(id).await?;
        let mut session = handle.lock().await;

        session.wizard.reset();
        session.appointment = None;
        self.apply_prefill(&mut session).await;

        Ok(session.view())
    }

    // ==========================================================================
    // IDENTITY & SUBMISSION
    // ==========================================================================

    pub async fn lookup_phone(&self, id: Uuid, phone: &str) -> Result<(LookupOutcome, PortalView), PortalError> {
        let handle = self.store.get(id).await?;
        let mut session = handle.lock().await;

        if session.wizard.is_confirmed() {
            return Err(PortalError::Locked);
        }

        let company_id = session.wizard.company_id();
        let token = session.auth.token().map(str::to_owned);
        let result = self
            .identity
            .lookup(&mut session.wizard.customer, company_id, phone, token.as_deref())
            .await
            .map_err(PortalError::from);
        let outcome = session.settle(result)?;

        self.remember_phone(&session).await;
        Ok((outcome, session.view()))
    }

    /// Existing customer: checks the SMS code, then books with the stored
    /// customer details.
    pub async fn verify_code(&self, id: Uuid, code: &str) -> Result<PortalView, PortalError> {
        let handle = self.store.get(id).await?;
        let mut session = handle.lock().await;

        if session.wizard.is_confirmed() {
            return Err(PortalError::Locked);
        }
        if !session.wizard.customer.awaiting_code() {
            return Err(CustomerError::NotAwaitingCode.into());
        }

        let request = session.wizard.build_portal_request(self.config.utc_offset_minutes)?;

        let result = self
            .identity
            .check_code(&mut session.wizard.customer, code)
            .await
            .map_err(PortalError::from);
        session.settle(result)?;

        self.submit(&mut session, request).await?;
        Ok(session.view())
    }

    /// New customer: captures name and email, then books with them.
    pub async fn register_customer(&self, id: Uuid, name: &str, email: Option<&str>) -> Result<PortalView, PortalError> {
        let handle = self.store.get(id).await?;
        let mut session = handle.lock().await;

        if session.wizard.is_confirmed() {
            return Err(PortalError::Locked);
        }

        self.identity.capture_new_customer(&mut session.wizard.customer, name, email)?;
        let request = session.wizard.build_portal_request(self.config.utc_offset_minutes)?;

        self.submit(&mut session, request).await?;
        Ok(session.view())
    }

    async fn submit(&self, session: &mut PortalSession, request: PortalAppointmentRequest) -> Result<(), PortalError> {
        let token = session.auth.token().map(str::to_owned);
        let result = self
            .appointments
            .create_portal_appointment(&request, token.as_deref())
            .await
            .map_err(PortalError::from);
        let appointment = session.settle(result)?;

        let customer = appointment
            .client
            .clone()
            .or_else(|| session.wizard.customer.customer_data.clone());
        session.wizard.confirm(customer);
        session.appointment = Some(appointment);

        self.remember_contact(session).await;
        info!("Portal session {} booked appointment", session.id);
        Ok(())
    }
}
