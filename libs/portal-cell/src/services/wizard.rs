use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use appointment_cell::{
    format_scheduled_at, merge_schedule, Appointment, PortalAppointmentRequest, ProductLine, ServiceLine,
};
use catalog_cell::{Catalog, EntityId};
use customer_cell::{Customer, CustomerState};
use schedule_cell::models::{AvailabilityQuery, SlotOutcome, SlotTicket};
use schedule_cell::{DateOption, ScheduleError, SlotBoard};

use crate::models::{BookingState, PortalError, PortalView, ProductSelection, WizardStep};
use crate::services::totals::{compute_totals, service_quantity};

pub const SERVICE_REQUIRED: &str = "Select at least one service to continue";
pub const PROFESSIONAL_REQUIRED: &str = "Select a professional to continue";
pub const SCHEDULE_REQUIRED: &str = "Select a date and a time to continue";
pub const NAME_REQUIRED: &str = "Tell us your name to finish the booking";
pub const PHONE_REQUIRED: &str = "Tell us your phone to finish the booking";

/// Largest quantity accepted for a single service or product line.
pub const MAX_QUANTITY: u32 = 99;

/// The booking state machine for one portal session.
///
/// Every mutation recomputes the totals. Once the customer is confirmed the
/// wizard is terminal: selections are rejected and navigation does nothing.
#[derive(Debug, Clone)]
pub struct BookingWizard {
    catalog: Arc<Catalog>,
    window: Vec<DateOption>,
    per_service_quantity: bool,
    pub booking: BookingState,
    pub customer: CustomerState,
    pub slots: SlotBoard,
}

impl BookingWizard {
    pub fn new(catalog: Arc<Catalog>, window: Vec<DateOption>, per_service_quantity: bool) -> Self {
        Self {
            catalog,
            window,
            per_service_quantity,
            booking: BookingState::default(),
            customer: CustomerState::default(),
            slots: SlotBoard::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn window(&self) -> &[DateOption] {
        &self.window
    }

    pub fn company_id(&self) -> EntityId {
        self.catalog.company.id
    }

    pub fn is_confirmed(&self) -> bool {
        self.customer.phone_verified
    }

    fn ensure_editable(&self) -> Result<(), PortalError> {
        if self.is_confirmed() {
            return Err(PortalError::Locked);
        }
        Ok(())
    }

    fn ensure_quantity(quantity: u32) -> Result<(), PortalError> {
        if quantity > MAX_QUANTITY {
            return Err(PortalError::Validation(format!(
                "Quantity must be between 0 and {}",
                MAX_QUANTITY
            )));
        }
        Ok(())
    }

    fn recompute(&mut self) {
        let totals = compute_totals(&self.booking, &self.catalog, self.per_service_quantity);
        self.booking.total_price = totals.price;
        self.booking.total_duration = totals.duration;
    }

    // ==========================================================================
    // SELECTIONS
    // ==========================================================================

    /// Returns whether the service ended up selected.
    pub fn toggle_service(&mut self, service_id: EntityId) -> Result<bool, PortalError> {
        self.ensure_editable()?;
        if self.catalog.service(service_id).is_none() {
            return Err(PortalError::UnknownService(service_id));
        }

        let selected = if self.booking.selected_service_ids.remove(&service_id) {
            self.booking.service_quantities.remove(&service_id);
            false
        } else {
            self.booking.selected_service_ids.insert(service_id);
            true
        };

        self.recompute();
        Ok(selected)
    }

    /// Zero deselects the service.
    pub fn set_service_quantity(&mut self, service_id: EntityId, quantity: u32) -> Result<(), PortalError> {
        self.ensure_editable()?;
        if !self.per_service_quantity {
            return Err(PortalError::Validation(
                "Service quantities are not enabled for this portal".to_string(),
            ));
        }
        if self.catalog.service(service_id).is_none() {
            return Err(PortalError::UnknownService(service_id));
        }
        Self::ensure_quantity(quantity)?;

        if quantity == 0 {
            self.booking.selected_service_ids.remove(&service_id);
            self.booking.service_quantities.remove(&service_id);
        } else {
            self.booking.selected_service_ids.insert(service_id);
            self.booking.service_quantities.insert(service_id, quantity);
        }

        self.recompute();
        Ok(())
    }

    /// Zero removes the product.
    pub fn set_product_quantity(&mut self, product_id: EntityId, quantity: u32) -> Result<(), PortalError> {
        self.ensure_editable()?;
        if self.catalog.product(product_id).is_none() {
            return Err(PortalError::UnknownProduct(product_id));
        }
        Self::ensure_quantity(quantity)?;

        let position = self
            .booking
            .selected_products
            .iter()
            .position(|p| p.product_id == product_id);

        match (position, quantity) {
            (Some(i), 0) => {
                self.booking.selected_products.remove(i);
            }
            (Some(i), qty) => self.booking.selected_products[i].quantity = qty,
            (None, 0) => {}
            (None, qty) => self.booking.selected_products.push(ProductSelection {
                product_id,
                quantity: qty,
            }),
        }

        self.recompute();
        Ok(())
    }

    // ==========================================================================
    // SCHEDULING
    // ==========================================================================

    /// Starts a new slot fetch when both professional and date are known.
    /// The shown slots and the picked time are dropped right away.
    fn refresh_slots(&mut self) -> Option<SlotTicket> {
        let (Some(professional_id), Some(date)) = (self.booking.selected_barber_id, self.booking.selected_date) else {
            return None;
        };

        self.booking.selected_time = None;
        Some(self.slots.begin(AvailabilityQuery {
            professional_id,
            company_id: self.company_id(),
            date,
        }))
    }

    pub fn select_barber(&mut self, professional_id: EntityId) -> Result<Option<SlotTicket>, PortalError> {
        self.ensure_editable()?;
        if self.catalog.professional(professional_id).is_none() {
            return Err(PortalError::UnknownProfessional(professional_id));
        }

        self.booking.selected_barber_id = Some(professional_id);
        Ok(self.refresh_slots())
    }

    pub fn select_date(&mut self, date: NaiveDate) -> Result<Option<SlotTicket>, PortalError> {
        self.ensure_editable()?;
        if !self.window.iter().any(|option| option.date == date) {
            return Err(ScheduleError::DateOutOfWindow(date).into());
        }

        self.booking.selected_date = Some(date);
        Ok(self.refresh_slots())
    }

    /// Applies a finished slot fetch. Results of superseded fetches are
    /// dropped without touching the state.
    pub fn apply_slots(&mut self, ticket: &SlotTicket, result: Result<Vec<String>, String>) -> SlotOutcome {
        let outcome = self.slots.apply(ticket, result);

        match outcome {
            SlotOutcome::Stale => {}
            SlotOutcome::Loaded(_) => {
                self.booking.selected_time = self.slots.resolve_selection(self.booking.selected_time.as_deref());
            }
            SlotOutcome::Empty | SlotOutcome::Failed => {
                self.booking.selected_time = None;
            }
        }

        outcome
    }

    pub fn select_time(&mut self, time: &str) -> Result<(), PortalError> {
        self.ensure_editable()?;
        if !self.slots.offers(time) {
            return Err(ScheduleError::SlotNotOffered(time.to_string()).into());
        }

        self.booking.selected_time = Some(time.to_string());
        Ok(())
    }

    // ==========================================================================
    // NAVIGATION
    // ==========================================================================

    fn guard_leaving(&self, step: WizardStep) -> Result<(), PortalError> {
        let satisfied = match step {
            WizardStep::Service => !self.booking.selected_service_ids.is_empty(),
            WizardStep::Barber => self.booking.selected_barber_id.is_some(),
            WizardStep::Date => self.booking.selected_date.is_some() && self.booking.selected_time.is_some(),
            WizardStep::Products | WizardStep::Confirm => true,
        };

        if satisfied {
            return Ok(());
        }

        let message = match step {
            WizardStep::Service => SERVICE_REQUIRED,
            WizardStep::Barber => PROFESSIONAL_REQUIRED,
            _ => SCHEDULE_REQUIRED,
        };
        Err(PortalError::Validation(message.to_string()))
    }

    /// Moves to `target`. Forward jumps must pass the guard of every step
    /// they leave behind; a rejected move leaves the state untouched.
    /// Returns whether the active step changed.
    pub fn go_to(&mut self, target: WizardStep) -> Result<bool, PortalError> {
        if self.is_confirmed() {
            debug!("Booking confirmed, ignoring navigation to {:?}", target);
            return Ok(false);
        }

        let current = self.booking.active_step;
        if target > current {
            for step in WizardStep::ALL[current.index()..target.index()].iter().copied() {
                self.guard_leaving(step)?;
            }
        }

        self.booking.active_step = target;
        Ok(target != current)
    }

    pub fn next(&mut self) -> Result<bool, PortalError> {
        match self.booking.active_step.next() {
            Some(step) => self.go_to(step),
            None => Ok(false),
        }
    }

    pub fn back(&mut self) -> Result<bool, PortalError> {
        match self.booking.active_step.previous() {
            Some(step) => self.go_to(step),
            None => Ok(false),
        }
    }

    /// Back to the first step with nothing selected. Any slot fetch still in
    /// flight is invalidated.
    pub fn reset(&mut self) {
        self.booking = BookingState::default();
        self.customer = CustomerState::default();
        self.slots.invalidate();
        info!("Booking wizard reset for company {}", self.company_id());
    }

    // ==========================================================================
    // SUBMISSION
    // ==========================================================================

    /// Terminal state after the backend accepted the booking.
    pub fn confirm(&mut self, customer: Option<Customer>) {
        self.booking.active_step = WizardStep::Confirm;
        self.customer.confirm(customer);
        info!("Booking confirmed for company {}", self.company_id());
    }

    pub fn view(&self, session_id: Uuid, appointment: Option<&Appointment>) -> PortalView {
        PortalView {
            session_id,
            catalog: (*self.catalog).clone(),
            step: self.booking.active_step,
            booking: self.booking.clone(),
            customer: self.customer.clone(),
            slots: self.slots.clone(),
            available_dates: self.window.clone(),
            confirmed: self.is_confirmed(),
            appointment: appointment.cloned(),
        }
    }

    /// Packages the current selections and contact details for the public
    /// booking endpoint.
    pub fn build_portal_request(&self, utc_offset_minutes: i32) -> Result<PortalAppointmentRequest, PortalError> {
        self.guard_leaving(WizardStep::Service)?;
        self.guard_leaving(WizardStep::Barber)?;
        self.guard_leaving(WizardStep::Date)?;

        let (Some(professional_id), Some(date), Some(time)) = (
            self.booking.selected_barber_id,
            self.booking.selected_date,
            self.booking.selected_time.as_deref(),
        ) else {
            return Err(PortalError::Validation(SCHEDULE_REQUIRED.to_string()));
        };

        let scheduled_at = format_scheduled_at(merge_schedule(date, time, utc_offset_minutes)?);

        let stored = self.customer.customer_data.as_ref();
        let phone = stored
            .map(|c| c.phone.clone())
            .unwrap_or_else(|| self.customer.phone.clone());
        let name = stored
            .map(|c| c.name.clone())
            .unwrap_or_else(|| self.customer.name.trim().to_string());
        let email = stored
            .and_then(|c| c.email.clone())
            .or_else(|| self.customer.email_opt());

        if phone.is_empty() {
            return Err(PortalError::Validation(PHONE_REQUIRED.to_string()));
        }
        if name.is_empty() {
            return Err(PortalError::Validation(NAME_REQUIRED.to_string()));
        }

        let services = self
            .booking
            .selected_service_ids
            .iter()
            .map(|id| ServiceLine {
                service_id: *id,
                quantity: service_quantity(&self.booking, *id, self.per_service_quantity),
            })
            .collect();

        let products = self
            .booking
            .selected_products
            .iter()
            .map(|p| ProductLine {
                product_id: p.product_id,
                quantity: p.quantity,
            })
            .collect();

        Ok(PortalAppointmentRequest {
            company_id: self.company_id(),
            professional_id,
            services,
            products,
            scheduled_at,
            customer_phone: phone,
            customer_name: name,
            customer_email: email,
        })
    }
}
