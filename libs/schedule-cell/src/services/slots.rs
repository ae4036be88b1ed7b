use serde::Serialize;
use tracing::{debug, warn};

use crate::models::{AvailabilityQuery, SlotOutcome, SlotTicket};

pub const NO_SLOTS_MESSAGE: &str = "No available times for this date, please choose another day";
pub const FETCH_FAILED_MESSAGE: &str = "Could not load available times, please try again";

/// The time-slot list shown for the current (professional, date) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotBoard {
    pub slots: Vec<String>,
    pub is_loading: bool,
    pub error: Option<String>,
    #[serde(skip)]
    generation: u64,
}

impl SlotBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the visible slots and starts a new fetch generation.
    pub fn begin(&mut self, query: AvailabilityQuery) -> SlotTicket {
        self.generation += 1;
        self.slots.clear();
        self.error = None;
        self.is_loading = true;

        debug!("Slot fetch #{} started for {:?}", self.generation, query);

        SlotTicket {
            generation: self.generation,
            query,
        }
    }

    /// Drops the slot list and invalidates any fetch still in flight.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.slots.clear();
        self.error = None;
        self.is_loading = false;
    }

    pub fn is_current(&self, ticket: &SlotTicket) -> bool {
        ticket.generation == self.generation
    }

    pub fn apply(&mut self, ticket: &SlotTicket, result: Result<Vec<String>, String>) -> SlotOutcome {
        if !self.is_current(ticket) {
            warn!(
                "Discarding stale slot response #{} (current #{})",
                ticket.generation, self.generation
            );
            return SlotOutcome::Stale;
        }

        self.is_loading = false;

        match result {
            Ok(slots) if slots.is_empty() => {
                self.slots.clear();
                self.error = Some(NO_SLOTS_MESSAGE.to_string());
                SlotOutcome::Empty
            }
            Ok(slots) => {
                let count = slots.len();
                self.slots = slots;
                self.error = None;
                SlotOutcome::Loaded(count)
            }
            Err(reason) => {
                warn!("Slot fetch #{} failed: {}", ticket.generation, reason);
                self.slots.clear();
                self.error = Some(FETCH_FAILED_MESSAGE.to_string());
                SlotOutcome::Failed
            }
        }
    }

    pub fn offers(&self, time: &str) -> bool {
        self.slots.iter().any(|slot| slot == time)
    }

    /// Keeps the current selection when it is still offered, otherwise
    /// falls back to the first slot.
    pub fn resolve_selection(&self, current: Option<&str>) -> Option<String> {
        match current {
            Some(time) if self.offers(time) => Some(time.to_string()),
            _ => self.slots.first().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn query(day: u32) -> AvailabilityQuery {
        AvailabilityQuery {
            professional_id: 7,
            company_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
        }
    }

    fn slots(times: &[&str]) -> Vec<String> {
        times.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_begin_clears_previous_slots() {
        let mut board = SlotBoard::new();
        let ticket = board.begin(query(10));
        board.apply(&ticket, Ok(slots(&["09:00", "09:30"])));
        assert_eq!(board.slots.len(), 2);

        board.begin(query(11));
        assert!(board.slots.is_empty());
        assert!(board.is_loading);
        assert!(board.error.is_none());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut board = SlotBoard::new();
        let first = board.begin(query(10));
        let second = board.begin(query(11));

        assert_eq!(board.apply(&first, Ok(slots(&["08:00"]))), SlotOutcome::Stale);
        assert!(board.slots.is_empty());
        assert!(board.is_loading);

        assert_eq!(board.apply(&second, Ok(slots(&["10:00"]))), SlotOutcome::Loaded(1));
        assert_eq!(board.slots, slots(&["10:00"]));
        assert!(!board.is_loading);
    }

    #[test]
    fn test_invalidate_makes_in_flight_tickets_stale() {
        let mut board = SlotBoard::new();
        let ticket = board.begin(query(10));
        board.invalidate();

        assert_eq!(board.apply(&ticket, Ok(slots(&["09:00"]))), SlotOutcome::Stale);
        assert!(!board.is_loading);
    }

    #[test]
    fn test_empty_and_failed_results_set_messages() {
        let mut board = SlotBoard::new();

        let ticket = board.begin(query(10));
        assert_eq!(board.apply(&ticket, Ok(vec![])), SlotOutcome::Empty);
        assert_eq!(board.error.as_deref(), Some(NO_SLOTS_MESSAGE));

        let ticket = board.begin(query(10));
        assert_eq!(board.apply(&ticket, Err("timeout".to_string())), SlotOutcome::Failed);
        assert_eq!(board.error.as_deref(), Some(FETCH_FAILED_MESSAGE));
        assert!(board.slots.is_empty());
    }

    #[test]
    fn test_resolve_selection() {
        let mut board = SlotBoard::new();
        let ticket = board.begin(query(10));
        board.apply(&ticket, Ok(slots(&["09:00", "09:30"])));

        assert_eq!(board.resolve_selection(None), Some("09:00".to_string()));
        assert_eq!(board.resolve_selection(Some("09:30")), Some("09:30".to_string()));
        assert_eq!(board.resolve_selection(Some("18:00")), Some("09:00".to_string()));
    }
}
