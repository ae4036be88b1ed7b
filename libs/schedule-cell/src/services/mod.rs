pub mod availability;
pub mod calendar;
pub mod slots;

pub use availability::AvailabilityService;
pub use calendar::booking_window;
pub use slots::SlotBoard;
