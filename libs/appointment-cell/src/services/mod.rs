pub mod schedule;
pub mod submission;

pub use schedule::{format_scheduled_at, merge_schedule};
pub use submission::AppointmentService;
