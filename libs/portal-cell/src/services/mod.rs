pub mod session;
pub mod store;
pub mod totals;
pub mod wizard;

pub use session::{PortalService, PortalSession};
pub use store::SessionStore;
pub use totals::{compute_totals, Totals};
pub use wizard::BookingWizard;
