pub mod contact_store;
pub mod customer;
pub mod identity;
pub mod validation;
pub mod verification;

pub use contact_store::{contact_store_for, ContactStore, FileContactStore, MemoryContactStore};
pub use customer::CustomerService;
pub use identity::IdentityResolver;
pub use verification::{verifier_for, BackendSmsVerifier, SimulatedSmsVerifier, SmsVerifier};
