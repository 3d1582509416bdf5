//! Domain layer: Core business types and logic.
//!
//! Pure types with no I/O. Storage and presentation live behind ports.

pub mod credential;
pub mod ids;
mod outcome;
mod patient;
mod registration;
mod user;

pub use credential::{CredentialError, MIN_PASSWORD_LEN};
pub use outcome::OperationResult;
pub use patient::{PatientRecord, Sex};
pub use registration::{NormalizedRegistration, RegistrationError, RegistrationRequest};
pub use user::{PasswordHash, Role, User};
