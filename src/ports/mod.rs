//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (account storage, the
//! patient directory) and between screens and the session.

mod auth_context;
mod patient_directory;
mod user_store;

pub use auth_context::AuthContext;
pub use patient_directory::PatientDirectory;
pub use user_store::UserStore;
