//! # ClinSight
//!
//! Terminal front-end for a small clinical application: patient sign-up,
//! sign-in, profile and password change, and a patient lookup that opens a
//! diagnostic-support view.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (User, Role, PatientRecord, credentials)
//! - `ports`: Trait definitions (UserStore, PatientDirectory, AuthContext)
//! - `adapters`: Concrete implementations (SQLite, in-memory directory, log sanitizing)
//! - `application`: The auth service holding the session
//! - `config`: Environment-driven settings
//! - `tui`: Terminal user interface, screens and form state machines

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{OperationResult, PatientRecord, RegistrationRequest, Role, User};

/// Result type for ClinSight operations
pub type Result<T> = std::result::Result<T, ClinsightError>;

/// Main error type for ClinSight
#[derive(Debug, thiserror::Error)]
pub enum ClinsightError {
    #[error("Storage operation failed: {0}")]
    Storage(#[from] adapters::StorageError),

    #[error("Credential operation failed: {0}")]
    Credential(#[from] domain::CredentialError),

    #[error("Patient directory error: {0}")]
    Directory(#[from] adapters::DirectoryError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
