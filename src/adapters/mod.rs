//! Adapters layer: Concrete implementations of ports.
//!
//! - `sqlite`: SQLite account storage
//! - `directory`: in-memory patient directory
//! - `sanitize`: PII filtering for logs

pub mod directory;
pub mod sanitize;
pub mod sqlite;

pub use directory::{DirectoryError, InMemoryPatientDirectory};
pub use sqlite::{SqliteUserStore, StorageError};
