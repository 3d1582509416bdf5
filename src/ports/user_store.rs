//! User store port: Trait for persistent account storage.
//!
//! This trait abstracts the storage backend (SQLite) from the auth service.

use crate::domain::{PasswordHash, User};

/// Trait for local account storage.
///
/// Lookups by username and email are case-insensitive.
pub trait UserStore: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert a new user.
    ///
    /// # Errors
    /// Returns error if the id, username or email is already present, or the
    /// storage operation fails.
    fn insert_user(&self, user: &User) -> Result<(), Self::Error>;

    /// Find a user by id.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn find_by_id(&self, id: &str) -> Result<Option<User>, Self::Error>;

    /// Find a user by username.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn find_by_username(&self, username: &str) -> Result<Option<User>, Self::Error>;

    /// Find a user by email.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn find_by_email(&self, email: &str) -> Result<Option<User>, Self::Error>;

    /// Replace the stored credential for `id`.
    ///
    /// # Errors
    /// Returns error if the user does not exist or storage fails.
    fn update_password(&self, id: &str, password: &PasswordHash) -> Result<(), Self::Error>;

    /// Total number of accounts.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn count_users(&self) -> Result<usize, Self::Error>;
}
