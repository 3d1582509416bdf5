//! Auth context port: the session boundary consumed by screens.
//!
//! Screens receive an implementation explicitly on every submit instead of
//! reaching for ambient session state.

use crate::domain::{OperationResult, RegistrationRequest, User};

/// Session holder and credential operations.
pub trait AuthContext {
    /// The currently signed-in user, if any.
    fn user(&self) -> Option<&User>;

    /// Create a patient account.
    fn register_patient(&mut self, request: RegistrationRequest) -> OperationResult;

    /// Sign in; on success the session user is replaced.
    fn authenticate(&mut self, username: &str, password: &str) -> OperationResult;

    /// Replace the session user's password after verifying the current one.
    fn change_password(&mut self, current: &str, new: &str) -> OperationResult;

    /// Clear the session.
    fn logout(&mut self);
}
