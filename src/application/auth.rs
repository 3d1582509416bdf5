//! Auth service: session holder and credential operations.
//!
//! Every operation resolves to an `OperationResult`. Infrastructure failures
//! are logged and reported to the screen as a generic message; nothing here
//! panics or propagates past the screen.

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::domain::{
    credential::{self, meets_min_length},
    ids, OperationResult, RegistrationError, RegistrationRequest, Role, User,
};
use crate::ports::{AuthContext, UserStore};
use crate::ClinsightError;

/// Shown for unknown user and wrong password alike.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";
pub const NOT_SIGNED_IN: &str = "You must be signed in to change your password.";
pub const WRONG_CURRENT_PASSWORD: &str = "Current password is incorrect.";
pub const NEW_PASSWORD_TOO_SHORT: &str = "New password must be at least 4 characters.";
pub const SERVICE_UNAVAILABLE: &str = "Something went wrong. Please try again.";

/// Attempts at drawing a free patient id before giving up.
const PATIENT_ID_ATTEMPTS: usize = 8;

/// Account seeded at startup when missing.
#[derive(Clone)]
pub struct SeedAccount {
    pub id: String,
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: Zeroizing<String>,
    pub role: Role,
}

/// Session holder backed by a `UserStore`.
pub struct AuthService<S>
where
    S: UserStore,
{
    store: Arc<S>,
    session: Option<User>,
}

impl<S> AuthService<S>
where
    S: UserStore,
    S::Error: Into<crate::adapters::StorageError>,
{
    /// Create a service with no signed-in user.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            session: None,
        }
    }

    /// Insert `account` unless its username already exists.
    ///
    /// An account whose id or email is already held by someone else is
    /// skipped with a warning. Returns `true` if the account was created.
    ///
    /// # Errors
    /// Returns error if hashing or storage fails.
    pub fn ensure_account(&self, account: &SeedAccount) -> Result<bool, ClinsightError> {
        let storage = |e: S::Error| ClinsightError::Storage(e.into());

        if self.store.find_by_username(&account.username).map_err(storage)?.is_some() {
            return Ok(false);
        }
        if self.store.find_by_email(&account.email).map_err(storage)?.is_some()
            || self.store.find_by_id(&account.id).map_err(storage)?.is_some()
        {
            tracing::warn!(
                role = account.role.as_str(),
                "Seed account skipped: id or email belongs to another account"
            );
            return Ok(false);
        }

        let user = User {
            id: account.id.clone(),
            name: account.name.clone(),
            email: account.email.to_lowercase(),
            role: account.role,
            username: account.username.clone(),
            password: credential::hash_password(&account.password)?,
            created_at: chrono::Utc::now(),
        };
        if let Err(e) = self.store.insert_user(&user) {
            let err: crate::adapters::StorageError = e.into();
            return match err {
                crate::adapters::StorageError::Conflict(_) => {
                    tracing::warn!(role = user.role.as_str(), "Seed account skipped: conflict");
                    Ok(false)
                }
                other => Err(ClinsightError::Storage(other)),
            };
        }

        tracing::info!(role = user.role.as_str(), "Seeded account");
        Ok(true)
    }

    fn unavailable(context: &str, err: impl std::fmt::Display) -> OperationResult {
        tracing::error!("{context}: {err}");
        OperationResult::failure(SERVICE_UNAVAILABLE)
    }

    /// Draw a patient id not yet present in the store.
    fn allocate_patient_id(&self) -> Result<Option<String>, S::Error> {
        for _ in 0..PATIENT_ID_ATTEMPTS {
            let candidate = ids::patient_id();
            if self.store.find_by_id(&candidate)?.is_none() {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    fn try_register(&self, request: &RegistrationRequest) -> Result<User, OperationResult> {
        let fields = request
            .normalize()
            .map_err(|e| OperationResult::failure(e.to_string()))?;

        match self.store.find_by_username(&fields.username) {
            Ok(Some(_)) => {
                return Err(OperationResult::failure(
                    RegistrationError::UsernameTaken.to_string(),
                ))
            }
            Ok(None) => {}
            Err(e) => return Err(Self::unavailable("Username lookup failed", e)),
        }

        match self.store.find_by_email(&fields.email) {
            Ok(Some(_)) => {
                return Err(OperationResult::failure(
                    RegistrationError::EmailTaken.to_string(),
                ))
            }
            Ok(None) => {}
            Err(e) => return Err(Self::unavailable("Email lookup failed", e)),
        }

        let password = credential::hash_password(&request.password)
            .map_err(|e| Self::unavailable("Password hashing failed", e))?;

        let id = match self.allocate_patient_id() {
            Ok(Some(id)) => id,
            Ok(None) => {
                return Err(Self::unavailable(
                    "Patient id allocation failed",
                    "no free id after retries",
                ))
            }
            Err(e) => return Err(Self::unavailable("Patient id lookup failed", e)),
        };

        let user = User {
            id,
            name: fields.full_name,
            email: fields.email,
            role: Role::Patient,
            username: fields.username,
            password,
            created_at: chrono::Utc::now(),
        };

        if let Err(e) = self.store.insert_user(&user) {
            let err: crate::adapters::StorageError = e.into();
            return match err {
                // Lost a race with another registration for the same name/email.
                crate::adapters::StorageError::Conflict(_) => Err(OperationResult::failure(
                    "Username or email is already registered.",
                )),
                other => Err(Self::unavailable("Account insert failed", other)),
            };
        }

        Ok(user)
    }
}

impl<S> AuthContext for AuthService<S>
where
    S: UserStore,
    S::Error: Into<crate::adapters::StorageError>,
{
    fn user(&self) -> Option<&User> {
        self.session.as_ref()
    }

    fn register_patient(&mut self, request: RegistrationRequest) -> OperationResult {
        match self.try_register(&request) {
            Ok(_) => {
                tracing::info!("Registered new patient account");
                OperationResult::ok()
            }
            Err(result) => {
                tracing::warn!(
                    reason = result.error.as_deref().unwrap_or("unspecified"),
                    "Registration rejected"
                );
                result
            }
        }
    }

    fn authenticate(&mut self, username: &str, password: &str) -> OperationResult {
        let user = match self.store.find_by_username(username.trim()) {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!("Sign-in failed");
                return OperationResult::failure(INVALID_CREDENTIALS);
            }
            Err(e) => return Self::unavailable("User lookup failed", e),
        };

        match credential::verify_password(password, &user.password) {
            Ok(true) => {
                tracing::info!(role = user.role.as_str(), "Signed in");
                self.session = Some(user);
                OperationResult::ok()
            }
            Ok(false) => {
                tracing::warn!("Sign-in failed");
                OperationResult::failure(INVALID_CREDENTIALS)
            }
            Err(e) => Self::unavailable("Credential verification failed", e),
        }
    }

    fn change_password(&mut self, current: &str, new: &str) -> OperationResult {
        let Some(session_user) = self.session.as_ref() else {
            return OperationResult::failure(NOT_SIGNED_IN);
        };

        // The store is authoritative; the session copy may be stale.
        let stored = match self.store.find_by_id(&session_user.id) {
            Ok(Some(user)) => user,
            Ok(None) => return Self::unavailable("Session user missing", &session_user.id),
            Err(e) => return Self::unavailable("User lookup failed", e),
        };

        match credential::verify_password(current, &stored.password) {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!("Password change rejected: current password mismatch");
                return OperationResult::failure(WRONG_CURRENT_PASSWORD);
            }
            Err(e) => return Self::unavailable("Credential verification failed", e),
        }

        if !meets_min_length(new) {
            return OperationResult::failure(NEW_PASSWORD_TOO_SHORT);
        }

        let hash = match credential::hash_password(new) {
            Ok(hash) => hash,
            Err(e) => return Self::unavailable("Password hashing failed", e),
        };

        if let Err(e) = self.store.update_password(&stored.id, &hash) {
            return Self::unavailable("Password update failed", e);
        }

        self.session = Some(stored.with_password(hash));
        tracing::info!("Password changed");
        OperationResult::ok()
    }

    fn logout(&mut self) {
        if self.session.take().is_some() {
            tracing::info!("Signed out");
        }
    }
}
