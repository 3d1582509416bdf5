//! Patient self-registration request and its field rules.

use zeroize::Zeroizing;

use super::credential::meets_min_length;

/// Transient sign-up payload. Lives only for the duration of a submit.
#[derive(Clone)]
pub struct RegistrationRequest {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: Zeroizing<String>,
}

impl std::fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Rule violations detected before touching the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("Full name is required.")]
    MissingFullName,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Username must be 3-32 characters: letters, digits, '.', '_' or '-'.")]
    InvalidUsername,

    #[error("Password must be at least 4 characters.")]
    PasswordTooShort,

    #[error("Username is already taken.")]
    UsernameTaken,

    #[error("An account with this email already exists.")]
    EmailTaken,
}

/// Field values after trimming/normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRegistration {
    pub full_name: String,
    /// Lowercased
    pub email: String,
    pub username: String,
}

impl RegistrationRequest {
    /// Build a request from raw form values.
    #[must_use]
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Apply the format rules and return normalized field values.
    ///
    /// Uniqueness is checked by the auth service against the store.
    ///
    /// # Errors
    /// Returns the first rule that fails, in field order.
    pub fn normalize(&self) -> Result<NormalizedRegistration, RegistrationError> {
        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            return Err(RegistrationError::MissingFullName);
        }

        let email = self.email.trim();
        if !is_valid_email(email) {
            return Err(RegistrationError::InvalidEmail);
        }

        let username = self.username.trim();
        if !is_valid_username(username) {
            return Err(RegistrationError::InvalidUsername);
        }

        if !meets_min_length(&self.password) {
            return Err(RegistrationError::PasswordTooShort);
        }

        Ok(NormalizedRegistration {
            full_name: full_name.to_string(),
            email: email.to_lowercase(),
            username: username.to_string(),
        })
    }
}

/// Minimal structural email check: `local@domain.tld`, no whitespace.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// 3-32 characters from `[A-Za-z0-9._-]`.
#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (3..=32).contains(&len)
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, username: &str, password: &str) -> RegistrationRequest {
        RegistrationRequest::new(name, email, username, password)
    }

    #[test]
    fn test_normalize_trims_and_lowercases() {
        let normalized = request("  Jane Doe ", " Jane@Example.COM ", " jane.doe ", "pass")
            .normalize()
            .expect("Should normalize");

        assert_eq!(normalized.full_name, "Jane Doe");
        assert_eq!(normalized.email, "jane@example.com");
        assert_eq!(normalized.username, "jane.doe");
    }

    #[test]
    fn test_rules_apply_in_field_order() {
        let err = request(" ", "bad", "x", "1").normalize().unwrap_err();
        assert_eq!(err, RegistrationError::MissingFullName);

        let err = request("Jane", "bad", "x", "1").normalize().unwrap_err();
        assert_eq!(err, RegistrationError::InvalidEmail);

        let err = request("Jane", "j@x.io", "x", "1").normalize().unwrap_err();
        assert_eq!(err, RegistrationError::InvalidUsername);

        let err = request("Jane", "j@x.io", "jane", "1").normalize().unwrap_err();
        assert_eq!(err, RegistrationError::PasswordTooShort);
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@b.co."));
        assert!(!is_valid_email("a b@c.co"));
    }

    #[test]
    fn test_username_shapes() {
        assert!(is_valid_username("jd_01"));
        assert!(!is_valid_username("jd"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username(&"a".repeat(33)));
    }

    #[test]
    fn test_debug_hides_password() {
        let printed = format!("{:?}", request("Jane", "j@x.io", "jane", "hunter2"));
        assert!(!printed.contains("hunter2"));
    }
}
