//! Account types: users, roles and the stored credential.

use serde::{Deserialize, Serialize};

/// Closed set of account roles.
///
/// Role-specific screens dispatch on this enum rather than comparing
/// strings, so adding a role forces every `match` to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System administrator
    Admin,
    /// Clinician with access to diagnostic support
    Clinician,
    /// Patient with access to their own record
    Patient,
}

impl Role {
    /// Lowercase identifier used for storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Clinician => "clinician",
            Self::Patient => "patient",
        }
    }

    /// Capitalized label for display.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Clinician => "Clinician",
            Self::Patient => "Patient",
        }
    }

    /// Parse a stored role identifier.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "clinician" => Some(Self::Clinician),
            "patient" => Some(Self::Patient),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Argon2id PHC string for a user's password.
///
/// `Debug` never prints the hash.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already-computed PHC string.
    #[must_use]
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// The PHC string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash([REDACTED])")
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account identifier. For patients this is also the patient identifier
    /// used by the directory.
    pub id: String,

    /// Display name
    pub name: String,

    /// Contact email (stored lowercase)
    pub email: String,

    /// Account role
    pub role: Role,

    /// Login name (stored trimmed, matched case-insensitively)
    pub username: String,

    /// Stored credential
    pub password: PasswordHash,

    /// Account creation time
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// Whether this account belongs to a patient.
    #[must_use]
    pub fn is_patient(&self) -> bool {
        matches!(self.role, Role::Patient)
    }

    /// Copy of this user with a replaced credential.
    #[must_use]
    pub fn with_password(&self, password: PasswordHash) -> Self {
        Self {
            password,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip_through_storage_string() {
        for role in [Role::Admin, Role::Clinician, Role::Patient] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse(" Patient "), Some(Role::Patient));
        assert_eq!(Role::parse("nurse"), None);
    }

    #[test]
    fn test_password_hash_debug_is_redacted() {
        let hash = PasswordHash::from_phc("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA");
        let printed = format!("{hash:?}");
        assert!(!printed.contains("argon2id"));
        assert!(printed.contains("REDACTED"));
    }

    #[test]
    fn test_with_password_keeps_identity() {
        let user = User {
            id: "P1001".to_string(),
            name: "Maria Lopez".to_string(),
            email: "maria@example.com".to_string(),
            role: Role::Patient,
            username: "maria".to_string(),
            password: PasswordHash::from_phc("old"),
            created_at: chrono::Utc::now(),
        };

        let updated = user.with_password(PasswordHash::from_phc("new"));
        assert_eq!(updated.id, user.id);
        assert_eq!(updated.password.as_str(), "new");
        assert!(updated.is_patient());
    }
}
