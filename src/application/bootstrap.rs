//! Startup seeding of demo accounts.

use zeroize::Zeroizing;

use super::auth::{AuthService, SeedAccount};
use crate::domain::{ids, Role};
use crate::ports::UserStore;
use crate::ClinsightError;

/// Demo accounts: one per role. The patient account maps to directory
/// record `P1001`.
#[must_use]
pub fn demo_accounts() -> Vec<SeedAccount> {
    vec![
        SeedAccount {
            id: ids::uuid_v4(),
            name: "System Administrator".to_string(),
            email: "admin@clinsight.local".to_string(),
            username: "admin".to_string(),
            password: Zeroizing::new("admin".to_string()),
            role: Role::Admin,
        },
        SeedAccount {
            id: ids::uuid_v4(),
            name: "Dr. Elena Ruiz".to_string(),
            email: "elena.ruiz@clinsight.local".to_string(),
            username: "clinician".to_string(),
            password: Zeroizing::new("clinician".to_string()),
            role: Role::Clinician,
        },
        SeedAccount {
            id: "P1001".to_string(),
            name: "Maria Lopez".to_string(),
            email: "maria.lopez@example.com".to_string(),
            username: "patient".to_string(),
            password: Zeroizing::new("patient".to_string()),
            role: Role::Patient,
        },
    ]
}

/// Insert each missing account. Returns how many were created.
///
/// # Errors
/// Returns the first storage or hashing failure.
pub fn seed_accounts<S>(
    service: &AuthService<S>,
    accounts: &[SeedAccount],
) -> Result<usize, ClinsightError>
where
    S: UserStore,
    S::Error: Into<crate::adapters::StorageError>,
{
    let mut created = 0;
    for account in accounts {
        if service.ensure_account(account)? {
            created += 1;
        }
    }
    tracing::info!(created, total = accounts.len(), "Demo accounts checked");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::SqliteUserStore;
    use crate::ports::AuthContext;
    use std::sync::Arc;

    #[test]
    fn test_seed_then_sign_in_as_patient() {
        let store = Arc::new(SqliteUserStore::in_memory().expect("Should create db"));
        let mut service = AuthService::new(store.clone());

        let accounts = demo_accounts();
        assert_eq!(seed_accounts(&service, &accounts).expect("Should seed"), 3);
        assert_eq!(seed_accounts(&service, &accounts).expect("Should seed"), 0);
        assert_eq!(store.count_users().expect("Should count"), 3);

        assert!(service.authenticate("patient", "patient").success);
        let user = service.user().expect("Signed in");
        assert_eq!(user.id, "P1001");
        assert_eq!(user.role, Role::Patient);
    }

    #[test]
    fn test_seed_tolerates_self_registered_demo_email() {
        let store = Arc::new(SqliteUserStore::in_memory().expect("Should create db"));
        let mut service = AuthService::new(store.clone());
        let eve = crate::domain::RegistrationRequest::new(
            "Eve",
            "admin@clinsight.local",
            "eve",
            "pass1",
        );
        assert!(service.register_patient(eve).success);

        let created = seed_accounts(&service, &demo_accounts()).expect("Should start up");
        assert_eq!(created, 2);
        assert_eq!(store.count_users().expect("Should count"), 3);
    }
}
