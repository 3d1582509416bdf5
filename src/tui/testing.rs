//! Scripted `AuthContext` for screen tests.

use crate::domain::{OperationResult, PasswordHash, RegistrationRequest, Role, User};
use crate::ports::AuthContext;

/// Records calls and answers with a fixed result.
pub(crate) struct FakeAuth {
    pub session: Option<User>,
    pub answer: OperationResult,
    pub register_calls: Vec<RegistrationRequest>,
    pub authenticate_calls: usize,
    pub change_calls: Vec<(String, String)>,
}

impl FakeAuth {
    pub fn answering(answer: OperationResult) -> Self {
        Self {
            session: None,
            answer,
            register_calls: Vec::new(),
            authenticate_calls: 0,
            change_calls: Vec::new(),
        }
    }

    pub fn signed_in(user: User, answer: OperationResult) -> Self {
        Self {
            session: Some(user),
            ..Self::answering(answer)
        }
    }
}

impl AuthContext for FakeAuth {
    fn user(&self) -> Option<&User> {
        self.session.as_ref()
    }

    fn register_patient(&mut self, request: RegistrationRequest) -> OperationResult {
        self.register_calls.push(request);
        self.answer.clone()
    }

    fn authenticate(&mut self, username: &str, _password: &str) -> OperationResult {
        self.authenticate_calls += 1;
        if self.answer.success {
            self.session = Some(user(username, Role::Patient));
        }
        self.answer.clone()
    }

    fn change_password(&mut self, current: &str, new: &str) -> OperationResult {
        self.change_calls.push((current.to_string(), new.to_string()));
        self.answer.clone()
    }

    fn logout(&mut self) {
        self.session = None;
    }
}

/// Panics inside every credential operation, killing the worker.
pub(crate) struct PanickingAuth;

impl AuthContext for PanickingAuth {
    fn user(&self) -> Option<&User> {
        None
    }

    fn register_patient(&mut self, _request: RegistrationRequest) -> OperationResult {
        panic!("store exploded");
    }

    fn authenticate(&mut self, _username: &str, _password: &str) -> OperationResult {
        panic!("store exploded");
    }

    fn change_password(&mut self, _current: &str, _new: &str) -> OperationResult {
        panic!("store exploded");
    }

    fn logout(&mut self) {}
}

/// A user with a placeholder credential.
pub(crate) fn user(id: &str, role: Role) -> User {
    User {
        id: id.to_string(),
        name: "Maria Lopez".to_string(),
        email: "maria.lopez@example.com".to_string(),
        role,
        username: "maria".to_string(),
        password: PasswordHash::from_phc("$argon2id$v=19$placeholder"),
        created_at: chrono::Utc::now(),
    }
}
