//! Background worker for credential operations.
//!
//! Argon2 hashing takes long enough to freeze the interface, so submits run
//! on a worker thread and the main loop polls for the result.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use zeroize::Zeroizing;

use crate::domain::{OperationResult, RegistrationRequest};
use crate::ports::AuthContext;

/// One credential operation.
pub enum CredentialJob {
    Register(RegistrationRequest),
    Authenticate {
        username: String,
        password: Zeroizing<String>,
    },
    ChangePassword {
        current: Zeroizing<String>,
        new: Zeroizing<String>,
    },
}

impl CredentialJob {
    fn name(&self) -> &'static str {
        match self {
            Self::Register(_) => "register",
            Self::Authenticate { .. } => "authenticate",
            Self::ChangePassword { .. } => "change_password",
        }
    }
}

/// Handle to a running credential job.
pub struct CredentialWorkerHandle {
    result_rx: Receiver<OperationResult>,
    _handle: JoinHandle<()>,
}

impl CredentialWorkerHandle {
    /// Non-blocking check for the result. A worker that died without
    /// answering yields a silent failure, as in `wait`.
    #[must_use]
    pub fn try_recv(&self) -> Option<OperationResult> {
        match self.result_rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::error!("Credential worker exited without a result");
                Some(OperationResult::failure_silent())
            }
        }
    }

    /// Block until the job finishes. A worker that died without answering
    /// yields a silent failure.
    #[must_use]
    pub fn wait(self) -> OperationResult {
        self.result_rx
            .recv()
            .unwrap_or_else(|_| OperationResult::failure_silent())
    }
}

/// Runs credential jobs off the UI thread.
pub struct CredentialWorker;

impl CredentialWorker {
    /// Spawn `job` against the shared auth context.
    pub fn spawn<A>(auth: Arc<Mutex<A>>, job: CredentialJob) -> CredentialWorkerHandle
    where
        A: AuthContext + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run(&auth, job, &tx);
        });

        CredentialWorkerHandle {
            result_rx: rx,
            _handle: handle,
        }
    }

    fn run<A: AuthContext>(auth: &Mutex<A>, job: CredentialJob, tx: &Sender<OperationResult>) {
        let name = job.name();
        tracing::debug!(job = name, "Credential job started");

        let result = match auth.lock() {
            Ok(mut ctx) => match job {
                CredentialJob::Register(request) => ctx.register_patient(request),
                CredentialJob::Authenticate { username, password } => {
                    ctx.authenticate(&username, &password)
                }
                CredentialJob::ChangePassword { current, new } => {
                    ctx.change_password(&current, &new)
                }
            },
            Err(_) => {
                tracing::error!(job = name, "Auth context lock poisoned");
                OperationResult::failure_silent()
            }
        };

        tracing::debug!(job = name, success = result.success, "Credential job finished");
        // The receiver is gone if the screen was left; nothing to report then.
        let _ = tx.send(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::testing::{FakeAuth, PanickingAuth};

    #[test]
    fn test_register_job_reaches_context() {
        let auth = Arc::new(Mutex::new(FakeAuth::answering(OperationResult::ok())));
        let job = CredentialJob::Register(RegistrationRequest::new("Jane", "j@x.io", "jane", "abcd"));

        let result = CredentialWorker::spawn(auth.clone(), job).wait();
        assert!(result.success);

        let ctx = auth.lock().expect("Should lock");
        assert_eq!(ctx.register_calls.len(), 1);
    }

    #[test]
    fn test_change_password_job_passes_values() {
        let auth = Arc::new(Mutex::new(FakeAuth::answering(OperationResult::failure("nope"))));
        let job = CredentialJob::ChangePassword {
            current: Zeroizing::new("old1".to_string()),
            new: Zeroizing::new("new1".to_string()),
        };

        let result = CredentialWorker::spawn(auth.clone(), job).wait();
        assert_eq!(result.error.as_deref(), Some("nope"));

        let ctx = auth.lock().expect("Should lock");
        assert_eq!(ctx.change_calls, vec![("old1".to_string(), "new1".to_string())]);
    }

    #[test]
    fn test_dead_worker_reports_failure() {
        let auth = Arc::new(Mutex::new(PanickingAuth));
        let job = CredentialJob::Register(RegistrationRequest::new("Jane", "j@x.io", "jane", "abcd"));
        let handle = CredentialWorker::spawn(auth, job);

        let mut result = None;
        for _ in 0..500 {
            result = handle.try_recv();
            if result.is_some() {
                break;
            }
            thread::sleep(std::time::Duration::from_millis(10));
        }

        let result = result.expect("Should resolve after the worker dies");
        assert!(!result.success);
        assert!(result.error.is_none());
    }
}
