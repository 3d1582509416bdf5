//! Result value returned by credential operations.

/// `{success, error?}` as seen by screens. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OperationResult {
    pub success: bool,
    pub error: Option<String>,
}

impl OperationResult {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// Failure with a user-facing message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }

    /// Failure without a message; screens substitute their own fallback.
    #[must_use]
    pub fn failure_silent() -> Self {
        Self {
            success: false,
            error: None,
        }
    }

    /// The error text, or `fallback` when none was supplied.
    #[must_use]
    pub fn error_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.error.as_deref().unwrap_or(fallback)
    }
}

impl<E: std::fmt::Display> From<Result<(), E>> for OperationResult {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}
