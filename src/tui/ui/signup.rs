//! Patient sign-up form.

use std::time::Duration;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{credential::meets_min_length, OperationResult, RegistrationRequest};
use crate::ports::AuthContext;
use crate::tui::form::{FieldSet, FormError, FormPhase, TextField};
use crate::tui::route::{Navigation, Route};
use crate::tui::styles::MedicalTheme;

use super::{centered, render_fields, render_form_footer, render_header, submit_button};

/// Shown when registration fails without a message.
pub const REGISTRATION_FAILED: &str = "Registration failed.";

const FULL_NAME: usize = 0;
const EMAIL: usize = 1;
const USERNAME: usize = 2;
const PASSWORD: usize = 3;
const CONFIRM: usize = 4;

/// Sign-up form state
pub struct SignUpFormState {
    pub fields: FieldSet,
    pub phase: FormPhase,
}

impl Default for SignUpFormState {
    fn default() -> Self {
        Self {
            fields: FieldSet::new(vec![
                TextField::new("Full name", "e.g. Maria Lopez"),
                TextField::new("Email", "name@example.com"),
                TextField::new("Username", "3-32 letters, digits, . _ -"),
                TextField::masked("Password", "at least 4 characters"),
                TextField::masked("Confirm password", "repeat password"),
            ]),
            phase: FormPhase::Idle,
        }
    }
}

impl SignUpFormState {
    /// Whether keystrokes are accepted.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        !self.phase.is_submitting() && !self.phase.is_success()
    }

    pub fn next_field(&mut self) {
        self.fields.next_field();
    }

    pub fn prev_field(&mut self) {
        self.fields.prev_field();
    }

    pub fn input_char(&mut self, c: char) {
        if self.is_editable() {
            self.fields.input_char(c);
            self.on_edit();
        }
    }

    pub fn delete_char(&mut self) {
        if self.is_editable() {
            self.fields.delete_char();
            self.on_edit();
        }
    }

    pub fn clear_field(&mut self) {
        if self.is_editable() {
            self.fields.clear_field();
            self.on_edit();
        }
    }

    /// Any edit dismisses the error banner.
    fn on_edit(&mut self) {
        if self.phase.error().is_some() {
            self.phase = FormPhase::Idle;
        }
    }

    /// Local checks run before the registration call.
    ///
    /// # Errors
    /// `PasswordMismatch` or `PasswordTooShort`, in that order.
    pub fn validate(&self) -> Result<RegistrationRequest, FormError> {
        let password = self.fields.value(PASSWORD);
        if password != self.fields.value(CONFIRM) {
            return Err(FormError::PasswordMismatch);
        }
        if !meets_min_length(password) {
            return Err(FormError::PasswordTooShort);
        }
        Ok(RegistrationRequest::new(
            self.fields.value(FULL_NAME),
            self.fields.value(EMAIL),
            self.fields.value(USERNAME),
            password,
        ))
    }

    /// Start a submission.
    ///
    /// Returns the request to send, or `None` when a submission is already
    /// running, has succeeded, or local validation failed (the banner is
    /// set in that case).
    pub fn begin_submit(&mut self) -> Option<RegistrationRequest> {
        if !self.is_editable() {
            return None;
        }
        match self.validate() {
            Ok(request) => {
                self.phase = FormPhase::Submitting;
                Some(request)
            }
            Err(e) => {
                self.phase = FormPhase::Failed {
                    message: e.to_string(),
                };
                None
            }
        }
    }

    /// Apply the registration result. On success returns the deferred
    /// navigation to the sign-in screen.
    pub fn complete(&mut self, result: &OperationResult, delay: Duration) -> Option<Navigation> {
        if result.success {
            self.fields.set_value(PASSWORD, "");
            self.fields.set_value(CONFIRM, "");
            self.phase = FormPhase::Success {
                message: "Account created".to_string(),
            };
            Some(Navigation::after(Route::Login, delay))
        } else {
            self.phase = FormPhase::Failed {
                message: result.error_or(REGISTRATION_FAILED).to_string(),
            };
            None
        }
    }

    /// Validate, register through `auth` and apply the result in one step.
    pub fn submit<A: AuthContext + ?Sized>(
        &mut self,
        auth: &mut A,
        delay: Duration,
    ) -> Option<Navigation> {
        let request = self.begin_submit()?;
        let result = auth.register_patient(request);
        self.complete(&result, delay)
    }
}

/// Render the sign-up screen
pub fn render_signup(f: &mut Frame, area: Rect, state: &SignUpFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/banner
        ])
        .split(area);

    render_header(f, chunks[0], "Create patient account", None);

    if state.phase.is_success() {
        render_registered(f, chunks[1]);
    } else {
        let form_area = centered(chunks[1], 60, 19);
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(15), Constraint::Length(1), Constraint::Min(0)])
            .split(form_area);
        render_fields(f, parts[0], &state.fields, state.is_editable());
        let button = Paragraph::new(submit_button(
            "Create account",
            "Creating account…",
            &state.phase,
            true,
        ))
        .alignment(Alignment::Center);
        f.render_widget(button, parts[1]);
    }

    render_form_footer(
        f,
        chunks[2],
        &state.phase,
        &[
            ("Tab/↑↓", "Navigate"),
            ("Enter", "Create account"),
            ("Esc", "Back to sign in"),
        ],
    );
}

fn render_registered(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled("✓ Account created", MedicalTheme::banner_success())),
        Line::from(""),
        Line::from(Span::styled(
            "Redirecting you to sign in…",
            MedicalTheme::text_secondary(),
        )),
    ];
    let panel = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border_focused()),
    );
    f.render_widget(panel, centered(area, 50, 5));
}
