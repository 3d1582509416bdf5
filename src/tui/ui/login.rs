//! Sign-in form.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use zeroize::Zeroizing;

use crate::domain::OperationResult;
use crate::ports::AuthContext;
use crate::tui::form::{FieldSet, FormPhase, TextField};
use crate::tui::route::Route;
use crate::tui::styles::{MedicalTheme, LOGO};

use super::{centered, render_fields, render_form_footer, submit_button};

/// Shown when sign-in fails without a message.
pub const SIGN_IN_FAILED: &str = "Sign in failed.";

const USERNAME: usize = 0;
const PASSWORD: usize = 1;

/// Credentials handed to `authenticate`.
pub struct Credentials {
    pub username: String,
    pub password: Zeroizing<String>,
}

/// Login form state
pub struct LoginFormState {
    pub fields: FieldSet,
    pub phase: FormPhase,
}

impl Default for LoginFormState {
    fn default() -> Self {
        Self {
            fields: FieldSet::new(vec![
                TextField::new("Username", ""),
                TextField::masked("Password", ""),
            ]),
            phase: FormPhase::Idle,
        }
    }
}

impl LoginFormState {
    pub fn next_field(&mut self) {
        self.fields.next_field();
    }

    pub fn prev_field(&mut self) {
        self.fields.prev_field();
    }

    pub fn input_char(&mut self, c: char) {
        if !self.phase.is_submitting() {
            self.fields.input_char(c);
            if self.phase.error().is_some() {
                self.phase = FormPhase::Idle;
            }
        }
    }

    pub fn delete_char(&mut self) {
        if !self.phase.is_submitting() {
            self.fields.delete_char();
        }
    }

    pub fn clear_field(&mut self) {
        if !self.phase.is_submitting() {
            self.fields.clear_field();
        }
    }

    /// Start a sign-in attempt. Blank usernames are not submitted.
    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if self.phase.is_submitting() {
            return None;
        }
        let username = self.fields.value(USERNAME).trim();
        if username.is_empty() {
            self.phase = FormPhase::Failed {
                message: "Enter your username.".to_string(),
            };
            return None;
        }
        let credentials = Credentials {
            username: username.to_string(),
            password: Zeroizing::new(self.fields.value(PASSWORD).to_string()),
        };
        self.phase = FormPhase::Submitting;
        Some(credentials)
    }

    /// Apply the result. The password buffer is wiped either way.
    pub fn complete(&mut self, result: &OperationResult) -> Option<Route> {
        self.fields.set_value(PASSWORD, "");
        if result.success {
            self.fields.wipe_all();
            self.phase = FormPhase::Idle;
            Some(Route::Home)
        } else {
            self.phase = FormPhase::Failed {
                message: result.error_or(SIGN_IN_FAILED).to_string(),
            };
            None
        }
    }

    /// Authenticate through `auth` and apply the result in one step.
    pub fn submit<A: AuthContext + ?Sized>(&mut self, auth: &mut A) -> Option<Route> {
        let credentials = self.begin_submit()?;
        let result = auth.authenticate(&credentials.username, &credentials.password);
        self.complete(&result)
    }
}

/// Render the sign-in screen
pub fn render_login(f: &mut Frame, area: Rect, state: &LoginFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let panel = centered(chunks[0], 50, 16);
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Logo
            Constraint::Length(1), // Tagline
            Constraint::Length(7), // Fields
            Constraint::Length(1), // Button
            Constraint::Min(0),
        ])
        .split(panel);

    let logo: Vec<Line> = LOGO
        .lines()
        .map(|l| Line::from(Span::styled(l, MedicalTheme::subtitle())))
        .collect();
    f.render_widget(Paragraph::new(logo).alignment(Alignment::Center), parts[0]);
    f.render_widget(
        Paragraph::new(Span::styled(
            "Clinical decision support",
            MedicalTheme::text_secondary(),
        ))
        .alignment(Alignment::Center),
        parts[1],
    );

    render_fields(f, parts[2], &state.fields, !state.phase.is_submitting());
    let button = Paragraph::new(submit_button("Sign in", "Signing in…", &state.phase, true))
        .alignment(Alignment::Center);
    f.render_widget(button, parts[3]);

    render_form_footer(
        f,
        chunks[1],
        &state.phase,
        &[("Tab/↑↓", "Navigate"), ("Enter", "Sign in"), ("F2", "Create account")],
    );
}
