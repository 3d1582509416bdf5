//! Profile view and password change form.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroizing;

use crate::domain::{credential::meets_min_length, OperationResult, Role, User};
use crate::ports::{AuthContext, PatientDirectory};
use crate::tui::form::{FieldSet, FormError, FormPhase, TextField};
use crate::tui::styles::MedicalTheme;

use super::{render_fields, render_form_footer, render_header, submit_button};

pub const PASSWORD_UPDATED: &str = "Password updated successfully.";

/// Shown when the change fails without a message.
pub const PASSWORD_UPDATE_FAILED: &str = "Failed to update password.";

const CURRENT: usize = 0;
const NEW: usize = 1;
const CONFIRM: usize = 2;

/// Plaintext pair handed to the change-password call.
pub struct PasswordChange {
    pub current: Zeroizing<String>,
    pub new: Zeroizing<String>,
}

/// Password change form state
pub struct PasswordFormState {
    pub fields: FieldSet,
    pub phase: FormPhase,
}

impl Default for PasswordFormState {
    fn default() -> Self {
        Self {
            fields: FieldSet::new(vec![
                TextField::masked("Current password", ""),
                TextField::masked("New password", "at least 4 characters"),
                TextField::masked("Confirm new password", "repeat new password"),
            ]),
            phase: FormPhase::Idle,
        }
    }
}

impl PasswordFormState {
    pub fn next_field(&mut self) {
        self.fields.next_field();
    }

    pub fn prev_field(&mut self) {
        self.fields.prev_field();
    }

    pub fn input_char(&mut self, c: char) {
        if !self.phase.is_submitting() {
            self.fields.input_char(c);
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

    /// Local checks run before the change-password call.
    ///
    /// # Errors
    /// `NewPasswordMismatch` or `NewPasswordTooShort`, in that order.
    pub fn validate(&self) -> Result<PasswordChange, FormError> {
        let new = self.fields.value(NEW);
        if new != self.fields.value(CONFIRM) {
            return Err(FormError::NewPasswordMismatch);
        }
        if !meets_min_length(new) {
            return Err(FormError::NewPasswordTooShort);
        }
        Ok(PasswordChange {
            current: Zeroizing::new(self.fields.value(CURRENT).to_string()),
            new: Zeroizing::new(new.to_string()),
        })
    }

    /// Start a submission. The previous banner is dismissed first.
    ///
    /// Returns `None` while a request is in flight or when local
    /// validation fails.
    pub fn begin_submit(&mut self) -> Option<PasswordChange> {
        if self.phase.is_submitting() {
            return None;
        }
        self.phase = FormPhase::Idle;
        match self.validate() {
            Ok(change) => {
                self.phase = FormPhase::Submitting;
                Some(change)
            }
            Err(e) => {
                self.phase = FormPhase::Failed {
                    message: e.to_string(),
                };
                None
            }
        }
    }

    /// Apply the result. Fields are wiped only on success.
    pub fn complete(&mut self, result: &OperationResult) {
        if result.success {
            self.fields.wipe_all();
            self.phase = FormPhase::Success {
                message: PASSWORD_UPDATED.to_string(),
            };
        } else {
            self.phase = FormPhase::Failed {
                message: result.error_or(PASSWORD_UPDATE_FAILED).to_string(),
            };
        }
    }

    /// Validate, call `auth` and apply the result in one step.
    pub fn submit<A: AuthContext + ?Sized>(&mut self, auth: &mut A) {
        if let Some(change) = self.begin_submit() {
            let result = auth.change_password(&change.current, &change.new);
            self.complete(&result);
        }
    }
}

/// Label/value rows describing the account.
///
/// Patients also get their Patient ID and, when the directory knows them,
/// their MRN.
pub fn account_rows(user: &User, directory: &dyn PatientDirectory) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Name", user.name.clone()),
        ("Email", user.email.clone()),
        ("Role", user.role.label().to_string()),
    ];

    match user.role {
        Role::Patient => {
            rows.push(("Patient ID", user.id.clone()));
            if let Some(record) = directory.get_patient_by_id(&user.id) {
                rows.push(("MRN", record.mrn));
            }
        }
        Role::Admin | Role::Clinician => {}
    }

    rows
}

/// Render the profile screen
pub fn render_profile(
    f: &mut Frame,
    area: Rect,
    rows: &[(&'static str, String)],
    state: &PasswordFormState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer/banner
        ])
        .split(area);

    render_header(f, chunks[0], "Profile", None);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .margin(1)
        .split(chunks[1]);

    render_account(f, columns[0], rows);
    render_password_form(f, columns[1], state);

    render_form_footer(
        f,
        chunks[2],
        &state.phase,
        &[
            ("Tab/↑↓", "Navigate"),
            ("Enter", "Update password"),
            ("Esc", "Back"),
        ],
    );
}

fn render_account(f: &mut Frame, area: Rect, rows: &[(&'static str, String)]) {
    let lines: Vec<Line> = rows
        .iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label:<12}"), MedicalTheme::text_secondary()),
                Span::styled(value.clone(), MedicalTheme::text()),
            ])
        })
        .collect();

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(" Account ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(panel, area);
}

fn render_password_form(f: &mut Frame, area: Rect, state: &PasswordFormState) {
    let block = Block::default()
        .title(Span::styled(" Change password ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Length(1), Constraint::Min(0)])
        .margin(1)
        .split(inner);

    render_fields(f, parts[0], &state.fields, !state.phase.is_submitting());
    let button = Paragraph::new(submit_button(
        "Update password",
        "Updating…",
        &state.phase,
        true,
    ))
    .alignment(Alignment::Center);
    f.render_widget(button, parts[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryPatientDirectory;
    use crate::tui::testing::{user, FakeAuth};

    fn filled(current: &str, new: &str, confirm: &str) -> PasswordFormState {
        let mut state = PasswordFormState::default();
        state.fields.set_value(CURRENT, current);
        state.fields.set_value(NEW, new);
        state.fields.set_value(CONFIRM, confirm);
        state
    }

    fn signed_in(answer: OperationResult) -> FakeAuth {
        FakeAuth::signed_in(user("P1001", Role::Patient), answer)
    }

    #[test]
    fn test_mismatch_does_not_call_service() {
        let mut auth = signed_in(OperationResult::ok());
        let mut state = filled("old1", "newpass", "newpasz");

        state.submit(&mut auth);
        assert!(auth.change_calls.is_empty());
        assert_eq!(
            state.phase.error(),
            Some("New password and confirmation do not match.")
        );
    }

    #[test]
    fn test_short_new_password_does_not_call_service() {
        let mut auth = signed_in(OperationResult::ok());
        let mut state = filled("old1", "abc", "abc");

        state.submit(&mut auth);
        assert!(auth.change_calls.is_empty());
        assert_eq!(
            state.phase.error(),
            Some("New password must be at least 4 characters.")
        );
    }

    #[test]
    fn test_success_clears_all_fields() {
        let mut auth = signed_in(OperationResult::ok());
        let mut state = filled("old1", "newpass", "newpass");

        state.submit(&mut auth);
        assert_eq!(auth.change_calls, vec![("old1".to_string(), "newpass".to_string())]);
        assert_eq!(state.phase.success(), Some(PASSWORD_UPDATED));
        for i in 0..3 {
            assert_eq!(state.fields.value(i), "");
        }
    }

    #[test]
    fn test_failure_keeps_fields() {
        let mut auth = signed_in(OperationResult::failure("Current password is incorrect."));
        let mut state = filled("wrong", "newpass", "newpass");

        state.submit(&mut auth);
        assert_eq!(state.phase.error(), Some("Current password is incorrect."));
        assert_eq!(state.fields.value(CURRENT), "wrong");
        assert_eq!(state.fields.value(NEW), "newpass");
        assert_eq!(state.fields.value(CONFIRM), "newpass");
    }

    #[test]
    fn test_failure_without_message_uses_fallback() {
        let mut auth = signed_in(OperationResult::failure_silent());
        let mut state = filled("old1", "newpass", "newpass");

        state.submit(&mut auth);
        assert_eq!(state.phase.error(), Some(PASSWORD_UPDATE_FAILED));
    }

    #[test]
    fn test_resubmit_ignored_while_in_flight() {
        let mut state = filled("old1", "newpass", "newpass");
        assert!(state.begin_submit().is_some());
        assert!(state.begin_submit().is_none());
        assert!(state.phase.is_submitting());
    }

    #[test]
    fn test_patient_rows_include_mrn() {
        let directory = InMemoryPatientDirectory::demo();
        let rows = account_rows(&user("P1001", Role::Patient), &directory);

        assert!(rows.contains(&("Role", "Patient".to_string())));
        assert!(rows.contains(&("Patient ID", "P1001".to_string())));
        assert!(rows.contains(&("MRN", "MRN-204981".to_string())));
    }

    #[test]
    fn test_patient_unknown_to_directory_has_no_mrn() {
        let directory = InMemoryPatientDirectory::demo();
        let rows = account_rows(&user("P999999", Role::Patient), &directory);

        assert!(rows.contains(&("Patient ID", "P999999".to_string())));
        assert!(!rows.iter().any(|(label, _)| *label == "MRN"));
    }

    #[test]
    fn test_staff_rows_have_no_patient_fields() {
        let directory = InMemoryPatientDirectory::demo();
        let rows = account_rows(&user("P1001", Role::Clinician), &directory);

        assert_eq!(rows.len(), 3);
        assert!(rows.contains(&("Role", "Clinician".to_string())));
    }
}
