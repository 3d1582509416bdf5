//! Diagnostic-support lookup: one free-text patient identifier.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::Paragraph,
    Frame,
};

use crate::tui::form::{FieldSet, FormPhase, TextField};
use crate::tui::route::Route;

use super::{centered, key_hints, render_fields, render_header, submit_button};

/// Lookup form state
pub struct LookupFormState {
    pub fields: FieldSet,
}

impl Default for LookupFormState {
    fn default() -> Self {
        Self {
            fields: FieldSet::new(vec![TextField::new("Patient ID", "e.g. P1001")]),
        }
    }
}

impl LookupFormState {
    pub fn input_char(&mut self, c: char) {
        self.fields.input_char(c);
    }

    pub fn delete_char(&mut self) {
        self.fields.delete_char();
    }

    pub fn clear_field(&mut self) {
        self.fields.clear_field();
    }

    /// Identifier with surrounding whitespace dropped. This is the value
    /// that lands in the `/patient/{id}/support` route, so `" P1001 "` and
    /// `"P1001"` reach the same record.
    #[must_use]
    pub fn patient_id(&self) -> &str {
        self.fields.value(0).trim()
    }

    /// The submit control is enabled only for a non-blank identifier.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.patient_id().is_empty()
    }

    /// Route for the entered identifier. Existence is resolved by the
    /// destination screen.
    #[must_use]
    pub fn submit(&self) -> Option<Route> {
        if !self.can_submit() {
            return None;
        }
        let route = Route::PatientSupport(self.patient_id().to_string());
        tracing::debug!(route = %route, "Patient lookup submitted");
        Some(route)
    }
}

/// Render the lookup screen
pub fn render_lookup(f: &mut Frame, area: Rect, state: &LookupFormState, user_label: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(2), // Hints
        ])
        .split(area);

    render_header(f, chunks[0], "Diagnostic Support", Some(user_label));

    let form_area = centered(chunks[1], 50, 6);
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1), Constraint::Min(0)])
        .split(form_area);

    render_fields(f, parts[0], &state.fields, true);
    let button = Paragraph::new(submit_button(
        "Open diagnostic support",
        "",
        &FormPhase::Idle,
        state.can_submit(),
    ))
    .alignment(Alignment::Center);
    f.render_widget(button, parts[1]);

    let hints: Line = key_hints(&[("Enter", "Open"), ("Del", "Clear"), ("Esc", "Back")]);
    f.render_widget(Paragraph::new(hints), chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_input(text: &str) -> LookupFormState {
        let mut state = LookupFormState::default();
        for c in text.chars() {
            state.input_char(c);
        }
        state
    }

    #[test]
    fn test_blank_input_does_not_navigate() {
        let state = with_input("   ");
        assert!(!state.can_submit());
        assert!(state.submit().is_none());

        assert!(LookupFormState::default().submit().is_none());
    }

    #[test]
    fn test_identifier_navigates_to_support() {
        let state = with_input("P1001");
        let route = state.submit().expect("Should navigate");
        assert_eq!(route.path(), "/patient/P1001/support");
    }

    #[test]
    fn test_identifier_is_trimmed() {
        let state = with_input("  P1002 ");
        assert_eq!(
            state.submit(),
            Some(Route::PatientSupport("P1002".to_string()))
        );
    }

    #[test]
    fn test_unknown_identifier_still_navigates() {
        let state = with_input("nobody");
        assert_eq!(
            state.submit().map(|r| r.path()),
            Some("/patient/nobody/support".to_string())
        );
    }
}
