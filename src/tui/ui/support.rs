//! Diagnostic-support view for one patient.

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::PatientRecord;
use crate::ports::PatientDirectory;
use crate::tui::styles::MedicalTheme;

use super::{centered, key_hints, render_header};

/// What the view shows for the requested identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupportState {
    Found(PatientRecord),
    NotFound { id: String },
}

impl SupportState {
    /// Resolve `id` against the directory.
    pub fn resolve(directory: &dyn PatientDirectory, id: &str) -> Self {
        match directory.get_patient_by_id(id) {
            Some(record) => Self::Found(record),
            None => {
                tracing::info!("Patient lookup returned no record");
                Self::NotFound { id: id.to_string() }
            }
        }
    }
}

/// Label/value rows for a record.
#[must_use]
pub fn record_rows(record: &PatientRecord, today: NaiveDate) -> Vec<(&'static str, String)> {
    vec![
        ("Patient ID", record.id.clone()),
        ("MRN", record.mrn.clone()),
        ("Name", record.name.clone()),
        (
            "Born",
            format!("{} (age {})", record.date_of_birth, record.age_on(today)),
        ),
        ("Sex", record.sex.to_string()),
        (
            "Condition",
            record
                .primary_condition
                .clone()
                .unwrap_or_else(|| "None recorded".to_string()),
        ),
    ]
}

/// Render the support view
pub fn render_support(f: &mut Frame, area: Rect, state: &SupportState, user_label: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(2), // Hints
        ])
        .split(area);

    render_header(f, chunks[0], "Diagnostic Support", Some(user_label));

    let body = centered(chunks[1], 64, 10);
    match state {
        SupportState::Found(record) => {
            let today = chrono::Local::now().date_naive();
            let lines: Vec<Line> = record_rows(record, today)
                .into_iter()
                .map(|(label, value)| {
                    Line::from(vec![
                        Span::styled(format!("{label:<12}"), MedicalTheme::text_secondary()),
                        Span::styled(value, MedicalTheme::text()),
                    ])
                })
                .collect();
            let panel = Paragraph::new(lines).block(
                Block::default()
                    .title(Span::styled(" Patient summary ", MedicalTheme::subtitle()))
                    .borders(Borders::ALL)
                    .border_style(MedicalTheme::border_focused()),
            );
            f.render_widget(panel, body);
        }
        SupportState::NotFound { id } => {
            let text = vec![
                Line::from(Span::styled("Patient not found", MedicalTheme::banner_error())),
                Line::from(""),
                Line::from(Span::styled(
                    format!("No record matches identifier \"{id}\"."),
                    MedicalTheme::text_secondary(),
                )),
            ];
            let panel = Paragraph::new(text).wrap(Wrap { trim: true }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(MedicalTheme::border()),
            );
            f.render_widget(panel, body);
        }
    }

    f.render_widget(
        Paragraph::new(key_hints(&[("Esc", "New lookup"), ("H", "Home")])),
        chunks[2],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryPatientDirectory;

    #[test]
    fn test_resolve_known_and_unknown() {
        let directory = InMemoryPatientDirectory::demo();

        match SupportState::resolve(&directory, "P1001") {
            SupportState::Found(record) => assert_eq!(record.mrn, "MRN-204981"),
            other => panic!("Expected record, got {other:?}"),
        }
        assert_eq!(
            SupportState::resolve(&directory, "P0000"),
            SupportState::NotFound {
                id: "P0000".to_string()
            }
        );
    }

    #[test]
    fn test_record_rows() {
        let directory = InMemoryPatientDirectory::demo();
        let record = directory.get_patient_by_id("P1001").expect("Should exist");
        let today = NaiveDate::from_ymd_opt(2024, 4, 12).expect("Valid date");

        let rows = record_rows(&record, today);
        assert_eq!(rows[1], ("MRN", "MRN-204981".to_string()));
        assert_eq!(rows[3], ("Born", "1968-04-12 (age 56)".to_string()));
    }
}
