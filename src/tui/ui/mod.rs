//! UI module: screen state and view components for the TUI.

pub mod home;
pub mod login;
pub mod lookup;
pub mod profile;
pub mod signup;
pub mod support;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::form::{FieldSet, FormPhase};
use crate::tui::styles::{MedicalTheme, LOGO_SMALL};

/// Footer shown under every screen.
pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: Diagnostic support is advisory and does not replace professional medical evaluation.",
            MedicalTheme::text_muted(),
        )]),
        Line::from(vec![
            Span::styled("[Ctrl+Q] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

/// One-line screen header: product name, screen title and an optional
/// right-hand note (usually the signed-in user).
pub(crate) fn render_header(f: &mut Frame, area: Rect, title: &str, note: Option<&str>) {
    let mut spans = vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled(LOGO_SMALL, MedicalTheme::title()),
        Span::styled(" │ ", MedicalTheme::text_muted()),
        Span::styled(title.to_string(), MedicalTheme::subtitle()),
    ];
    if let Some(note) = note {
        spans.push(Span::styled(" │ ", MedicalTheme::text_muted()));
        spans.push(Span::styled(note.to_string(), MedicalTheme::text_secondary()));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

/// Stack of bordered input boxes, one per field, focused field highlighted.
pub(crate) fn render_fields(f: &mut Frame, area: Rect, set: &FieldSet, enabled: bool) {
    let constraints: Vec<Constraint> = set
        .fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in set.fields.iter().enumerate() {
        let is_selected = enabled && i == set.selected;
        let border_style = if is_selected {
            MedicalTheme::border_focused()
        } else {
            MedicalTheme::border()
        };
        let title_style = if is_selected {
            MedicalTheme::focused()
        } else {
            MedicalTheme::text_secondary()
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value_display = if field.value.is_empty() {
            Span::styled(field.hint, MedicalTheme::text_muted())
        } else {
            Span::styled(field.display_value(), MedicalTheme::text())
        };

        let content = Paragraph::new(Line::from(vec![
            Span::raw(" "),
            value_display,
            if is_selected {
                Span::styled("▌", MedicalTheme::cursor())
            } else {
                Span::raw("")
            },
        ]))
        .block(block);

        f.render_widget(content, chunks[i]);
    }
}

/// Error or success banner for a form phase, key hints otherwise.
pub(crate) fn render_form_footer(
    f: &mut Frame,
    area: Rect,
    phase: &FormPhase,
    hints: &[(&'static str, &'static str)],
) {
    let content = match phase {
        FormPhase::Failed { message } => Line::from(vec![
            Span::styled("! ", MedicalTheme::banner_error()),
            Span::styled(message.clone(), MedicalTheme::banner_error()),
        ]),
        FormPhase::Success { message } => Line::from(vec![
            Span::styled("✓ ", MedicalTheme::banner_success()),
            Span::styled(message.clone(), MedicalTheme::banner_success()),
        ]),
        FormPhase::Submitting => Line::from(Span::styled(
            "Working…",
            MedicalTheme::warning(),
        )),
        FormPhase::Idle => key_hints(hints),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

/// `[Key] Description` pairs on one line.
pub(crate) fn key_hints(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let spans: Vec<Span<'static>> = hints
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(format!("[{key}] "), MedicalTheme::key_hint()),
                Span::styled(format!("{desc} "), MedicalTheme::key_desc()),
            ]
        })
        .collect();
    Line::from(spans)
}

/// Submit button label, greyed while disabled.
pub(crate) fn submit_button(label: &str, busy_label: &str, phase: &FormPhase, enabled: bool) -> Line<'static> {
    if phase.is_submitting() {
        Line::from(Span::styled(format!("[ {busy_label} ]"), MedicalTheme::disabled()))
    } else if enabled {
        Line::from(Span::styled(format!("[ {label} ]"), MedicalTheme::selected()))
    } else {
        Line::from(Span::styled(format!("[ {label} ]"), MedicalTheme::disabled()))
    }
}

/// Centered rectangle of at most `width` x `height` inside `area`.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fits_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let inner = centered(area, 60, 20);
        assert_eq!(inner, Rect::new(20, 10, 60, 20));

        let clamped = centered(Rect::new(5, 5, 10, 4), 60, 20);
        assert_eq!(clamped, Rect::new(5, 5, 10, 4));
    }

    #[test]
    fn test_key_hints_layout() {
        let line = key_hints(&[("Enter", "Submit"), ("Esc", "Back")]);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "[Enter] Submit [Esc] Back ");
    }
}
