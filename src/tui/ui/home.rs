//! Home menu shown after sign-in.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::tui::route::Route;
use crate::tui::styles::MedicalTheme;

use super::{centered, key_hints, render_header};

/// Menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeAction {
    DiagnosticSupport,
    Profile,
    SignOut,
}

impl HomeAction {
    pub const ALL: [Self; 3] = [Self::DiagnosticSupport, Self::Profile, Self::SignOut];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::DiagnosticSupport => "Diagnostic support lookup",
            Self::Profile => "Profile & password",
            Self::SignOut => "Sign out",
        }
    }

    /// Shortcut key
    #[must_use]
    pub fn key(self) -> char {
        match self {
            Self::DiagnosticSupport => 'd',
            Self::Profile => 'p',
            Self::SignOut => 'o',
        }
    }

    /// Destination route; sign-out lands on the login screen.
    #[must_use]
    pub fn route(self) -> Route {
        match self {
            Self::DiagnosticSupport => Route::DiagnosticSupport,
            Self::Profile => Route::Profile,
            Self::SignOut => Route::Login,
        }
    }

    #[must_use]
    pub fn from_key(c: char) -> Option<Self> {
        let c = c.to_ascii_lowercase();
        Self::ALL.into_iter().find(|a| a.key() == c)
    }
}

#[derive(Debug, Default)]
pub struct HomeState {
    pub selected: usize,
}

impl HomeState {
    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % HomeAction::ALL.len();
    }

    pub fn prev(&mut self) {
        self.selected = self
            .selected
            .checked_sub(1)
            .unwrap_or(HomeAction::ALL.len() - 1);
    }

    #[must_use]
    pub fn current(&self) -> HomeAction {
        HomeAction::ALL[self.selected % HomeAction::ALL.len()]
    }
}

/// Render the home menu
pub fn render_home(f: &mut Frame, area: Rect, state: &HomeState, user_label: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Menu
            Constraint::Length(2), // Hints
        ])
        .split(area);

    render_header(f, chunks[0], "Home", Some(user_label));

    let items: Vec<ListItem> = HomeAction::ALL
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let style = if i == state.selected {
                MedicalTheme::selected()
            } else {
                MedicalTheme::text()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" [{}] ", action.key().to_ascii_uppercase()), MedicalTheme::key_hint()),
                Span::styled(action.label(), style),
            ]))
        })
        .collect();

    let menu = List::new(items).block(
        Block::default()
            .title(Span::styled(" Menu ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(menu, centered(chunks[1], 44, 5));

    f.render_widget(
        Paragraph::new(key_hints(&[("↑↓", "Select"), ("Enter", "Open"), ("Q", "Quit")])),
        chunks[2],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_wraps() {
        let mut state = HomeState::default();
        state.prev();
        assert_eq!(state.current(), HomeAction::SignOut);
        state.next();
        assert_eq!(state.current(), HomeAction::DiagnosticSupport);
    }

    #[test]
    fn test_shortcuts() {
        assert_eq!(HomeAction::from_key('D'), Some(HomeAction::DiagnosticSupport));
        assert_eq!(HomeAction::from_key('p').map(HomeAction::route), Some(Route::Profile));
        assert_eq!(HomeAction::from_key('z'), None);
    }
}
