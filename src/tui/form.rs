//! Shared form machinery: text fields, focus handling and the submission
//! state machine used by the credential screens.

use zeroize::Zeroize;

/// Local validation failures. `Display` is the banner text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Password must be at least 4 characters.")]
    PasswordTooShort,

    #[error("New password and confirmation do not match.")]
    NewPasswordMismatch,

    #[error("New password must be at least 4 characters.")]
    NewPasswordTooShort,
}

/// Submission lifecycle: `Idle → Submitting → {Success | Failed}`.
///
/// `Failed` is editable; `Success` ends the submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
    Success {
        message: String,
    },
    Failed {
        message: String,
    },
}

impl FormPhase {
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Error banner text, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Success banner text, if any.
    #[must_use]
    pub fn success(&self) -> Option<&str> {
        match self {
            Self::Success { message } => Some(message),
            _ => None,
        }
    }
}

/// Single-line text input.
#[derive(Debug, Clone)]
pub struct TextField {
    pub label: &'static str,
    pub hint: &'static str,
    pub value: String,
    /// Render as bullets
    pub masked: bool,
}

impl TextField {
    #[must_use]
    pub fn new(label: &'static str, hint: &'static str) -> Self {
        Self {
            label,
            hint,
            value: String::new(),
            masked: false,
        }
    }

    #[must_use]
    pub fn masked(label: &'static str, hint: &'static str) -> Self {
        Self {
            masked: true,
            ..Self::new(label, hint)
        }
    }

    /// Text to show for the current value.
    #[must_use]
    pub fn display_value(&self) -> String {
        if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    /// Wipe the buffer.
    pub fn wipe(&mut self) {
        self.value.zeroize();
    }
}

/// Ordered fields with a focus cursor.
#[derive(Debug, Clone)]
pub struct FieldSet {
    pub fields: Vec<TextField>,
    pub selected: usize,
}

impl FieldSet {
    #[must_use]
    pub fn new(fields: Vec<TextField>) -> Self {
        Self {
            fields,
            selected: 0,
        }
    }

    /// Move focus to the next field
    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.selected = (self.selected + 1) % self.fields.len();
        }
    }

    /// Move focus to the previous field
    pub fn prev_field(&mut self) {
        if self.selected == 0 {
            self.selected = self.fields.len().saturating_sub(1);
        } else {
            self.selected -= 1;
        }
    }

    /// Append a character to the focused field.
    pub fn input_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        if let Some(field) = self.fields.get_mut(self.selected) {
            field.value.push(c);
        }
    }

    /// Delete the last character of the focused field.
    pub fn delete_char(&mut self) {
        if let Some(field) = self.fields.get_mut(self.selected) {
            field.value.pop();
        }
    }

    /// Clear the focused field.
    pub fn clear_field(&mut self) {
        if let Some(field) = self.fields.get_mut(self.selected) {
            field.wipe();
        }
    }

    /// Value of field `index`, empty if out of range.
    #[must_use]
    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", |f| f.value.as_str())
    }

    /// Replace the value of field `index`.
    pub fn set_value(&mut self, index: usize, value: &str) {
        if let Some(field) = self.fields.get_mut(index) {
            field.wipe();
            field.value.push_str(value);
        }
    }

    /// Wipe every field and reset focus.
    pub fn wipe_all(&mut self) {
        for field in &mut self.fields {
            field.wipe();
        }
        self.selected = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_fields() -> FieldSet {
        FieldSet::new(vec![TextField::new("A", ""), TextField::masked("B", "")])
    }

    #[test]
    fn test_focus_wraps() {
        let mut set = two_fields();
        set.prev_field();
        assert_eq!(set.selected, 1);
        set.next_field();
        assert_eq!(set.selected, 0);
    }

    #[test]
    fn test_input_goes_to_focused_field() {
        let mut set = two_fields();
        set.input_char('x');
        set.next_field();
        set.input_char('y');
        set.input_char('\n');
        assert_eq!(set.value(0), "x");
        assert_eq!(set.value(1), "y");

        set.delete_char();
        assert_eq!(set.value(1), "");
    }

    #[test]
    fn test_masked_display() {
        let mut set = two_fields();
        set.set_value(1, "abc");
        assert_eq!(set.fields[1].display_value(), "•••");
        assert_eq!(set.value(1), "abc");
    }

    #[test]
    fn test_phase_accessors() {
        let failed = FormPhase::Failed {
            message: "bad".to_string(),
        };
        assert_eq!(failed.error(), Some("bad"));
        assert!(failed.success().is_none());
        assert!(FormPhase::Submitting.is_submitting());
        assert_eq!(FormError::PasswordMismatch.to_string(), "Passwords do not match.");
    }
}
