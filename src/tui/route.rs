//! Screen routes and deferred navigation.

use std::time::{Duration, Instant};

/// A screen address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    SignUp,
    Home,
    Profile,
    /// Patient lookup form
    DiagnosticSupport,
    /// Diagnostic-support view for one patient identifier
    PatientSupport(String),
}

impl Route {
    /// Path form, e.g. `/patient/P1001/support`.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::SignUp => "/signup".to_string(),
            Self::Home => "/".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::DiagnosticSupport => "/diagnostic-support".to_string(),
            Self::PatientSupport(id) => format!("/patient/{id}/support"),
        }
    }

    /// Whether the screen needs a signed-in user.
    #[must_use]
    pub fn requires_session(&self) -> bool {
        !matches!(self, Self::Login | Self::SignUp)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Navigation request emitted by a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    pub delay: Duration,
}

impl Navigation {
    #[must_use]
    pub fn now(route: Route) -> Self {
        Self {
            route,
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn after(route: Route, delay: Duration) -> Self {
        Self { route, delay }
    }
}

/// Holds at most one deferred navigation. A newer request replaces it.
#[derive(Debug, Default)]
pub struct Navigator {
    pending: Option<(Route, Instant)>,
}

impl Navigator {
    /// Schedule `nav` relative to `now`. Returns the route immediately when
    /// there is no delay.
    pub fn request(&mut self, nav: Navigation, now: Instant) -> Option<Route> {
        if nav.delay.is_zero() {
            self.pending = None;
            return Some(nav.route);
        }
        tracing::debug!(route = %nav.route, delay_ms = u64::try_from(nav.delay.as_millis()).unwrap_or(u64::MAX), "Navigation scheduled");
        self.pending = Some((nav.route, now + nav.delay));
        None
    }

    /// Returns the pending route once its deadline has passed.
    pub fn tick(&mut self, now: Instant) -> Option<Route> {
        match &self.pending {
            Some((_, due)) if now >= *due => self.pending.take().map(|(route, _)| route),
            _ => None,
        }
    }

    /// Drop any pending navigation.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub fn pending(&self) -> Option<&Route> {
        self.pending.as_ref().map(|(route, _)| route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let expected = [
            (Route::Login, "/login"),
            (Route::SignUp, "/signup"),
            (Route::Home, "/"),
            (Route::Profile, "/profile"),
            (Route::DiagnosticSupport, "/diagnostic-support"),
            (Route::PatientSupport("P1001".to_string()), "/patient/P1001/support"),
        ];
        for (route, path) in expected {
            assert_eq!(route.path(), path);
            assert_eq!(route.to_string(), path);
        }
    }

    #[test]
    fn test_session_requirements() {
        assert!(!Route::Login.requires_session());
        assert!(!Route::SignUp.requires_session());
        assert!(Route::Profile.requires_session());
        assert!(Route::PatientSupport("x".to_string()).requires_session());
    }

    #[test]
    fn test_deferred_navigation_fires_after_delay() {
        let start = Instant::now();
        let mut navigator = Navigator::default();

        let immediate = navigator.request(
            Navigation::after(Route::Login, Duration::from_millis(1500)),
            start,
        );
        assert!(immediate.is_none());
        assert_eq!(navigator.pending(), Some(&Route::Login));

        assert!(navigator.tick(start + Duration::from_millis(1499)).is_none());
        assert_eq!(
            navigator.tick(start + Duration::from_millis(1500)),
            Some(Route::Login)
        );
        assert!(navigator.tick(start + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn test_immediate_navigation_clears_pending() {
        let start = Instant::now();
        let mut navigator = Navigator::default();
        navigator.request(Navigation::after(Route::Login, Duration::from_secs(1)), start);

        let route = navigator.request(Navigation::now(Route::SignUp), start);
        assert_eq!(route, Some(Route::SignUp));
        assert!(navigator.pending().is_none());
    }
}
