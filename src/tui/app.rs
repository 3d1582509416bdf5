//! Main TUI application state machine.
//!
//! Handles:
//! - Routing between screens, with a session guard
//! - Input event handling
//! - Credential operations via the background worker
//! - Deferred navigation (sign-up success redirect)

use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::{InMemoryPatientDirectory, SqliteUserStore};
use crate::application::{demo_accounts, seed_accounts, AuthService};
use crate::config::AppConfig;
use crate::domain::{OperationResult, User};
use crate::ports::{AuthContext, PatientDirectory};

use super::route::{Navigator, Route};
use super::ui::{
    home::{render_home, HomeAction, HomeState},
    login::{render_login, LoginFormState},
    lookup::{render_lookup, LookupFormState},
    profile::{account_rows, render_profile, PasswordFormState},
    render_disclaimer,
    signup::{render_signup, SignUpFormState},
    support::{render_support, SupportState},
};
use super::worker::{CredentialJob, CredentialWorker, CredentialWorkerHandle};

/// Screen that started the in-flight credential job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobOrigin {
    Login,
    SignUp,
    Profile,
}

struct PendingJob {
    origin: JobOrigin,
    handle: CredentialWorkerHandle,
}

/// Main application state
pub struct App<A> {
    /// Current screen
    route: Route,

    /// Whether the app should quit
    should_quit: bool,

    /// Session holder shared with the worker
    auth: Arc<Mutex<A>>,

    /// Snapshot of the signed-in user, refreshed after each credential job
    session: Option<User>,

    directory: Arc<dyn PatientDirectory>,

    /// Delay before leaving the sign-up success screen
    redirect_delay: Duration,

    navigator: Navigator,
    pending_job: Option<PendingJob>,

    login_state: LoginFormState,
    signup_state: SignUpFormState,
    home_state: HomeState,
    password_state: PasswordFormState,
    lookup_state: LookupFormState,
    support_state: Option<SupportState>,
}

impl App<AuthService<SqliteUserStore>> {
    /// Create the application from configuration, opening the user store
    /// and the patient directory.
    ///
    /// # Errors
    /// Returns error if the database, directory file or account seeding
    /// fails.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let store = Arc::new(SqliteUserStore::new(&config.db_path)?);

        let directory: Arc<dyn PatientDirectory> = match &config.patients_file {
            Some(path) => Arc::new(InMemoryPatientDirectory::from_json_file(path).map_err(
                |e| anyhow!("Failed to load patient directory from {:?}: {}", path, e),
            )?),
            None => Arc::new(InMemoryPatientDirectory::demo()),
        };
        tracing::info!(records = directory.len(), "Patient directory ready");

        let service = AuthService::new(store);
        if config.seed_demo_users {
            seed_accounts(&service, &demo_accounts())?;
        }

        Ok(Self::with_dependencies(
            Arc::new(Mutex::new(service)),
            directory,
            config.redirect_delay,
        ))
    }
}

impl<A> App<A>
where
    A: AuthContext + Send + 'static,
{
    /// Create application with injected dependencies.
    pub fn with_dependencies(
        auth: Arc<Mutex<A>>,
        directory: Arc<dyn PatientDirectory>,
        redirect_delay: Duration,
    ) -> Self {
        let mut app = Self {
            route: Route::Login,
            should_quit: false,
            auth,
            session: None,
            directory,
            redirect_delay,
            navigator: Navigator::default(),
            pending_job: None,
            login_state: LoginFormState::default(),
            signup_state: SignUpFormState::default(),
            home_state: HomeState::default(),
            password_state: PasswordFormState::default(),
            lookup_state: LookupFormState::default(),
            support_state: None,
        };
        app.refresh_session();
        app
    }

    /// Current screen
    #[must_use]
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_worker();
            self.tick(Instant::now());

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                let content_area = chunks[0];
                let user_label = self.user_label();

                match &self.route {
                    Route::Login => render_login(f, content_area, &self.login_state),
                    Route::SignUp => render_signup(f, content_area, &self.signup_state),
                    Route::Home => render_home(f, content_area, &self.home_state, &user_label),
                    Route::Profile => {
                        let rows = self
                            .session
                            .as_ref()
                            .map(|user| account_rows(user, self.directory.as_ref()))
                            .unwrap_or_default();
                        render_profile(f, content_area, &rows, &self.password_state);
                    }
                    Route::DiagnosticSupport => {
                        render_lookup(f, content_area, &self.lookup_state, &user_label);
                    }
                    Route::PatientSupport(_) => {
                        if let Some(state) = &self.support_state {
                            render_support(f, content_area, state, &user_label);
                        }
                    }
                }

                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn user_label(&self) -> String {
        self.session
            .as_ref()
            .map(|u| format!("{} ({})", u.name, u.role.label()))
            .unwrap_or_default()
    }

    fn refresh_session(&mut self) {
        match self.auth.lock() {
            Ok(ctx) => self.session = ctx.user().cloned(),
            Err(_) => {
                tracing::error!("Auth context lock poisoned; treating as signed out");
                self.session = None;
            }
        }
    }

    /// Fire a deferred navigation whose deadline has passed.
    fn tick(&mut self, now: Instant) {
        if let Some(route) = self.navigator.tick(now) {
            self.enter(route);
        }
    }

    /// Switch screens. Guarded routes fall back to sign-in without a session.
    fn navigate(&mut self, route: Route) {
        self.navigator.cancel();
        self.enter(route);
    }

    fn enter(&mut self, route: Route) {
        let route = if route.requires_session() && self.session.is_none() {
            tracing::warn!(requested = %route, "No session; redirecting to sign in");
            Route::Login
        } else {
            route
        };

        match &route {
            Route::Login => self.login_state = LoginFormState::default(),
            Route::SignUp => self.signup_state = SignUpFormState::default(),
            Route::Home => self.home_state = HomeState::default(),
            Route::Profile => self.password_state = PasswordFormState::default(),
            Route::DiagnosticSupport => {}
            Route::PatientSupport(id) => {
                self.support_state = Some(SupportState::resolve(self.directory.as_ref(), id));
            }
        }

        tracing::debug!(route = %route, "Navigated");
        self.route = route;
    }

    fn start_job(&mut self, origin: JobOrigin, job: CredentialJob) {
        let handle = CredentialWorker::spawn(self.auth.clone(), job);
        self.pending_job = Some(PendingJob { origin, handle });
    }

    /// Apply a finished credential job, if any.
    fn poll_worker(&mut self) {
        let Some(result) = self.pending_job.as_ref().and_then(|job| job.handle.try_recv()) else {
            return;
        };
        if let Some(job) = self.pending_job.take() {
            self.apply_result(job.origin, &result);
        }
    }

    fn apply_result(&mut self, origin: JobOrigin, result: &OperationResult) {
        self.refresh_session();
        match origin {
            JobOrigin::Login => {
                if let Some(route) = self.login_state.complete(result) {
                    self.navigate(route);
                }
            }
            JobOrigin::SignUp => {
                if let Some(nav) = self.signup_state.complete(result, self.redirect_delay) {
                    if let Some(route) = self.navigator.request(nav, Instant::now()) {
                        self.enter(route);
                    }
                }
            }
            JobOrigin::Profile => self.password_state.complete(result),
        }
    }

    fn sign_out(&mut self) {
        match self.auth.lock() {
            Ok(mut ctx) => ctx.logout(),
            Err(_) => tracing::error!("Auth context lock poisoned; cannot sign out"),
        }
        self.refresh_session();
        self.navigate(Route::Login);
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Screens are locked while a credential job runs.
        if self.pending_job.is_some() {
            return;
        }

        match self.route {
            Route::Login => self.handle_login_key(key),
            Route::SignUp => self.handle_signup_key(key),
            Route::Home => self.handle_home_key(key),
            Route::Profile => self.handle_profile_key(key),
            Route::DiagnosticSupport => self.handle_lookup_key(key),
            Route::PatientSupport(_) => self.handle_support_key(key),
        }
    }

    fn handle_login_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::F(2) => self.navigate(Route::SignUp),
            KeyCode::Up => self.login_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.login_state.next_field(),
            KeyCode::Char(c) => self.login_state.input_char(c),
            KeyCode::Backspace => self.login_state.delete_char(),
            KeyCode::Delete => self.login_state.clear_field(),
            KeyCode::Enter => {
                if let Some(credentials) = self.login_state.begin_submit() {
                    self.start_job(
                        JobOrigin::Login,
                        CredentialJob::Authenticate {
                            username: credentials.username,
                            password: credentials.password,
                        },
                    );
                }
            }
            _ => {}
        }
    }

    fn handle_signup_key(&mut self, key: KeyCode) {
        if self.signup_state.phase.is_success() {
            // Skip the redirect wait.
            if matches!(key, KeyCode::Enter | KeyCode::Esc) {
                self.navigate(Route::Login);
            }
            return;
        }

        match key {
            KeyCode::Esc => self.navigate(Route::Login),
            KeyCode::Up => self.signup_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.signup_state.next_field(),
            KeyCode::Char(c) => self.signup_state.input_char(c),
            KeyCode::Backspace => self.signup_state.delete_char(),
            KeyCode::Delete => self.signup_state.clear_field(),
            KeyCode::Enter => {
                if let Some(request) = self.signup_state.begin_submit() {
                    self.start_job(JobOrigin::SignUp, CredentialJob::Register(request));
                }
            }
            _ => {}
        }
    }

    fn handle_home_key(&mut self, key: KeyCode) {
        let action = match key {
            KeyCode::Up => {
                self.home_state.prev();
                return;
            }
            KeyCode::Down | KeyCode::Tab => {
                self.home_state.next();
                return;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Enter => self.home_state.current(),
            KeyCode::Char(c) => match HomeAction::from_key(c) {
                Some(action) => action,
                None => return,
            },
            _ => return,
        };

        match action {
            HomeAction::SignOut => self.sign_out(),
            other => self.navigate(other.route()),
        }
    }

    fn handle_profile_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.navigate(Route::Home),
            KeyCode::Up => self.password_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.password_state.next_field(),
            KeyCode::Char(c) => self.password_state.input_char(c),
            KeyCode::Backspace => self.password_state.delete_char(),
            KeyCode::Delete => self.password_state.clear_field(),
            KeyCode::Enter => {
                if let Some(change) = self.password_state.begin_submit() {
                    self.start_job(
                        JobOrigin::Profile,
                        CredentialJob::ChangePassword {
                            current: change.current,
                            new: change.new,
                        },
                    );
                }
            }
            _ => {}
        }
    }

    fn handle_lookup_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.navigate(Route::Home),
            KeyCode::Char(c) => self.lookup_state.input_char(c),
            KeyCode::Backspace => self.lookup_state.delete_char(),
            KeyCode::Delete => self.lookup_state.clear_field(),
            KeyCode::Enter => {
                if let Some(route) = self.lookup_state.submit() {
                    self.navigate(route);
                }
            }
            _ => {}
        }
    }

    fn handle_support_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.navigate(Route::DiagnosticSupport),
            KeyCode::Char('h') | KeyCode::Char('H') => self.navigate(Route::Home),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::tui::testing::{user, FakeAuth, PanickingAuth};

    fn create_test_app(auth: FakeAuth) -> App<FakeAuth> {
        App::with_dependencies(
            Arc::new(Mutex::new(auth)),
            Arc::new(InMemoryPatientDirectory::demo()),
            Duration::from_millis(1500),
        )
    }

    fn type_text(app: &mut App<FakeAuth>, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    /// Wait for the in-flight job and apply it.
    fn finish_job(app: &mut App<FakeAuth>) {
        let job = app.pending_job.take().expect("Should have a job");
        let result = job.handle.wait();
        app.apply_result(job.origin, &result);
    }

    #[test]
    fn test_guarded_routes_redirect_to_login() {
        let mut app = create_test_app(FakeAuth::answering(OperationResult::ok()));
        app.navigate(Route::Profile);
        assert_eq!(app.route(), &Route::Login);

        app.navigate(Route::PatientSupport("P1001".to_string()));
        assert_eq!(app.route(), &Route::Login);
    }

    #[test]
    fn test_sign_in_then_lookup_flow() {
        let mut app = create_test_app(FakeAuth::answering(OperationResult::ok()));
        type_text(&mut app, "maria");
        app.handle_key(KeyCode::Tab, KeyModifiers::NONE);
        type_text(&mut app, "patient");
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        finish_job(&mut app);
        assert_eq!(app.route(), &Route::Home);

        app.handle_key(KeyCode::Char('d'), KeyModifiers::NONE);
        assert_eq!(app.route(), &Route::DiagnosticSupport);

        // Blank input stays put.
        type_text(&mut app, "  ");
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.route(), &Route::DiagnosticSupport);

        type_text(&mut app, "P1001");
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.route().path(), "/patient/P1001/support");
        assert!(matches!(app.support_state, Some(SupportState::Found(_))));
    }

    #[test]
    fn test_signup_success_redirects_after_delay() {
        let mut app = create_test_app(FakeAuth::answering(OperationResult::ok()));
        app.handle_key(KeyCode::F(2), KeyModifiers::NONE);
        assert_eq!(app.route(), &Route::SignUp);

        for value in ["Jane Doe", "jane@example.com", "jane", "abcd", "abcd"] {
            type_text(&mut app, value);
            app.handle_key(KeyCode::Tab, KeyModifiers::NONE);
        }
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        finish_job(&mut app);

        assert!(app.signup_state.phase.is_success());
        assert_eq!(app.route(), &Route::SignUp);
        assert_eq!(app.navigator.pending(), Some(&Route::Login));

        app.tick(Instant::now() + Duration::from_millis(1500));
        assert_eq!(app.route(), &Route::Login);
    }

    #[test]
    fn test_signup_mismatch_never_starts_job() {
        let mut app = create_test_app(FakeAuth::answering(OperationResult::ok()));
        app.navigate(Route::SignUp);

        for value in ["Jane Doe", "jane@example.com", "jane", "abcd", "abce"] {
            type_text(&mut app, value);
            app.handle_key(KeyCode::Tab, KeyModifiers::NONE);
        }
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);

        assert!(app.pending_job.is_none());
        assert_eq!(app.signup_state.phase.error(), Some("Passwords do not match."));
        let auth = app.auth.lock().expect("Should lock");
        assert!(auth.register_calls.is_empty());
    }

    #[test]
    fn test_sign_out_clears_session() {
        let mut app = create_test_app(FakeAuth::signed_in(
            user("P1001", Role::Patient),
            OperationResult::ok(),
        ));
        app.navigate(Route::Home);
        assert_eq!(app.route(), &Route::Home);

        app.handle_key(KeyCode::Char('o'), KeyModifiers::NONE);
        assert_eq!(app.route(), &Route::Login);
        assert!(app.session.is_none());

        app.navigate(Route::Home);
        assert_eq!(app.route(), &Route::Login);
    }

    #[test]
    fn test_ctrl_q_quits_anywhere() {
        let mut app = create_test_app(FakeAuth::answering(OperationResult::ok()));
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn test_worker_crash_unlocks_signup() {
        let mut app = App::with_dependencies(
            Arc::new(Mutex::new(PanickingAuth)),
            Arc::new(InMemoryPatientDirectory::demo()),
            Duration::from_millis(1500),
        );
        app.navigate(Route::SignUp);
        for value in ["Jane Doe", "jane@example.com", "jane", "abcd", "abcd"] {
            for c in value.chars() {
                app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
            }
            app.handle_key(KeyCode::Tab, KeyModifiers::NONE);
        }
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.signup_state.phase.is_submitting());

        for _ in 0..500 {
            app.poll_worker();
            if app.pending_job.is_none() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }

        assert!(app.pending_job.is_none());
        assert_eq!(app.signup_state.phase.error(), Some("Registration failed."));

        app.handle_key(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.route(), &Route::Login);
    }
}
