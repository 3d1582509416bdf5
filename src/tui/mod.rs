//! TUI module: Terminal User Interface using Ratatui.
//!
//! Screens:
//! - Sign in and patient sign-up
//! - Home menu
//! - Profile with password change
//! - Diagnostic-support lookup and patient view

mod app;
pub mod form;
pub mod route;
mod styles;
pub mod ui;
mod worker;

#[cfg(test)]
mod testing;

pub use app::App;
pub use route::{Navigation, Navigator, Route};
pub use styles::MedicalTheme;
pub use worker::{CredentialJob, CredentialWorker, CredentialWorkerHandle};
