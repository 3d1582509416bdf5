//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the credential workflow behind the screens.

mod auth;
mod bootstrap;

pub use auth::{
    AuthService, SeedAccount, INVALID_CREDENTIALS, NEW_PASSWORD_TOO_SHORT, NOT_SIGNED_IN,
    SERVICE_UNAVAILABLE, WRONG_CURRENT_PASSWORD,
};
pub use bootstrap::{demo_accounts, seed_accounts};
