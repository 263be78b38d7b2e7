//! SessionAuth Library
//! 
//! Cookie session authentication service: a login endpoint checking a fixed
//! credential table, a logout endpoint, and a healthcheck gated on the
//! session's `authenticated` flag. Sessions live entirely in signed cookies.

pub mod api;
pub mod auth;
pub mod config;
pub mod session;
pub mod shutdown;

pub use api::{AppState, AuthApi, AuthServer};
pub use auth::CredentialStore;
pub use config::Config;
pub use session::{Session, SessionStore};
pub use shutdown::ShutdownCoordinator;

/// Common error type for the server
pub type Result<T> = anyhow::Result<T>;
