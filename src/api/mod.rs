//! HTTP API Module
//! 
//! Routes login, logout and healthcheck requests to their handlers.

pub mod error;
pub mod form;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::AuthApi;
pub use server::AuthServer;
