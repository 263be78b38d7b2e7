//! Session Module
//! 
//! Cookie-bound session state and the signed cookie codec that carries it.

pub mod store;
pub mod types;

pub use store::{SessionError, SessionStore};
pub use types::{is_truthy, Session, AUTHENTICATED};
