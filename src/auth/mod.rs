//! Authentication Module
//! 
//! Holds the credential table consulted by the login handler.

pub mod store;
pub mod types;

pub use store::CredentialStore;
pub use types::CredentialCheck;
