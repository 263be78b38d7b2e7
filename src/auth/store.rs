//! Credential Store

use super::CredentialCheck;
use crate::config::UserConfig;
use std::collections::HashMap;

/// Read-only username to password table, built once at startup.
///
/// Passwords are held and compared as plaintext.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: HashMap<String, String>,
}

impl CredentialStore {
    /// Build a store from `(username, password)` pairs; later duplicates win
    pub fn new<I, U, P>(users: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            users: users
                .into_iter()
                .map(|(u, p)| (u.into(), p.into()))
                .collect(),
        }
    }

    /// Build a store from configured users
    pub fn from_config(users: &[UserConfig]) -> Self {
        Self::new(
            users
                .iter()
                .map(|u| (u.username.as_str(), u.password.as_str())),
        )
    }

    /// Check a username/password pair
    pub fn check(&self, username: &str, password: &str) -> CredentialCheck {
        match self.users.get(username) {
            Some(stored) if stored == password => CredentialCheck::Valid,
            Some(_) => CredentialCheck::WrongPassword,
            None => CredentialCheck::UnknownUser,
        }
    }
}
