//! Authentication Types

/// Outcome of checking a username/password pair against the credential table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialCheck {
    /// Username exists and the password matches
    Valid,
    /// Username exists but the password differs
    WrongPassword,
    /// Username is not registered
    UnknownUser,
}
