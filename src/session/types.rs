//! Session Types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Session key recording whether the client has logged in
pub const AUTHENTICATED: &str = "authenticated";

/// Key/value state bound to one client through the session cookie
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session {
    values: Map<String, Value>,
}

impl Session {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Insert a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.insert(AUTHENTICATED, authenticated);
    }

    /// Whether the `authenticated` entry is truthy.
    ///
    /// Anything other than an absent entry, `null` or `false` counts, so a
    /// string or number stored under the key authenticates the session.
    pub fn is_authenticated(&self) -> bool {
        is_truthy(self.get(AUTHENTICATED))
    }
}

/// Loose truthiness: only absent, `null` and `false` are falsy
pub fn is_truthy(value: Option<&Value>) -> bool {
    !matches!(value, None | Some(Value::Null) | Some(Value::Bool(false)))
}
