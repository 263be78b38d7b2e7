//! Signed Cookie Session Store

use super::Session;
use crate::config::SessionConfig;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use sha2::{Digest, Sha512};
use thiserror::Error;
use tower_cookies::cookie::{time::Duration as CookieDuration, CookieJar};
use tower_cookies::{Cookie, Cookies, Key};
use tracing::{debug, warn};

/// Reasons a session cookie cannot be turned back into a session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session cookie signature is invalid")]
    InvalidSignature,
    #[error("session cookie could not be signed")]
    Signing,
    #[error("session cookie is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("session payload is malformed: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Serializes sessions into HMAC-signed cookies and recovers them.
///
/// The signing key is derived from a static secret, so sessions survive
/// restarts and are shared by every process using the same secret.
#[derive(Clone)]
pub struct SessionStore {
    key: Key,
    cookie_name: String,
    path: String,
    max_age: CookieDuration,
    http_only: bool,
}

impl SessionStore {
    /// Create a store signing with `secret`, using default cookie attributes
    pub fn new(secret: &[u8], cookie_name: impl Into<String>) -> Self {
        let defaults = SessionConfig::default();
        Self {
            key: derive_key(secret),
            cookie_name: cookie_name.into(),
            path: defaults.path,
            max_age: to_cookie_duration(defaults.max_age),
            http_only: defaults.http_only,
        }
    }

    /// Create a store from the session configuration
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            key: derive_key(config.secret.as_bytes()),
            cookie_name: config.cookie_name.clone(),
            path: config.path.clone(),
            max_age: to_cookie_duration(config.max_age),
            http_only: config.http_only,
        }
    }

    /// Recover the request's session, or an empty one.
    ///
    /// A missing cookie and a cookie that fails verification both yield an
    /// empty session; the latter is logged and never authenticates.
    pub fn load(&self, cookies: &Cookies) -> Session {
        let Some(cookie) = cookies.get(&self.cookie_name) else {
            debug!("No '{}' cookie on request, starting empty session", self.cookie_name);
            return Session::new();
        };

        match self.verify(cookie.into_owned()) {
            Ok(session) => session,
            Err(e) => {
                warn!("Discarding '{}' cookie: {}", self.cookie_name, e);
                Session::new()
            }
        }
    }

    /// Write the session into the response cookies
    pub fn save(&self, cookies: &Cookies, session: &Session) -> Result<(), SessionError> {
        cookies.add(self.encode(session)?);
        Ok(())
    }

    /// Build the signed cookie carrying `session`
    pub fn encode(&self, session: &Session) -> Result<Cookie<'static>, SessionError> {
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(session)?);
        let cookie = Cookie::build((self.cookie_name.clone(), payload))
            .path(self.path.clone())
            .max_age(self.max_age)
            .http_only(self.http_only)
            .build();

        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key).add(cookie);
        jar.get(&self.cookie_name)
            .cloned()
            .ok_or(SessionError::Signing)
    }

    /// Check the signature on `cookie` and decode the session inside it
    pub fn verify(&self, cookie: Cookie<'static>) -> Result<Session, SessionError> {
        let mut jar = CookieJar::new();
        jar.add_original(cookie);

        let verified = jar
            .signed(&self.key)
            .get(&self.cookie_name)
            .ok_or(SessionError::InvalidSignature)?;

        let payload = URL_SAFE_NO_PAD.decode(verified.value())?;
        Ok(serde_json::from_slice(&payload)?)
    }
}

/// Stretch an arbitrary-length secret to the 64 bytes the signed jar needs
fn derive_key(secret: &[u8]) -> Key {
    Key::from(Sha512::digest(secret).as_slice())
}

fn to_cookie_duration(duration: std::time::Duration) -> CookieDuration {
    CookieDuration::seconds(i64::try_from(duration.as_secs()).unwrap_or(i64::MAX))
}
