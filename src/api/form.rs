//! Login Form Parsing
//!
//! Values come from the URL-encoded request body followed by the URL query,
//! and lookups return the first value for a key. A body is only read when
//! the request declares `application/x-www-form-urlencoded`; any other body
//! is ignored rather than rejected.

use super::error::ApiError;
use axum::http::{header, HeaderMap};
use url::form_urlencoded;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Ordered key/value pairs decoded from a request
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormValues {
    pairs: Vec<(String, String)>,
}

impl FormValues {
    /// Decode body pairs (form requests only) followed by query pairs
    pub fn parse(headers: &HeaderMap, query: Option<&str>, body: &[u8]) -> Result<Self, ApiError> {
        let mut pairs = Vec::new();

        if is_form_content_type(headers)? {
            pairs.extend(decode_pairs(body)?);
        }

        if let Some(query) = query {
            pairs.extend(decode_pairs(query.as_bytes())?);
        }

        Ok(Self { pairs })
    }

    /// First value for `key`, or an empty string when absent
    pub fn get(&self, key: &str) -> &str {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }
}

/// Credentials submitted to the login endpoint
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl From<&FormValues> for LoginForm {
    fn from(values: &FormValues) -> Self {
        Self {
            username: values.get("username").to_string(),
            password: values.get("password").to_string(),
        }
    }
}

fn is_form_content_type(headers: &HeaderMap) -> Result<bool, ApiError> {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return Ok(false);
    };

    let value = value.to_str().map_err(|_| ApiError::BadRequest)?;
    let media_type = value.split(';').next().unwrap_or("").trim();
    if media_type.is_empty() {
        return Err(ApiError::BadRequest);
    }

    Ok(media_type.eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

fn decode_pairs(input: &[u8]) -> Result<Vec<(String, String)>, ApiError> {
    if !has_valid_escapes(input) {
        return Err(ApiError::BadRequest);
    }

    Ok(form_urlencoded::parse(input)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect())
}

/// Every `%` must introduce two hex digits
fn has_valid_escapes(input: &[u8]) -> bool {
    let mut i = 0;
    while i < input.len() {
        if input[i] == b'%' {
            match input.get(i + 1..i + 3) {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn form_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        headers
    }

    #[test]
    fn test_decodes_body() {
        let values = FormValues::parse(&form_headers(), None, b"username=user%201&password=a+b").unwrap();

        assert_eq!(values.get("username"), "user 1");
        assert_eq!(values.get("password"), "a b");
        assert_eq!(values.get("missing"), "");
    }

    #[test]
    fn test_first_value_wins() {
        let values = FormValues::parse(&form_headers(), None, b"password=a&password=b").unwrap();
        assert_eq!(values.get("password"), "a");
    }

    #[test]
    fn test_body_precedes_query() {
        let values = FormValues::parse(
            &form_headers(),
            Some("username=from-query&password=q"),
            b"username=from-body",
        )
        .unwrap();

        assert_eq!(values.get("username"), "from-body");
        assert_eq!(values.get("password"), "q");
    }

    #[test]
    fn test_non_form_body_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let values = FormValues::parse(&headers, Some("username=user1"), b"username=other").unwrap();
        assert_eq!(values.get("username"), "user1");

        let values = FormValues::parse(&HeaderMap::new(), None, b"username=user1").unwrap();
        assert_eq!(values, FormValues::default());
    }

    #[test]
    fn test_content_type_parameters_and_case() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("Application/X-WWW-Form-URLEncoded; charset=utf-8"),
        );

        let values = FormValues::parse(&headers, None, b"username=user1").unwrap();
        assert_eq!(values.get("username"), "user1");
    }

    #[test]
    fn test_invalid_escapes_are_rejected() {
        for body in [
            &b"username=%zz"[..],
            &b"password=%4"[..],
            &b"%"[..],
            &b"username=ok&password=100%"[..],
        ] {
            assert!(matches!(
                FormValues::parse(&form_headers(), None, body),
                Err(ApiError::BadRequest)
            ));
        }

        assert!(matches!(
            FormValues::parse(&HeaderMap::new(), Some("username=%g1"), b""),
            Err(ApiError::BadRequest)
        ));
    }

    #[test]
    fn test_invalid_escape_in_ignored_body_is_accepted() {
        let values = FormValues::parse(&HeaderMap::new(), None, b"username=%zz").unwrap();
        assert_eq!(values.get("username"), "");
    }

    #[test]
    fn test_login_form_from_values() {
        let values = FormValues::parse(&form_headers(), None, b"username=user1").unwrap();
        let form = LoginForm::from(&values);

        assert_eq!(form.username, "user1");
        assert_eq!(form.password, "");
    }
}
