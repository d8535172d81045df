//! HTTP Basic transport credentials.

use axum::http::{header, HeaderMap, HeaderValue};
use base64::Engine;
use subtle::ConstantTimeEq;

/// Realm advertised in the `WWW-Authenticate` challenge.
pub const REALM: &str = "faxme";

/// Expected username/password pair.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Compare a provided pair against the expected one.
    ///
    /// Both fields are always compared so a wrong username costs the same as
    /// a wrong password.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        let user_ok = self.username.as_bytes().ct_eq(username.as_bytes());
        let pass_ok = self.password.as_bytes().ct_eq(password.as_bytes());
        bool::from(user_ok & pass_ok)
    }

    /// Check the request's `Authorization` header. Absent or malformed fails.
    pub fn check(&self, headers: &HeaderMap) -> bool {
        match basic_auth(headers) {
            Some((username, password)) => self.matches(&username, &password),
            None => false,
        }
    }
}

/// Decode `Authorization: Basic <base64(user:pass)>`.
pub fn basic_auth(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// `WWW-Authenticate` value sent with 401 responses.
pub fn challenge() -> HeaderValue {
    HeaderValue::from_static(r#"Basic realm="faxme""#)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn basic(user: &str, pass: &str) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", user, pass));
        format!("Basic {}", encoded)
    }

    #[test]
    fn test_matches() {
        let creds = Credentials::new("fax", "secret");
        assert!(creds.matches("fax", "secret"));
        assert!(!creds.matches("fax", "secre"));
        assert!(!creds.matches("fa", "secret"));
        assert!(!creds.matches("", ""));
    }

    #[test]
    fn test_check_header() {
        let creds = Credentials::new("fax", "secret");
        assert!(creds.check(&headers_with(&basic("fax", "secret"))));
        assert!(!creds.check(&headers_with(&basic("fax", "wrong"))));
        assert!(!creds.check(&headers_with("Bearer abc")));
        assert!(!creds.check(&headers_with("Basic !!!")));
        assert!(!creds.check(&HeaderMap::new()));
    }

    #[test]
    fn test_password_may_contain_colon() {
        let parsed = basic_auth(&headers_with(&basic("fax", "a:b"))).unwrap();
        assert_eq!(parsed, ("fax".to_string(), "a:b".to_string()));
    }

    #[test]
    fn test_challenge_names_realm() {
        assert_eq!(challenge().to_str().unwrap(), format!(r#"Basic realm="{}""#, REALM));
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("fax", "secret");
        assert!(!format!("{:?}", creds).contains("secret"));
    }
}
