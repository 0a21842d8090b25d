use std::time::Duration;

use axum::http::{
    HeaderMap, HeaderValue, header,
    header::InvalidHeaderValue,
};

use crate::services::session::SessionId;

/// Browser cookie carrying the session id.
///
/// HttpOnly + SameSite=Lax always; `Secure` in production.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    name: String,
    secure: bool,
    max_age: Duration,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, secure: bool, max_age: Duration) -> Self {
        Self {
            name: name.into(),
            secure,
            max_age,
        }
    }

    /// Session id from the request's `Cookie` header(s), if present and well-formed.
    pub fn read(&self, headers: &HeaderMap) -> Option<SessionId> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.name)
            .and_then(|(_, value)| SessionId::parse(value))
    }

    pub fn issue(&self, id: &SessionId) -> Result<HeaderValue, InvalidHeaderValue> {
        self.build(&id.to_string(), self.max_age.as_secs())
    }

    pub fn expire(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        self.build("", 0)
    }

    fn build(&self, value: &str, max_age: u64) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.name, value, max_age
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }
}
