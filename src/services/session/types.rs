/*
 * Responsibility
 * - Session (token + user attributes) as stored per browser session
 * - SessionId: opaque cookie value identifying one browser session
 */
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Authenticated state established at login.
///
/// Field names on the wire are `token`, `accountEmail`, `firstName`,
/// `lastName`, `employeeId`, `role`. An empty `token` means "logged out".
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub account_email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub role: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the bearer token
        f.debug_struct("Session")
            .field("account_email", &self.account_email)
            .field("employee_id", &self.employee_id)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a cookie value. Anything that is not a UUID is treated as absent.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_uses_storage_key_names() {
        let session = Session {
            token: "t".into(),
            account_email: "a@example.com".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            employee_id: "e-1".into(),
            role: "OWNER".into(),
        };
        let value = serde_json::to_value(&session).unwrap();
        for key in [
            "token",
            "accountEmail",
            "firstName",
            "lastName",
            "employeeId",
            "role",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn debug_output_hides_token() {
        let session = Session {
            token: "secret-token".into(),
            account_email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            employee_id: String::new(),
            role: String::new(),
        };
        assert!(!format!("{session:?}").contains("secret-token"));
    }

    #[test]
    fn session_id_rejects_garbage() {
        assert!(SessionId::parse("not-a-uuid").is_none());
        let id = SessionId::generate();
        assert_eq!(SessionId::parse(&id.to_string()), Some(id));
    }
}
