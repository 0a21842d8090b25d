/*
 * Responsibility
 * - login / sign-up の request DTO と validate()
 * - upstream の login 応答 (data) → Session
 * - /me の response DTO
 */
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::v1::dto::{validate::Check, view::value_text};
use crate::error::AppError;
use crate::services::session::Session;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub account_email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        Check::new()
            .required("accountEmail", &self.account_email, "Email is required")
            .required("password", &self.password, "Password is required")
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[serde(default)]
    pub account_email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub organization_name: String,
}

impl SignUpRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        Check::new()
            .email("accountEmail", &self.account_email, "Invalid email address")
            .min_chars(
                "password",
                &self.password,
                8,
                "Password must be at least 8 characters",
            )
            .min_chars(
                "firstName",
                &self.first_name,
                2,
                "First name must be at least 2 characters",
            )
            .min_chars(
                "lastName",
                &self.last_name,
                2,
                "Last name must be at least 2 characters",
            )
            .min_chars(
                "organizationName",
                &self.organization_name,
                2,
                "Organization name must be at least 2 characters",
            )
            .finish()
    }
}

/// `data` of a successful upstream login.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub account_email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub employee_id: Option<Value>,
    #[serde(default)]
    pub role: Option<String>,
}

impl LoginData {
    /// `None` when the backend answered without a token.
    pub fn into_session(self) -> Option<Session> {
        let token = self.token.filter(|t| !t.trim().is_empty())?;
        Some(Session {
            token,
            account_email: self.account_email.unwrap_or_default(),
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            employee_id: self
                .employee_id
                .as_ref()
                .and_then(value_text)
                .unwrap_or_default(),
            role: self.role.unwrap_or_default(),
        })
    }
}

/// Signed-in user as shown in the navbar. `role` is the one resolved from the
/// token, not the one the backend returned at login.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub signed_in: bool,
    pub account_email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub employee_id: Option<String>,
    pub role: Option<String>,
}

impl MeResponse {
    pub fn signed_out() -> Self {
        Self {
            signed_in: false,
            account_email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            full_name: String::new(),
            employee_id: None,
            role: None,
        }
    }

    pub fn from_session(session: &Session, role: Option<&str>) -> Self {
        Self {
            signed_in: true,
            account_email: session.account_email.clone(),
            first_name: session.first_name.clone(),
            last_name: session.last_name.clone(),
            full_name: session.full_name(),
            employee_id: Some(session.employee_id.clone()).filter(|id| !id.is_empty()),
            role: role.map(str::to_string),
        }
    }
}
