/*
 * Responsibility
 * - 従業員 form (create / update) と validate()
 * - アカウント発行 request と upstream payload
 * - 一覧 / 詳細 / form 選択肢の view model
 */
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::v1::dto::{
    validate::Check,
    view::{ListView, Record, Row, is_present},
};
use crate::error::AppError;
use crate::services::auth::Role;
use crate::services::nav::EmployeeRowActions;

/// Employee create/update form. Only the fields that are validated here are
/// typed; everything else goes to the backend as sent.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub personal_email: String,
    #[serde(default)]
    pub company_email: String,
    #[serde(flatten)]
    pub rest: Record,
}

impl EmployeeForm {
    pub fn validate(&self) -> Result<(), AppError> {
        Check::new()
            .min_chars(
                "firstName",
                &self.first_name,
                2,
                "First name must be at least 2 characters.",
            )
            .min_chars(
                "lastName",
                &self.last_name,
                2,
                "Last name must be at least 2 characters.",
            )
            .email(
                "personalEmail",
                &self.personal_email,
                "Please enter a valid email address.",
            )
            .email(
                "companyEmail",
                &self.company_email,
                "Please enter a valid email address.",
            )
            .finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub account_email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl CreateAccountRequest {
    /// Validated account role (`USER` when not given).
    pub fn validate(&self) -> Result<Role, AppError> {
        let mut check = Check::new();
        check.email(
            "accountEmail",
            &self.account_email,
            "Please enter a valid email address.",
        );

        if self.password.is_empty() || self.confirm_password.is_empty() {
            check.fail("password", "Please fill in all password fields");
        } else if self.password.chars().count() < 8 {
            check.fail("password", "Password must be at least 8 characters");
        } else if self.password != self.confirm_password {
            check.fail("confirmPassword", "Passwords do not match");
        }

        let role = match self.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            None => Some(Role::User),
            Some(raw) => Role::parse(raw),
        };
        if role.is_none() {
            check.fail("role", "Unknown role");
        }

        check.finish()?;
        Ok(role.unwrap_or(Role::User))
    }
}

/// Body of `POST /auth/create-employee-account`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountPayload {
    pub employee_id: String,
    pub account_email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Default, PartialEq, Eq)]
pub struct EmployeeListActions {
    pub create: bool,
}

pub type EmployeeRow = Row<EmployeeRowActions>;
pub type EmployeeListView = ListView<EmployeeRow, EmployeeListActions>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetailView {
    pub employee: Record,
    pub actions: EmployeeRowActions,
    pub can_view_financials: bool,
}

/// Choices for the employee form's selects.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormOptions {
    pub job_titles: Vec<Value>,
    pub teams: Vec<Value>,
}

/// Whether the employee already has a login account. Backends report either
/// a `hasAccount` flag or the linked `accountEmail`.
pub fn has_account(row: &Record) -> bool {
    match row.get("hasAccount") {
        Some(Value::Bool(flag)) => *flag,
        _ => is_present(row, "accountEmail"),
    }
}
