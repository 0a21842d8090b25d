/*
 * Responsibility
 * - 銀行口座 form と validate()
 */
use serde::{Deserialize, Serialize};

use crate::api::v1::dto::{validate::Check, view::Record};
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountForm {
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub account_holder_name: String,
    #[serde(default)]
    pub bank_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(flatten)]
    pub rest: Record,
}

impl BankAccountForm {
    pub fn validate(&self) -> Result<(), AppError> {
        Check::new()
            .required("accountNumber", &self.account_number, "Account number is required")
            .required(
                "accountHolderName",
                &self.account_holder_name,
                "Account holder name is required",
            )
            .required("bankName", &self.bank_name, "Bank name is required")
            .finish()
    }

    /// Employee the account belongs to, if the form names one.
    pub fn owner(&self) -> Option<&str> {
        self.employee_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}
