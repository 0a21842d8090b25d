/*
 * Responsibility
 * - 給与計算 request の validate()
 * - 給与一覧の view model (支払済みにするボタンは PENDING 行のみ)
 */
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::v1::dto::{
    validate::Check,
    view::{ListView, Row},
};
use crate::error::AppError;
use crate::services::nav::SalaryRowActions;

const YEARS: std::ops::RangeInclusive<i64> = 2020..=2100;

/// Month and year arrive from number inputs, so either strings or numbers.
#[derive(Debug, Deserialize)]
pub struct CalculateSalaryRequest {
    #[serde(default)]
    pub month: Option<Value>,
    #[serde(default)]
    pub year: Option<Value>,
}

/// Body of `POST /salary/calculate`. The backend takes the month as text.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CalculatePayload {
    pub month: String,
    pub year: i64,
}

impl CalculateSalaryRequest {
    pub fn validate(&self) -> Result<CalculatePayload, AppError> {
        let month = self.month.as_ref().and_then(integer);
        let year = self.year.as_ref().and_then(integer);

        let mut check = Check::new();
        match month {
            None => {
                check.fail("month", "Please select month and year");
            }
            Some(m) if !(1..=12).contains(&m) => {
                check.fail("month", "Month must be 1-12");
            }
            Some(_) => {}
        }
        match year {
            None => {
                check.fail("year", "Please select month and year");
            }
            Some(y) if !YEARS.contains(&y) => {
                check.fail("year", "Year must be 2020-2100");
            }
            Some(_) => {}
        }
        check.finish()?;

        match (month, year) {
            (Some(month), Some(year)) => Ok(CalculatePayload {
                month: month.to_string(),
                year,
            }),
            _ => Err(AppError::Internal),
        }
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Debug, Serialize, Default, PartialEq, Eq)]
pub struct SalaryListActions {
    pub calculate: bool,
}

pub type SalaryListView = ListView<Row<SalaryRowActions>, SalaryListActions>;
