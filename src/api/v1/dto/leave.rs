/*
 * Responsibility
 * - 休暇申請 (create / status 更新) の request DTO と validate()
 * - 一覧の view model (承認 / 却下ボタンは PENDING 行のみ)
 */
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::v1::dto::{
    validate::Check,
    view::{ListView, Row},
};
use crate::error::AppError;
use crate::services::nav::LeaveRowActions;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeaveRequest {
    #[serde(default)]
    pub from_date: String,
    #[serde(default)]
    pub to_date: String,
    #[serde(default)]
    pub reason: String,
}

/// Body of `POST /leave-requests`.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LeavePayload {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub reason: String,
}

impl CreateLeaveRequest {
    pub fn validate(&self) -> Result<LeavePayload, AppError> {
        let mut check = Check::new();
        check
            .required("fromDate", &self.from_date, "Please fill in all fields")
            .required("toDate", &self.to_date, "Please fill in all fields")
            .required("reason", &self.reason, "Please fill in all fields");

        let from = parse_date(&mut check, "fromDate", &self.from_date);
        let to = parse_date(&mut check, "toDate", &self.to_date);
        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            check.fail("fromDate", "From date cannot be after to date");
        }

        check.finish()?;
        match (from, to) {
            (Some(from_date), Some(to_date)) => Ok(LeavePayload {
                from_date,
                to_date,
                reason: self.reason.trim().to_string(),
            }),
            _ => Err(AppError::Internal),
        }
    }
}

fn parse_date(check: &mut Check, field: &'static str, raw: &str) -> Option<NaiveDate> {
    if check.has_failed(field) {
        return None;
    }
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            check.fail(field, "Use the YYYY-MM-DD format");
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LeaveDecision {
    Approved,
    Rejected,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLeaveStatusRequest {
    #[serde(default)]
    pub status: String,
}

impl UpdateLeaveStatusRequest {
    pub fn validate(&self) -> Result<LeaveDecision, AppError> {
        match self.status.trim().to_ascii_uppercase().as_str() {
            "APPROVED" => Ok(LeaveDecision::Approved),
            "REJECTED" => Ok(LeaveDecision::Rejected),
            _ => Err(AppError::field("status", "Status must be APPROVED or REJECTED")),
        }
    }
}

/// Body of `PUT /leave-requests/{id}/status`.
#[derive(Debug, Serialize)]
pub struct LeaveStatusPayload {
    pub status: LeaveDecision,
}

/// Whose requests the list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveScope {
    All,
    Mine,
}

#[derive(Debug, Serialize, Default, PartialEq, Eq)]
pub struct LeaveListActions {
    pub request: bool,
    pub review: bool,
    pub scope: Option<LeaveScope>,
}

pub type LeaveListView = ListView<Row<LeaveRowActions>, LeaveListActions>;
