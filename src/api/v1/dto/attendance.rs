/*
 * Responsibility
 * - 勤怠履歴の paging query
 * - 当日の勤怠 view model (出勤 / 退勤ボタンの可否)
 */
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::v1::dto::view::{Record, is_present};

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(0)
    }

    pub fn size(&self) -> u32 {
        self.size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayView {
    pub date: NaiveDate,
    pub record: Option<Record>,
    pub can_check_in: bool,
    pub can_check_out: bool,
}

impl TodayView {
    /// `records` newest first; the first one dated `today` wins.
    pub fn pick(today: NaiveDate, records: Vec<Record>) -> Self {
        let prefix = today.format("%Y-%m-%d").to_string();
        let record = records.into_iter().find(|r| {
            r.get("attendanceDate")
                .and_then(|v| v.as_str())
                .is_some_and(|d| d.starts_with(&prefix))
        });

        let checked_out = record
            .as_ref()
            .is_some_and(|r| is_present(r, "checkOutTime"));

        Self {
            date: today,
            can_check_in: record.is_none() || checked_out,
            can_check_out: record.is_some() && !checked_out,
            record,
        }
    }
}
