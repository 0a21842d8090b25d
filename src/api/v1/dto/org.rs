/*
 * Responsibility
 * - 部署 / チーム / 役職 の form と validate()
 * - 一覧の view model (管理ボタンの可否)
 */
use serde::{Deserialize, Serialize};

use crate::api::v1::dto::{
    validate::Check,
    view::{ListView, Record},
};
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct OrgUnitForm {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub rest: Record,
}

impl OrgUnitForm {
    pub fn validate(&self) -> Result<(), AppError> {
        Check::new()
            .required("name", &self.name, "Name is required")
            .finish()
    }
}

#[derive(Debug, Serialize, Default, PartialEq, Eq)]
pub struct OrgListActions {
    pub create: bool,
    pub edit: bool,
    pub delete: bool,
}

pub type OrgListView = ListView<Record, OrgListActions>;
