/*
 * Responsibility
 * - 銀行口座 (財務情報): 本人または ADMIN / OWNER のみ
 * - GET /employees/{id}/bank-accounts, POST /bank-accounts, PUT|DELETE /bank-accounts/{id}
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use reqwest::Method;
use serde::Deserialize;

use crate::api::v1::dto::bank_accounts::BankAccountForm;
use crate::api::v1::dto::view::Record;
use crate::api::v1::extractors::{SessionCtx, SessionCtxExtractor};
use crate::api::v1::handlers::{fetch_page, relay};
use crate::error::AppError;
use crate::services::nav::{Action, GuardDenied};
use crate::services::upstream::{Endpoint, Page, Payload};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    pub employee_id: Option<String>,
}

pub async fn list_bank_accounts(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
    Path(employee_id): Path<String>,
) -> Result<Json<Page<Record>>, AppError> {
    let id = ctx.require_id()?;
    require_financials(&ctx, Some(&employee_id))?;

    let page = fetch_page(
        &state,
        id,
        &Endpoint::new(&["bank-accounts", employee_id.as_str()]),
    )
    .await?;

    Ok(Json(page))
}

pub async fn create_bank_account(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
    Json(form): Json<BankAccountForm>,
) -> Result<Response, AppError> {
    let id = ctx.require_id()?;
    let Some(owner) = form.owner() else {
        return Err(AppError::field("employeeId", "Employee is required"));
    };
    require_financials(&ctx, Some(owner))?;
    form.validate()?;

    let response = state
        .upstream
        .send(
            id,
            Method::POST,
            &Endpoint::new(&["bank-accounts"]),
            Payload::json(&form)?,
        )
        .await?;
    relay(response)
}

pub async fn update_bank_account(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
    Path(account_id): Path<String>,
    Json(form): Json<BankAccountForm>,
) -> Result<Response, AppError> {
    let id = ctx.require_id()?;
    require_financials(&ctx, form.owner())?;
    form.validate()?;

    let response = state
        .upstream
        .send(
            id,
            Method::PUT,
            &Endpoint::new(&["bank-accounts", account_id.as_str()]),
            Payload::json(&form)?,
        )
        .await?;
    relay(response)
}

pub async fn delete_bank_account(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
    Path(account_id): Path<String>,
    Query(owner): Query<OwnerQuery>,
) -> Result<Response, AppError> {
    let id = ctx.require_id()?;
    require_financials(&ctx, owner.employee_id.as_deref())?;

    let response = state
        .upstream
        .send(
            id,
            Method::DELETE,
            &Endpoint::new(&["bank-accounts", account_id.as_str()]),
            Payload::Empty,
        )
        .await?;
    relay(response)
}

/// Own accounts, or everyone's for ADMIN / OWNER. Without a known owner only
/// the latter applies.
fn require_financials(ctx: &SessionCtx, owner: Option<&str>) -> Result<(), AppError> {
    let allowed = match owner {
        Some(owner) => ctx.guard.can_view_financials_of(owner),
        None => ctx.guard.can(Action::ViewFinancials),
    };
    if allowed {
        Ok(())
    } else {
        Err(GuardDenied {
            action: Action::ViewFinancials,
        }
        .into())
    }
}
