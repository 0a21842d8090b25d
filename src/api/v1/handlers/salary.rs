/*
 * Responsibility
 * - 給与: 自分 / チーム (MANAGER 以上) / 全体 (ADMIN / OWNER)
 * - 給与計算 / 支払済み (ADMIN / OWNER, 支払済みボタンは PENDING 行のみ)
 */
use axum::{
    Json,
    extract::{Path, State},
    response::Response,
};
use reqwest::Method;
use serde_json::json;

use crate::api::v1::dto::salary::{CalculateSalaryRequest, SalaryListActions, SalaryListView};
use crate::api::v1::dto::view::{ListView, Record, text};
use crate::api::v1::extractors::{SessionCtx, SessionCtxExtractor};
use crate::api::v1::handlers::{fetch_page, relay, with_actions};
use crate::error::AppError;
use crate::services::nav::Action;
use crate::services::upstream::{Endpoint, Page, Payload};
use crate::state::AppState;

pub async fn my_salary(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
) -> Result<Json<Page<Record>>, AppError> {
    let id = ctx.require_id()?;
    let page = fetch_page(&state, id, &Endpoint::new(&["salary", "my-salary"])).await?;
    Ok(Json(page))
}

pub async fn team_salary(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
) -> Result<Json<SalaryListView>, AppError> {
    ctx.require_id()?;
    ctx.guard.require(Action::ViewTeamSalary)?;
    salary_view(&state, &ctx, "team-salary").await
}

pub async fn all_salary(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
) -> Result<Json<SalaryListView>, AppError> {
    ctx.require_id()?;
    ctx.guard.require(Action::ManageSalary)?;
    salary_view(&state, &ctx, "all").await
}

async fn salary_view(
    state: &AppState,
    ctx: &SessionCtx,
    segment: &str,
) -> Result<Json<SalaryListView>, AppError> {
    let id = ctx.require_id()?;
    let page = fetch_page(state, id, &Endpoint::new(&["salary", segment])).await?;
    let guard = &ctx.guard;
    let page = with_actions(page, |row| {
        guard.salary_row(text(row, "status").as_deref().unwrap_or_default())
    });

    Ok(Json(ListView::new(
        page,
        SalaryListActions {
            calculate: guard.can(Action::ManageSalary),
        },
    )))
}

pub async fn calculate_salary(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
    Json(req): Json<CalculateSalaryRequest>,
) -> Result<Response, AppError> {
    let id = ctx.require_id()?;
    ctx.guard.require(Action::ManageSalary)?;
    let payload = req.validate()?;

    let response = state
        .upstream
        .send(
            id,
            Method::POST,
            &Endpoint::new(&["salary", "calculate"]),
            Payload::json(&payload)?,
        )
        .await?;
    tracing::info!(month = %payload.month, year = payload.year, "salary calculation relayed");
    relay(response)
}

pub async fn mark_paid(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
    Path(salary_id): Path<String>,
) -> Result<Response, AppError> {
    let id = ctx.require_id()?;
    ctx.guard.require(Action::ManageSalary)?;

    let response = state
        .upstream
        .send(
            id,
            Method::PUT,
            &Endpoint::new(&["salary", salary_id.as_str(), "mark-paid"]),
            Payload::Json(json!({})),
        )
        .await?;
    relay(response)
}
