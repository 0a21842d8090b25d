/*
 * Responsibility
 * - 自分の勤怠: 履歴 (paging) / 当日 / 出勤 / 退勤
 */
use axum::{
    Json,
    extract::{Query, State},
    response::Response,
};
use chrono::{SecondsFormat, Utc};
use reqwest::Method;
use serde_json::json;

use crate::api::v1::dto::attendance::{PageQuery, TodayView};
use crate::api::v1::dto::view::Record;
use crate::api::v1::extractors::SessionCtxExtractor;
use crate::api::v1::handlers::{fetch_page, relay};
use crate::error::AppError;
use crate::services::session::SessionId;
use crate::services::upstream::{Endpoint, Page, Payload};
use crate::state::AppState;

fn my_attendance(page: u32, size: u32) -> Endpoint {
    Endpoint::new(&["attendance", "my-attendance"])
        .with_query("page", page)
        .with_query("size", size)
}

pub async fn list_attendance(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Record>>, AppError> {
    let id = ctx.require_id()?;
    let page = fetch_page(&state, id, &my_attendance(query.page(), query.size())).await?;
    Ok(Json(page))
}

/// Today's record from the newest page (a re-check-in yields several).
pub async fn today(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
) -> Result<Json<TodayView>, AppError> {
    let id = ctx.require_id()?;
    let page = fetch_page(&state, id, &my_attendance(0, 10)).await?;
    Ok(Json(TodayView::pick(Utc::now().date_naive(), page.items)))
}

pub async fn check_in(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
) -> Result<Response, AppError> {
    let id = ctx.require_id()?;
    stamp(&state, id, "check-in", "checkInTime").await
}

pub async fn check_out(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
) -> Result<Response, AppError> {
    let id = ctx.require_id()?;
    stamp(&state, id, "check-out", "checkOutTime").await
}

async fn stamp(
    state: &AppState,
    id: &SessionId,
    segment: &str,
    field: &str,
) -> Result<Response, AppError> {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let response = state
        .upstream
        .send(
            id,
            Method::POST,
            &Endpoint::new(&["attendance", segment]),
            Payload::Json(json!({ field: now })),
        )
        .await?;
    relay(response)
}
