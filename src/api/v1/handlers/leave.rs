/*
 * Responsibility
 * - 休暇申請の一覧: MANAGER 以上は全員分、それ以外は自分の分
 * - 申請 / 承認・却下 (承認・却下ボタンは PENDING 行のみ)
 */
use axum::{
    Json,
    extract::{Path, State},
    response::Response,
};
use reqwest::Method;

use crate::api::v1::dto::leave::{
    CreateLeaveRequest, LeaveListActions, LeaveListView, LeaveScope, LeaveStatusPayload,
    UpdateLeaveStatusRequest,
};
use crate::api::v1::dto::view::{ListView, text};
use crate::api::v1::extractors::SessionCtxExtractor;
use crate::api::v1::handlers::{fetch_page, relay, with_actions};
use crate::error::AppError;
use crate::services::nav::Action;
use crate::services::upstream::{Endpoint, ListData, Payload};
use crate::state::AppState;

pub async fn list_leave_requests(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
) -> Result<Json<LeaveListView>, AppError> {
    let id = ctx.require_id()?;
    let guard = &ctx.guard;

    // Nothing to show until the role is known.
    if guard.role().role().is_none() {
        return Ok(Json(ListView::new(
            ListData::Bare(Vec::new()).into_page(),
            LeaveListActions::default(),
        )));
    }

    let (scope, endpoint) = if guard.can(Action::ReviewLeave) {
        (LeaveScope::All, Endpoint::new(&["leave-requests"]))
    } else {
        (LeaveScope::Mine, Endpoint::new(&["leave-requests", "my"]))
    };

    let page = fetch_page(&state, id, &endpoint).await?;
    let page = with_actions(page, |row| {
        guard.leave_row(text(row, "status").as_deref().unwrap_or_default())
    });

    Ok(Json(ListView::new(
        page,
        LeaveListActions {
            request: guard.can(Action::RequestLeave),
            review: guard.can(Action::ReviewLeave),
            scope: Some(scope),
        },
    )))
}

pub async fn create_leave_request(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
    Json(req): Json<CreateLeaveRequest>,
) -> Result<Response, AppError> {
    let id = ctx.require_id()?;
    ctx.guard.require(Action::RequestLeave)?;
    let payload = req.validate()?;

    let response = state
        .upstream
        .send(
            id,
            Method::POST,
            &Endpoint::new(&["leave-requests"]),
            Payload::json(&payload)?,
        )
        .await?;
    relay(response)
}

pub async fn update_leave_status(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
    Path(leave_request_id): Path<String>,
    Json(req): Json<UpdateLeaveStatusRequest>,
) -> Result<Response, AppError> {
    let id = ctx.require_id()?;
    ctx.guard.require(Action::ReviewLeave)?;
    let status = req.validate()?;

    let response = state
        .upstream
        .send(
            id,
            Method::PUT,
            &Endpoint::new(&["leave-requests", leave_request_id.as_str(), "status"]),
            Payload::json(&LeaveStatusPayload { status })?,
        )
        .await?;
    tracing::info!(%leave_request_id, ?status, "leave decision relayed");
    relay(response)
}
