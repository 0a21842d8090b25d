/*
 * Responsibility
 * - handler 共通: upstream 一覧の取得、upstream 応答の中継、行ごとの action 付与
 */
use axum::response::Response;

use crate::api::v1::dto::view::{Record, Row};
use crate::error::{AppError, raw_json};
use crate::services::session::SessionId;
use crate::services::upstream::{Endpoint, ListData, Page, UpstreamResponse};
use crate::state::AppState;

pub mod attendance;
pub mod auth;
pub mod bank_accounts;
pub mod employees;
pub mod health;
pub mod leave;
pub mod nav;
pub mod org;
pub mod salary;

/// GET a list endpoint. Bare and paginated `data` both become a page;
/// a missing `data` is an empty page.
pub(crate) async fn fetch_page(
    state: &AppState,
    session_id: &SessionId,
    endpoint: &Endpoint,
) -> Result<Page<Record>, AppError> {
    let envelope = state
        .upstream
        .get(session_id, endpoint)
        .await?
        .error_for_status()?
        .envelope::<ListData<Record>>()?;

    Ok(envelope
        .data
        .unwrap_or_else(|| ListData::Bare(Vec::new()))
        .into_page())
}

/// Successful upstream answer → the browser, status and body as-is.
pub(crate) fn relay(response: UpstreamResponse) -> Result<Response, AppError> {
    let response = response.error_for_status()?;
    Ok(raw_json(response.status, response.body))
}

pub(crate) fn with_actions<A>(
    page: Page<Record>,
    mut actions: impl FnMut(&Record) -> A,
) -> Page<Row<A>> {
    page.map_items(|data| Row {
        actions: actions(&data),
        data,
    })
}
