/*
 * Responsibility
 * - GET /nav: role で絞り込んだ menu (role 未解決なら空)
 */
use axum::{Json, extract::State, response::IntoResponse};

use crate::api::v1::dto::nav::NavResponse;
use crate::api::v1::extractors::SessionCtxExtractor;
use crate::services::nav::visible_items;
use crate::state::AppState;

pub async fn nav(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
) -> impl IntoResponse {
    let role = ctx.role();
    Json(NavResponse {
        role: role.role(),
        items: visible_items(role, &state.menu),
    })
    .into_response()
}
