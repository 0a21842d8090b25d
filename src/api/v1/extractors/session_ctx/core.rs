use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::services::nav::ViewGuard;
use crate::state::AppState;

use super::SessionCtx;

/// Handler で SessionCtx を受け取るための extractor
/// 失敗しない: cookie が無い・壊れている・store に無い場合は未ログインの SessionCtx になる
pub struct SessionCtxExtractor(pub SessionCtx);

impl FromRequestParts<AppState> for SessionCtxExtractor
where
    AppState: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(id) = state.cookie.read(&parts.headers) else {
            return Ok(SessionCtxExtractor(SessionCtx::anonymous()));
        };

        let resolved = state.roles.resolve_session(Some(&id)).await;
        let employee_id = resolved
            .session
            .as_ref()
            .map(|s| s.employee_id.clone());

        tracing::debug!(
            session_id = %id,
            signed_in = resolved.session.is_some(),
            store_failed = resolved.store_failed,
            role = resolved.role.role().unwrap_or("-"),
            "session resolved"
        );

        Ok(SessionCtxExtractor(SessionCtx {
            id: Some(id),
            session: resolved.session,
            guard: ViewGuard::new(resolved.role, employee_id),
            store_failed: resolved.store_failed,
        }))
    }
}
