/*
 * Responsibility
 * - POST /auth/login: upstream login → session 保存 → cookie 発行
 * - POST /auth/sign-up: upstream へ中継 (session は作らない)
 * - POST /auth/logout: session 削除 + cookie 失効 (何度呼んでも同じ結果)
 * - GET /me: navbar 用のユーザー情報
 */
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use reqwest::Method;

use crate::api::v1::dto::auth::{LoginData, LoginRequest, MeResponse, SignUpRequest};
use crate::api::v1::extractors::SessionCtxExtractor;
use crate::api::v1::handlers::relay;
use crate::error::AppError;
use crate::services::auth::{RoleState, role_from_token};
use crate::services::session::SessionId;
use crate::services::upstream::{Endpoint, Payload};
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    req.validate()?;

    let data: LoginData = state
        .upstream
        .send_anonymous(
            Method::POST,
            &Endpoint::new(&["auth", "login"]),
            Payload::json(&req)?,
        )
        .await?
        .into_data()?;

    let Some(session) = data.into_session() else {
        tracing::warn!("upstream login succeeded without a token");
        return Err(AppError::UpstreamUnavailable);
    };

    // Never reuse the id the browser came with.
    if let Some(previous) = ctx.id {
        state.sessions.clear(&previous).await?;
    }
    let id = SessionId::generate();
    state.sessions.save(&id, &session).await?;

    let cookie = state.cookie.issue(&id).map_err(|err| {
        tracing::error!(error = %err, "failed to build session cookie");
        AppError::Internal
    })?;

    let role = RoleState::from_resolved(role_from_token(&session.token));
    tracing::info!(
        session_id = %id,
        employee_id = %session.employee_id,
        role = role.role().unwrap_or("-"),
        "signed in"
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(MeResponse::from_session(&session, role.role())),
    )
        .into_response())
}

pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Result<Response, AppError> {
    req.validate()?;

    let response = state
        .upstream
        .send_anonymous(
            Method::POST,
            &Endpoint::new(&["auth", "sign-up"]),
            Payload::json(&req)?,
        )
        .await?;

    relay(response)
}

pub async fn logout(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
) -> Result<Response, AppError> {
    if let Some(id) = ctx.id {
        let cleared = state.sessions.clear(&id).await?;
        tracing::info!(session_id = %id, cleared, "signed out");
    }

    let expired = state.cookie.expire().map_err(|err| {
        tracing::error!(error = %err, "failed to build expired session cookie");
        AppError::Internal
    })?;

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, expired)]).into_response())
}

pub async fn me(SessionCtxExtractor(ctx): SessionCtxExtractor) -> Json<MeResponse> {
    let me = match &ctx.session {
        Some(session) => MeResponse::from_session(session, ctx.role().role()),
        None => MeResponse::signed_out(),
    };
    Json(me)
}
