/*
 * Responsibility
 * - AppError: every failure a handler can return
 * - IntoResponse (HTTP status / JSON error body)
 * - Conversions from the service-layer errors (upstream / session / guard)
 */
use std::collections::BTreeMap;

use axum::{
    Json,
    body::{Body, Bytes},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::nav::GuardDenied;
use crate::services::session::SessionError;
use crate::services::upstream::UpstreamError;

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

/// Field name → message.
pub type FieldErrors = BTreeMap<&'static str, String>;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

/// Marks a response whose session is gone. `middleware::session` completes it
/// with the login redirect and an expired session cookie.
#[derive(Debug, Clone)]
pub struct SessionEnded {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("not signed in")]
    Unauthenticated,
    #[error("session expired")]
    SessionExpired,
    #[error(transparent)]
    Forbidden(#[from] GuardDenied),
    #[error("upstream responded with {status}")]
    Upstream { status: StatusCode, body: Bytes },
    #[error("upstream unavailable")]
    UpstreamUnavailable,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn field(name: &'static str, message: impl Into<String>) -> Self {
        Self::Validation(FieldErrors::from([(name, message.into())]))
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_FAILED",
            AppError::Unauthenticated => "UNAUTHENTICATED",
            AppError::SessionExpired => "SESSION_EXPIRED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Upstream { .. } => "UPSTREAM_ERROR",
            AppError::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            AppError::Internal => "INTERNAL",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message, fields) = match self {
            // Backend rejections are handed to the browser unmodified.
            AppError::Upstream { status, body } => return raw_json(status, body),
            AppError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                "Please check the highlighted fields.".to_string(),
                Some(fields),
            ),
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Please log in to continue.".to_string(),
                None,
            ),
            AppError::SessionExpired => (
                StatusCode::UNAUTHORIZED,
                SESSION_EXPIRED_MESSAGE.to_string(),
                None,
            ),
            AppError::Forbidden(_) => (
                StatusCode::FORBIDDEN,
                "You do not have permission to perform this action.".to_string(),
                None,
            ),
            AppError::UpstreamUnavailable => (
                StatusCode::BAD_GATEWAY,
                "The HR service is unreachable. Please try again later.".to_string(),
                None,
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
                None,
            ),
        };

        let ended = (status == StatusCode::UNAUTHORIZED).then(|| SessionEnded {
            code,
            message: message.clone(),
        });

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message,
                fields,
                redirect_to: None,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(ended) = ended {
            response.extensions_mut().insert(ended);
        }
        response
    }
}

/// Upstream status and body, unmodified.
pub fn raw_json(status: StatusCode, body: Bytes) -> Response {
    let has_body = !body.is_empty();
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    if has_body {
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
    }
    response
}

impl From<UpstreamError> for AppError {
    fn from(e: UpstreamError) -> Self {
        match e {
            UpstreamError::NotSignedIn => AppError::Unauthenticated,
            UpstreamError::SessionExpired => AppError::SessionExpired,
            UpstreamError::Rejected { status, body } => AppError::Upstream { status, body },
            UpstreamError::Transport(err) => {
                tracing::warn!(error = %err, "upstream unreachable");
                AppError::UpstreamUnavailable
            }
            UpstreamError::Decode(reason) => {
                tracing::warn!(%reason, "upstream response could not be decoded");
                AppError::UpstreamUnavailable
            }
            UpstreamError::Session(err) => err.into(),
            UpstreamError::InvalidBaseUrl => {
                tracing::error!("upstream base url is not usable");
                AppError::Internal
            }
        }
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        tracing::error!(error = %e, "session store failure");
        AppError::Internal
    }
}
