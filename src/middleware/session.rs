//! Session-ended responses → login redirect.
//!
//! Handlers only return `AppError::Unauthenticated` / `AppError::SessionExpired`.
//! This layer turns any such response into the redirect the browser shell acts
//! on: `Location` + `redirect_to` pointing at the login entry point, and the
//! session cookie expired. The store entry itself is already cleared by the
//! upstream client.

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{HeaderValue, Request, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::error::{ErrorBody, ErrorResponse, SessionEnded};
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, session_ended))
}

async fn session_ended(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let response = next.run(req).await;

    let Some(ended) = response.extensions().get::<SessionEnded>().cloned() else {
        return response;
    };

    redirect_to_login(&state, ended)
}

fn redirect_to_login(state: &AppState, ended: SessionEnded) -> Response {
    let body = ErrorResponse {
        error: ErrorBody {
            code: ended.code,
            message: ended.message,
            fields: None,
            redirect_to: Some(state.login_path.to_string()),
        },
    };
    let mut response = (StatusCode::UNAUTHORIZED, Json(body)).into_response();

    let headers = response.headers_mut();
    match HeaderValue::from_str(&state.login_path) {
        Ok(location) => {
            headers.insert(header::LOCATION, location);
        }
        Err(err) => tracing::error!(error = %err, "login path is not a valid header value"),
    }
    match state.cookie.expire() {
        Ok(cookie) => {
            headers.append(header::SET_COOKIE, cookie);
        }
        Err(err) => tracing::error!(error = %err, "failed to build expired session cookie"),
    }

    response
}
