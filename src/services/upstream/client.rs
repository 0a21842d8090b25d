//! Authenticated calls to the HR REST API.
//!
//! Responsibility:
//! - Attach `Authorization: Bearer <token>` read from the session store at call time
//! - Central session expiry: an upstream 401 clears the session and fails with
//!   `UpstreamError::SessionExpired` so handlers never deal with 401 themselves
//! - Hand every other status back unmodified (no retry, no backoff)

use std::fmt;
use std::time::Duration;

use axum::body::Bytes;
use reqwest::{Method, RequestBuilder, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};
use url::Url;

use crate::services::session::{SessionError, SessionId, SessionStore};
use crate::services::upstream::envelope::Envelope;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("not signed in")]
    NotSignedIn,
    #[error("session expired")]
    SessionExpired,
    #[error("upstream responded with {status}")]
    Rejected { status: StatusCode, body: Bytes },
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream base url cannot carry a path")]
    InvalidBaseUrl,
    #[error("unexpected upstream response: {0}")]
    Decode(String),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Request body. File uploads are not proxied.
#[derive(Debug, Clone)]
pub enum Payload {
    Empty,
    Json(Value),
}

impl Payload {
    pub fn json<T: serde::Serialize>(body: &T) -> Result<Self, UpstreamError> {
        serde_json::to_value(body)
            .map(Payload::Json)
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

/// Upstream path + query. Segments are percent-encoded when joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl Endpoint {
    pub fn new<S: AsRef<str>>(segments: &[S]) -> Self {
        Self {
            segments: segments.iter().map(|s| s.as_ref().to_string()).collect(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    fn url(&self, base: &Url) -> Result<Url, UpstreamError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidBaseUrl)?
            .pop_if_empty()
            .extend(&self.segments);
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Turn a non-2xx response into `UpstreamError::Rejected`, keeping status and body.
    pub fn error_for_status(self) -> Result<Self, UpstreamError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(UpstreamError::Rejected {
                status: self.status,
                body: self.body,
            })
        }
    }

    pub fn envelope<T: DeserializeOwned>(&self) -> Result<Envelope<T>, UpstreamError> {
        serde_json::from_slice(&self.body).map_err(|e| UpstreamError::Decode(e.to_string()))
    }

    /// `data` of a successful envelope.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, UpstreamError> {
        self.error_for_status()?
            .envelope::<T>()?
            .data
            .ok_or_else(|| UpstreamError::Decode("envelope has no data".to_string()))
    }
}

#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
    sessions: SessionStore,
}

impl fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl UpstreamClient {
    /// `timeout = None` leaves upstream calls unbounded; the call is still
    /// cancelled when the browser abandons the request.
    pub fn new(
        base_url: Url,
        sessions: SessionStore,
        timeout: Option<Duration>,
    ) -> Result<Self, UpstreamError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidBaseUrl);
        }

        Ok(Self {
            http,
            base_url,
            sessions,
        })
    }

    /// Call upstream on behalf of a signed-in browser session.
    pub async fn send(
        &self,
        session_id: &SessionId,
        method: Method,
        endpoint: &Endpoint,
        payload: Payload,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let token = self
            .sessions
            .token(session_id)
            .await?
            .ok_or(UpstreamError::NotSignedIn)?;

        let request = self
            .request(method.clone(), endpoint, payload)?
            .bearer_auth(token);
        let response = self.execute(request, &method, endpoint).await?;

        if response.status == StatusCode::UNAUTHORIZED {
            // The browser is signed out even when the store entry cannot be removed.
            match self.sessions.clear(session_id).await {
                Ok(cleared) => warn!(
                    session_id = %session_id,
                    %method,
                    path = %endpoint,
                    cleared,
                    "upstream rejected the session token; signing out"
                ),
                Err(err) => error!(
                    session_id = %session_id,
                    %method,
                    path = %endpoint,
                    error = %err,
                    "upstream rejected the session token; clearing the session failed"
                ),
            }
            return Err(UpstreamError::SessionExpired);
        }

        Ok(response)
    }

    pub async fn get(
        &self,
        session_id: &SessionId,
        endpoint: &Endpoint,
    ) -> Result<UpstreamResponse, UpstreamError> {
        self.send(session_id, Method::GET, endpoint, Payload::Empty)
            .await
    }

    /// Call upstream without a token (login, sign-up). Never touches the session store.
    pub async fn send_anonymous(
        &self,
        method: Method,
        endpoint: &Endpoint,
        payload: Payload,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let request = self.request(method.clone(), endpoint, payload)?;
        self.execute(request, &method, endpoint).await
    }

    fn request(
        &self,
        method: Method,
        endpoint: &Endpoint,
        payload: Payload,
    ) -> Result<RequestBuilder, UpstreamError> {
        let url = endpoint.url(&self.base_url)?;
        let request = self
            .http
            .request(method, url)
            .header(header::CONTENT_TYPE, "application/json");

        Ok(match payload {
            Payload::Empty => request,
            Payload::Json(body) => request.json(&body),
        })
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        method: &Method,
        endpoint: &Endpoint,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let response = request.send().await.map_err(|e| {
            error!(%method, path = %endpoint, error = %e, "upstream request failed");
            UpstreamError::Transport(e)
        })?;

        let status = response.status();
        let body = response.bytes().await?;
        debug!(%method, path = %endpoint, status = status.as_u16(), "upstream response");

        Ok(UpstreamResponse { status, body })
    }
}
