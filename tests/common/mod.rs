// Test harness:
// - a stub HR API on an ephemeral port (records every call it receives)
// - the dashboard router wired against it, driven with tower::ServiceExt::oneshot
// - graceful shutdown so stub servers don't linger between tests
#![allow(dead_code)]

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    body::{Body, Bytes, to_bytes},
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower::ServiceExt;
use url::Url;

use cetus_dashboard::app::{build_router, build_state};
use cetus_dashboard::config::{AppEnv, Config, SessionBackend};
use cetus_dashboard::services::cache::client::CacheResult;
use cetus_dashboard::services::cache::{CacheClient, CacheError, MemoryCache};
use cetus_dashboard::services::nav::default_menu;
use cetus_dashboard::services::session::{SessionCookie, SessionId, SessionStore};
use cetus_dashboard::services::upstream::UpstreamClient;
use cetus_dashboard::state::AppState;

pub const PASSWORD: &str = "secret123";
pub const COOKIE_NAME: &str = "cetus_sid";
pub const LOGIN_PATH: &str = "/login";

/// HS256 token with the given claims. The dashboard never verifies the
/// signature, so any key will do.
pub fn mint_token(claims: Value) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"stub-upstream-secret"),
    )
    .unwrap()
}

/// `owner@acme.test` → OWNER / `emp-owner`. `nobody@...` gets a token without any role.
pub fn token_for(email: &str) -> (String, Option<&'static str>, String) {
    let local = email.split('@').next().unwrap_or_default();
    let role = match local {
        "owner" => Some("OWNER"),
        "admin" => Some("ADMIN"),
        "manager" => Some("MANAGER"),
        "user" => Some("USER"),
        _ => None,
    };
    let employee_id = format!("emp-{local}");

    let mut claims = json!({
        "sub": email,
        "employeeId": employee_id,
        "organizationId": "org-1",
        "exp": 4_102_444_800i64,
    });
    if let Some(role) = role {
        claims["groups"] = json!([role]);
    }
    (mint_token(claims), role, employee_id)
}

#[derive(Debug, Clone)]
pub struct Hit {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub bearer: Option<String>,
    pub body: Value,
}

/// In-process stand-in for the HR REST API.
#[derive(Clone, Default)]
pub struct StubUpstream {
    hits: Arc<Mutex<Vec<Hit>>>,
    revoked: Arc<Mutex<HashSet<String>>>,
}

impl StubUpstream {
    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hits_to(&self, method: Method, path: &str) -> usize {
        self.hits()
            .iter()
            .filter(|h| h.method == method && h.path == path)
            .count()
    }

    /// Every later call carrying this token gets a 401.
    pub fn revoke(&self, token: &str) {
        self.revoked.lock().unwrap().insert(token.to_string());
    }

    fn record(&self, hit: Hit) {
        self.hits.lock().unwrap().push(hit);
    }

    fn is_revoked(&self, token: &str) -> bool {
        self.revoked.lock().unwrap().contains(token)
    }

    fn router(self) -> Router {
        Router::new().fallback(stub_handler).with_state(self)
    }
}

fn ok(data: Value) -> Response {
    (
        StatusCode::OK,
        Json(json!({"success": true, "code": 200, "message": "ok", "data": data})),
    )
        .into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({"success": false, "code": status.as_u16(), "message": message})),
    )
        .into_response()
}

fn employees() -> Value {
    json!([
        {"employeeId": "emp-owner", "firstName": "Olivia", "lastName": "Owner", "accountEmail": "owner@acme.test"},
        {"employeeId": "emp-2", "firstName": "Bao", "lastName": "Tran", "accountEmail": "bao@acme.test"},
        {"employeeId": "emp-3", "firstName": "Chidi", "lastName": "Okafor", "accountEmail": null},
    ])
}

async fn stub_handler(
    State(stub): State<StubUpstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let path = uri.path().to_string();

    stub.record(Hit {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        bearer: bearer.clone(),
        body: body.clone(),
    });

    let route = (method.as_str(), path.as_str());
    if route == ("POST", "/auth/login") {
        let email = body["accountEmail"].as_str().unwrap_or_default();
        if body["password"] != PASSWORD {
            return fail(StatusCode::UNAUTHORIZED, "Invalid credentials");
        }
        let (token, role, employee_id) = token_for(email);
        return ok(json!({
            "token": token,
            "accountEmail": email,
            "firstName": "Test",
            "lastName": "Person",
            "employeeId": employee_id,
            "role": role,
        }));
    }
    if route == ("POST", "/auth/sign-up") {
        return (
            StatusCode::CREATED,
            Json(json!({"success": true, "code": 201, "message": "Organization created"})),
        )
            .into_response();
    }

    match bearer.as_deref() {
        None => return fail(StatusCode::UNAUTHORIZED, "Missing token"),
        Some(token) if stub.is_revoked(token) => {
            // Slow rejection so that concurrent calls with the same token all get here.
            tokio::time::sleep(Duration::from_millis(100)).await;
            return fail(StatusCode::UNAUTHORIZED, "Token expired");
        }
        Some(_) => {}
    }

    match route {
        ("GET", "/employees/") => ok(json!({"items": employees(), "totalPages": 1})),
        ("GET", "/employees/emp-3") => ok(employees()[2].clone()),
        ("GET", "/employees/emp-2") => ok(employees()[1].clone()),
        ("GET", p) if p.starts_with("/employees/profile/") => ok(json!({
            "avatarContentType": "image/png",
            "avatarImage": "iVBORw0KGgo=",
        })),
        ("GET", "/job-titles") => ok(json!([{"id": 1, "name": "Engineer"}])),
        ("GET", "/teams") => ok(json!([{"id": 7, "name": "Platform"}])),
        ("GET", "/departments/") => ok(json!([{"id": 3, "name": "R&D"}])),
        ("GET", "/leave-requests") => ok(json!({
            "items": [
                {"id": "lr-1", "employeeId": "emp-2", "status": "PENDING"},
                {"id": "lr-2", "employeeId": "emp-3", "status": "APPROVED"},
            ],
            "totalPages": 1,
        })),
        ("GET", "/leave-requests/my") => ok(json!({
            "items": [{"id": "lr-9", "employeeId": "emp-user", "status": "PENDING"}],
            "totalPages": 1,
        })),
        ("GET", "/attendance/my-attendance") => ok(json!({
            "items": [{
                "id": "a-1",
                "attendanceDate": chrono::Utc::now().date_naive().to_string(),
                "checkInTime": "09:00",
                "checkOutTime": null,
            }],
            "totalPages": 4,
            "totalElements": 31,
        })),
        ("GET", "/salary/all") => ok(json!([
            {"id": "s-1", "status": "PENDING", "amount": 1200},
            {"id": "s-2", "status": "PAID", "amount": 1300},
        ])),
        ("GET", p) if p.starts_with("/bank-accounts/") => ok(json!([
            {"id": "ba-1", "bankName": "Acme Bank", "accountNumber": "0001"},
        ])),
        ("POST", _) => (
            StatusCode::CREATED,
            Json(json!({"success": true, "code": 201, "message": "created", "data": body})),
        )
            .into_response(),
        ("PUT", _) | ("DELETE", _) => ok(Value::Null),
        _ => fail(StatusCode::NOT_FOUND, "Not found"),
    }
}

pub fn spawn_axum_with_shutdown(
    listener: TcpListener,
    router: Router,
) -> (oneshot::Sender<()>, JoinHandle<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        let serve = axum::serve(listener, router.into_make_service());
        let _ = serve
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await;
    });
    (shutdown_tx, handle)
}

pub fn test_config(api_base_url: Url) -> Config {
    Config {
        addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        app_env: AppEnv::Development,
        cors_allowed_origins: Vec::new(),
        api_base_url,
        upstream_timeout: Some(Duration::from_secs(2)),
        login_path: LOGIN_PATH.to_string(),
        session_cookie_name: COOKIE_NAME.to_string(),
        session_ttl: Duration::from_secs(600),
        session_backend: SessionBackend::Memory,
        nav_menu_path: None,
    }
}

/// Memory cache whose reads or deletes can be switched to fail at runtime.
#[derive(Clone, Default)]
pub struct FlakyCache {
    inner: Arc<MemoryCache>,
    pub fail_reads: Arc<AtomicBool>,
    pub fail_deletes: Arc<AtomicBool>,
}

#[async_trait::async_trait]
impl CacheClient for FlakyCache {
    fn backend_name(&self) -> &'static str {
        "flaky"
    }

    async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::BackendConnection("connection refused".into()));
        }
        self.inner.get_string(key).await
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.inner.set_with_ttl(key, value, ttl).await
    }

    async fn del(&self, key: &str) -> CacheResult<u64> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(CacheError::BackendCommand("READONLY replica".into()));
        }
        self.inner.del(key).await
    }
}

impl FlakyCache {
    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, on: bool) {
        self.fail_deletes.store(on, Ordering::SeqCst);
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub upstream: StubUpstream,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let (upstream, base, shutdown) = spawn_stub().await;
        let config = test_config(base);
        let state = build_state(&config).await.unwrap();
        let router = build_router(state.clone(), &config);

        Self {
            router,
            state,
            upstream,
            shutdown: Some(shutdown),
        }
    }

    /// Same wiring as `spawn`, but sessions live in the given cache.
    pub async fn spawn_with_cache(cache: Arc<dyn CacheClient>) -> Self {
        let (upstream, base, shutdown) = spawn_stub().await;
        let config = test_config(base);

        let sessions = SessionStore::new(cache, config.session_ttl);
        let cookie = SessionCookie::new(COOKIE_NAME, false, config.session_ttl);
        let client =
            UpstreamClient::new(config.api_base_url.clone(), sessions.clone(), config.upstream_timeout)
                .unwrap();
        let state = AppState::new(sessions, cookie, client, default_menu(), LOGIN_PATH);
        let router = build_router(state.clone(), &config);

        Self {
            router,
            state,
            upstream,
            shutdown: Some(shutdown),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match body {
            Some(body) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };
        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response {
        self.request(Method::GET, path, cookie, None).await
    }

    /// Sign in through the dashboard; returns the `Cookie` header value to send back.
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({"accountEmail": email, "password": PASSWORD})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK, "login for {email}");
        session_cookie(&response).expect("login sets the session cookie")
    }
}

async fn spawn_stub() -> (StubUpstream, Url, oneshot::Sender<()>) {
    let upstream = StubUpstream::default();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown, _handle) = spawn_axum_with_shutdown(listener, upstream.clone().router());
    let base = Url::parse(&format!("http://{addr}/")).unwrap();
    (upstream, base, shutdown)
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// `cetus_sid=<id>` from the response's Set-Cookie, if it issues one.
pub fn session_cookie(response: &Response) -> Option<String> {
    set_cookie(response)
        .and_then(|v| v.split(';').next().map(str::to_string))
        .filter(|pair| pair.len() > COOKIE_NAME.len() + 1)
}

pub fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(COOKIE_NAME))
        .map(str::to_string)
}

pub fn session_id(cookie: &str) -> SessionId {
    let value = cookie.split_once('=').map(|(_, v)| v).unwrap_or_default();
    SessionId::parse(value).unwrap()
}

pub async fn read_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
