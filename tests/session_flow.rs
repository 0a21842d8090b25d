mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode, header};
use axum::response::Response;
use serde_json::{Value, json};

use common::{
    FlakyCache, LOGIN_PATH, TestApp, read_json, session_cookie, session_id, set_cookie, token_for,
};

fn labels(nav: &Value) -> Vec<String> {
    nav["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["label"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn login_issues_cookie_and_me_shows_resolved_role() {
    let app = TestApp::spawn().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"accountEmail": "owner@acme.test", "password": common::PASSWORD})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let raw_cookie = set_cookie(&response).unwrap();
    assert!(raw_cookie.contains("HttpOnly"));
    assert!(raw_cookie.contains("SameSite=Lax"));
    assert!(raw_cookie.contains("Max-Age=600"));
    let cookie = session_cookie(&response).unwrap();

    let login = read_json(response).await;
    assert_eq!(login["signedIn"], true);
    assert_eq!(login["role"], "OWNER");

    // login is sent without a bearer token
    let hit = app.upstream.hits().into_iter().next().unwrap();
    assert_eq!(hit.path, "/auth/login");
    assert!(hit.bearer.is_none());

    let me = read_json(app.get("/api/v1/me", Some(&cookie)).await).await;
    assert_eq!(me["signedIn"], true);
    assert_eq!(me["accountEmail"], "owner@acme.test");
    assert_eq!(me["fullName"], "Test Person");
    assert_eq!(me["employeeId"], "emp-owner");
    assert_eq!(me["role"], "OWNER");

    let stored = app.state.sessions.load(&session_id(&cookie)).await.unwrap();
    assert_eq!(stored.unwrap().token, token_for("owner@acme.test").0);
}

#[tokio::test]
async fn failed_login_passes_upstream_rejection_through() {
    let app = TestApp::spawn().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"accountEmail": "owner@acme.test", "password": "nope-nope"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::LOCATION).is_none());
    assert!(set_cookie(&response).is_none());

    let body = read_json(response).await;
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn login_with_missing_fields_never_reaches_upstream() {
    let app = TestApp::spawn().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"accountEmail": "", "password": ""})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = read_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    assert_eq!(body["error"]["fields"]["accountEmail"], "Email is required");
    assert_eq!(body["error"]["fields"]["password"], "Password is required");
    assert!(app.upstream.hits().is_empty());
}

#[tokio::test]
async fn login_rotates_the_session_id() {
    let app = TestApp::spawn().await;

    let first = app.login("user@acme.test").await;
    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(&first),
            Some(json!({"accountEmail": "manager@acme.test", "password": common::PASSWORD})),
        )
        .await;
    let second = session_cookie(&response).unwrap();

    assert_ne!(first, second);
    let old = app.state.sessions.load(&session_id(&first)).await.unwrap();
    assert!(old.is_none());
}

#[tokio::test]
async fn signed_out_browser_sees_empty_nav_and_signed_out_me() {
    let app = TestApp::spawn().await;

    let me = read_json(app.get("/api/v1/me", None).await).await;
    assert_eq!(me["signedIn"], false);
    assert_eq!(me["role"], Value::Null);

    let nav = read_json(app.get("/api/v1/nav", None).await).await;
    assert_eq!(nav["role"], Value::Null);
    assert!(labels(&nav).is_empty());

    // unknown cookie values are treated as no session
    let nav = read_json(app.get("/api/v1/nav", Some("cetus_sid=garbage")).await).await;
    assert!(labels(&nav).is_empty());
}

#[tokio::test]
async fn nav_follows_the_role_in_the_token() {
    let app = TestApp::spawn().await;

    let user = app.login("user@acme.test").await;
    let nav = read_json(app.get("/api/v1/nav", Some(&user)).await).await;
    assert_eq!(nav["role"], "USER");
    let items = labels(&nav);
    assert!(items.contains(&"Leave".to_string()));
    assert!(!items.contains(&"Employees".to_string()));
    assert!(!items.contains(&"Department".to_string()));

    let owner = app.login("owner@acme.test").await;
    let nav = read_json(app.get("/api/v1/nav", Some(&owner)).await).await;
    let items = labels(&nav);
    assert!(items.contains(&"Employees".to_string()));
    assert!(items.contains(&"Salary Management".to_string()));
    assert!(items.contains(&"Department".to_string()));
}

#[tokio::test]
async fn token_without_role_shows_nothing_gated() {
    let app = TestApp::spawn().await;

    let cookie = app.login("nobody@acme.test").await;

    let me = read_json(app.get("/api/v1/me", Some(&cookie)).await).await;
    assert_eq!(me["signedIn"], true);
    assert_eq!(me["role"], Value::Null);

    let nav = read_json(app.get("/api/v1/nav", Some(&cookie)).await).await;
    assert!(labels(&nav).is_empty());

    let response = app.get("/api/v1/employees", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.upstream.hits_to(Method::GET, "/employees/"), 0);
}

#[tokio::test]
async fn upstream_401_ends_the_session_with_a_login_redirect() {
    let app = TestApp::spawn().await;

    let cookie = app.login("user@acme.test").await;
    let (token, _, _) = token_for("user@acme.test");
    app.upstream.revoke(&token);

    let response = app.get("/api/v1/attendance", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::LOCATION], LOGIN_PATH);
    assert!(set_cookie(&response).unwrap().contains("Max-Age=0"));

    let body = read_json(response).await;
    assert_eq!(body["error"]["code"], "SESSION_EXPIRED");
    assert_eq!(body["error"]["message"], "Session expired. Please log in again.");
    assert_eq!(body["error"]["redirect_to"], LOGIN_PATH);

    let stored = app.state.sessions.load(&session_id(&cookie)).await.unwrap();
    assert!(stored.is_none());

    // The stale cookie is now just "not signed in"; upstream is not called again.
    let calls = app.upstream.hits().len();
    let response = app.get("/api/v1/attendance", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::LOCATION], LOGIN_PATH);
    let body = read_json(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHENTICATED");
    assert_eq!(body["error"]["redirect_to"], LOGIN_PATH);
    assert_eq!(app.upstream.hits().len(), calls);

    let me = read_json(app.get("/api/v1/me", Some(&cookie)).await).await;
    assert_eq!(me["signedIn"], false);
}

async fn assert_session_expired(response: Response) {
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::LOCATION], LOGIN_PATH);
    assert!(set_cookie(&response).unwrap().contains("Max-Age=0"));
    let body = read_json(response).await;
    assert_eq!(body["error"]["code"], "SESSION_EXPIRED");
    assert_eq!(body["error"]["redirect_to"], LOGIN_PATH);
}

#[tokio::test]
async fn concurrent_requests_on_a_revoked_token_both_redirect() {
    let app = TestApp::spawn().await;

    let cookie = app.login("user@acme.test").await;
    let (token, _, _) = token_for("user@acme.test");
    app.upstream.revoke(&token);

    let (first, second) = tokio::join!(
        app.get("/api/v1/attendance", Some(&cookie)),
        app.get("/api/v1/attendance/today", Some(&cookie)),
    );
    assert_session_expired(first).await;
    assert_session_expired(second).await;

    // both calls reached upstream with the revoked token
    let rejected = app
        .upstream
        .hits()
        .iter()
        .filter(|h| h.bearer.as_deref() == Some(token.as_str()))
        .count();
    assert_eq!(rejected, 2);

    let id = session_id(&cookie);
    assert!(app.state.sessions.load(&id).await.unwrap().is_none());
    assert!(!app.state.sessions.clear(&id).await.unwrap());
}

#[tokio::test]
async fn session_store_outage_is_a_server_error_not_a_sign_out() {
    let cache = FlakyCache::default();
    let app = TestApp::spawn_with_cache(Arc::new(cache.clone())).await;

    let cookie = app.login("user@acme.test").await;
    let calls = app.upstream.hits().len();

    cache.fail_reads(true);
    let response = app.get("/api/v1/attendance", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(header::LOCATION).is_none());
    assert!(set_cookie(&response).is_none());
    let body = read_json(response).await;
    assert_eq!(body["error"]["code"], "INTERNAL");
    assert!(body["error"].get("redirect_to").is_none());
    assert_eq!(app.upstream.hits().len(), calls);

    // once the store is back the same cookie works again
    cache.fail_reads(false);
    let response = app.get("/api/v1/attendance", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn upstream_401_still_redirects_when_the_session_cannot_be_cleared() {
    let cache = FlakyCache::default();
    let app = TestApp::spawn_with_cache(Arc::new(cache.clone())).await;

    let cookie = app.login("user@acme.test").await;
    let (token, _, _) = token_for("user@acme.test");
    app.upstream.revoke(&token);

    cache.fail_deletes(true);
    let response = app.get("/api/v1/attendance", Some(&cookie)).await;
    assert_session_expired(response).await;
}

#[tokio::test]
async fn logout_clears_session_and_is_repeatable() {
    let app = TestApp::spawn().await;

    let cookie = app.login("user@acme.test").await;

    for _ in 0..2 {
        let response = app
            .request(Method::POST, "/api/v1/auth/logout", Some(&cookie), None)
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(set_cookie(&response).unwrap().contains("Max-Age=0"));
    }

    let me = read_json(app.get("/api/v1/me", Some(&cookie)).await).await;
    assert_eq!(me["signedIn"], false);
}

#[tokio::test]
async fn sign_up_is_validated_then_relayed_without_a_session() {
    let app = TestApp::spawn().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/sign-up",
            None,
            Some(json!({
                "accountEmail": "not-an-email",
                "password": "short",
                "firstName": "A",
                "lastName": "Lovelace",
                "organizationName": "Acme"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    let fields = body["error"]["fields"].as_object().unwrap();
    assert!(fields.contains_key("accountEmail"));
    assert!(fields.contains_key("password"));
    assert!(fields.contains_key("firstName"));
    assert!(!fields.contains_key("lastName"));
    assert!(app.upstream.hits().is_empty());

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/sign-up",
            None,
            Some(json!({
                "accountEmail": "ada@acme.test",
                "password": "longenough",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "organizationName": "Acme"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(set_cookie(&response).is_none());
    assert_eq!(app.upstream.hits_to(Method::POST, "/auth/sign-up"), 1);
}

#[tokio::test]
async fn health_needs_no_session() {
    let app = TestApp::spawn().await;
    let response = app.get("/api/v1/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({"status": "ok"}));
}
