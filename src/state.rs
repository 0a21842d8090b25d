/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - session store / cookie 設定 / upstream client / role resolver / menu
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::{
    auth::RoleResolver,
    nav::MenuItem,
    session::{SessionCookie, SessionStore},
    upstream::UpstreamClient,
};

#[derive(Clone, Debug)]
pub struct AppState {
    pub sessions: SessionStore,
    pub cookie: SessionCookie,
    pub upstream: UpstreamClient,
    pub roles: RoleResolver,
    pub menu: Arc<Vec<MenuItem>>,
    pub login_path: Arc<str>,
}

impl AppState {
    pub fn new(
        sessions: SessionStore,
        cookie: SessionCookie,
        upstream: UpstreamClient,
        menu: Vec<MenuItem>,
        login_path: impl Into<Arc<str>>,
    ) -> Self {
        let roles = RoleResolver::new(sessions.clone());
        Self {
            sessions,
            cookie,
            upstream,
            roles,
            menu: Arc::new(menu),
            login_path: login_path.into(),
        }
    }
}
