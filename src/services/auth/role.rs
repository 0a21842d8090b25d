//! Role resolution from session-token claims.
//!
//! Different backend versions put the role in different places. The canonical
//! field is the `groups` array; `role` (scalar) and `roles` (array) are
//! tolerated. The first non-empty match in `ROLE_SOURCES` order wins.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::services::auth::claims::{Claims, decode_claims};
use crate::services::session::{Session, SessionId, SessionStore};

/// Where a role can live inside the claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSource {
    /// `role: "ADMIN"`
    RoleScalar,
    /// `roles: ["ADMIN", ...]`, first element
    RolesFirst,
    /// `groups: ["ADMIN", ...]`, first element
    GroupsFirst,
}

pub const ROLE_SOURCES: [RoleSource; 3] = [
    RoleSource::RoleScalar,
    RoleSource::RolesFirst,
    RoleSource::GroupsFirst,
];

impl RoleSource {
    fn extract<'a>(&self, claims: &'a Claims) -> Option<&'a str> {
        let candidate = match self {
            RoleSource::RoleScalar => claims.role.as_deref(),
            RoleSource::RolesFirst => claims.roles.first().map(String::as_str),
            RoleSource::GroupsFirst => claims.groups.first().map(String::as_str),
        };
        candidate.filter(|s| !s.trim().is_empty())
    }
}

/// Resolve the role from already-decoded claims. The value is returned as-is;
/// comparisons normalize case.
pub fn resolve_role(claims: &Claims) -> Option<String> {
    ROLE_SOURCES
        .iter()
        .find_map(|source| source.extract(claims))
        .map(str::to_string)
}

/// Resolve the role straight from a token string. Malformed tokens yield no role.
pub fn role_from_token(token: &str) -> Option<String> {
    decode_claims(token).as_ref().and_then(resolve_role)
}

/// Case-insensitive membership of `role` in `allowed`. No role is never a member.
pub fn has_any_role<S: AsRef<str>>(role: Option<&str>, allowed: &[S]) -> bool {
    let Some(role) = role.map(str::trim).filter(|r| !r.is_empty()) else {
        return false;
    };
    allowed
        .iter()
        .any(|candidate| candidate.as_ref().eq_ignore_ascii_case(role))
}

/// Known role vocabulary shared with the backend.
///
/// Gating is expressed with per-action allow-lists (see `services::nav::Action`),
/// never with a rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Manager,
    Admin,
    Owner,
}

impl Role {
    /// Parse role from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Role> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" => Some(Role::User),
            "MANAGER" => Some(Role::Manager),
            "ADMIN" => Some(Role::Admin),
            "OWNER" => Some(Role::Owner),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Manager => "MANAGER",
            Role::Admin => "ADMIN",
            Role::Owner => "OWNER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role as seen by one render pass.
///
/// `Pending` exists for callers that render before resolution finished;
/// every visibility check treats it like `Anonymous`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleState {
    Pending,
    Anonymous,
    Resolved(String),
}

impl RoleState {
    pub fn from_resolved(role: Option<String>) -> Self {
        match role {
            Some(r) if !r.trim().is_empty() => RoleState::Resolved(r.trim().to_ascii_uppercase()),
            _ => RoleState::Anonymous,
        }
    }

    /// Uppercase-normalized role, only once resolved.
    pub fn role(&self) -> Option<&str> {
        match self {
            RoleState::Resolved(r) => Some(r.as_str()),
            RoleState::Pending | RoleState::Anonymous => None,
        }
    }

    pub fn is_any<S: AsRef<str>>(&self, allowed: &[S]) -> bool {
        has_any_role(self.role(), allowed)
    }
}

/// Session read for one request together with its resolved role.
///
/// `store_failed` tells a store outage apart from a missing session; the role
/// is `Anonymous` either way.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub session: Option<Session>,
    pub role: RoleState,
    pub store_failed: bool,
}

impl ResolvedSession {
    fn anonymous() -> Self {
        Self {
            session: None,
            role: RoleState::Anonymous,
            store_failed: false,
        }
    }
}

/// Reads the token for a browser session and resolves its role.
///
/// Never fails: a missing session, missing token, undecodable token or a
/// store error all resolve to `RoleState::Anonymous`. A store error is
/// additionally flagged so callers can answer 500 instead of signing out.
#[derive(Clone, Debug)]
pub struct RoleResolver {
    sessions: SessionStore,
}

impl RoleResolver {
    pub fn new(sessions: SessionStore) -> Self {
        Self { sessions }
    }

    pub async fn resolve(&self, session_id: Option<&SessionId>) -> RoleState {
        self.resolve_session(session_id).await.role
    }

    pub async fn resolve_session(&self, session_id: Option<&SessionId>) -> ResolvedSession {
        let Some(id) = session_id else {
            return ResolvedSession::anonymous();
        };

        let session = match self.sessions.load(id).await {
            Ok(Some(session)) => session,
            Ok(None) => {
                debug!(session_id = %id, "no token for session");
                return ResolvedSession::anonymous();
            }
            Err(err) => {
                warn!(session_id = %id, error = %err, "session store read failed; no role for this request");
                return ResolvedSession {
                    store_failed: true,
                    ..ResolvedSession::anonymous()
                };
            }
        };

        let role = RoleState::from_resolved(role_from_token(&session.token));
        ResolvedSession {
            session: Some(session),
            role,
            store_failed: false,
        }
    }
}
