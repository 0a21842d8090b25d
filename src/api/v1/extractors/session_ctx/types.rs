/*
 * Responsibility
 * - Handler から見える「このリクエストのセッション」の型
 * - 読み取り専用: session を書き換えるのは login / logout handler と失効処理だけ
 */

use crate::error::AppError;
use crate::services::auth::RoleState;
use crate::services::nav::ViewGuard;
use crate::services::session::{Session, SessionId};

/// Session and visibility decisions for one request.
///
/// - `id` is the cookie value, present even when the store has nothing for it
/// - `session` is `None` when logged out (no entry, empty token, corrupt entry)
/// - `guard` is computed once per request and is authoritative for every
///   visibility decision in the response
/// - `store_failed` is set when the session store could not be read
#[derive(Debug, Clone)]
pub struct SessionCtx {
    pub id: Option<SessionId>,
    pub session: Option<Session>,
    pub guard: ViewGuard,
    pub store_failed: bool,
}

impl SessionCtx {
    pub fn anonymous() -> Self {
        Self {
            id: None,
            session: None,
            guard: ViewGuard::new(RoleState::Anonymous, None),
            store_failed: false,
        }
    }

    /// Session id of a signed-in browser, or `401 UNAUTHENTICATED`.
    /// A store outage is `500` so the browser keeps its session.
    pub fn require_id(&self) -> Result<&SessionId, AppError> {
        if self.store_failed {
            return Err(AppError::Internal);
        }
        match (&self.id, &self.session) {
            (Some(id), Some(_)) => Ok(id),
            _ => Err(AppError::Unauthenticated),
        }
    }

    pub fn role(&self) -> &RoleState {
        self.guard.role()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_outage_is_internal_not_signed_out() {
        let ctx = SessionCtx {
            id: Some(SessionId::generate()),
            store_failed: true,
            ..SessionCtx::anonymous()
        };
        assert!(matches!(ctx.require_id(), Err(AppError::Internal)));

        let ctx = SessionCtx {
            id: Some(SessionId::generate()),
            ..SessionCtx::anonymous()
        };
        assert!(matches!(ctx.require_id(), Err(AppError::Unauthenticated)));
    }
}
