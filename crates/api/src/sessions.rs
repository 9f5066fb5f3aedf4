//! Live client sessions keyed by opaque bearer token.
//!
//! Token issuance happens in the authentication layer; it calls
//! [`SessionRegistry::open`] once credentials check out. Each session carries
//! its own idle timer, and expiry tears the credentials down.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tenantry_auth::{AuthSession, Principal};
use tenantry_session::{SessionPolicy, SessionState, SessionTimers};

type SessionMap = Arc<Mutex<HashMap<String, AuthSession>>>;

pub struct SessionRegistry {
    sessions: SessionMap,
    timers: SessionTimers<String>,
}

impl SessionRegistry {
    pub fn new(policy: SessionPolicy) -> Self {
        let sessions: SessionMap = Arc::new(Mutex::new(HashMap::new()));
        let on_expired = {
            let sessions = Arc::clone(&sessions);
            Arc::new(move |token: &String| {
                let removed = sessions
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(token);
                if let Some(mut session) = removed {
                    session.logout();
                }
            })
        };

        Self {
            sessions,
            timers: SessionTimers::new(policy, on_expired),
        }
    }

    /// Register an authenticated session and start its idle timer.
    ///
    /// Re-opening an existing token replaces the session and restarts its
    /// timer. Must be called from within a tokio runtime.
    pub fn open(&self, token: impl Into<String>, principal: Principal) {
        let token = token.into();
        let mut session = AuthSession::anonymous();
        session.login(principal);

        // Timer first: a stale expiry for this token either loses the
        // generation check or finishes its teardown before the insert.
        self.timers.start(token.clone());
        self.lock().insert(token, session);
    }

    pub fn principal(&self, token: &str) -> Option<Principal> {
        self.lock()
            .get(token)
            .and_then(|session| session.principal().cloned())
    }

    /// Record user activity; `false` if the token has no live session.
    pub fn touch(&self, token: &str) -> bool {
        self.timers.record_activity(&token.to_string())
    }

    pub fn state(&self, token: &str) -> Option<SessionState> {
        self.timers.state(&token.to_string())
    }

    /// Log the session out and cancel its timer.
    pub fn close(&self, token: &str) -> Option<Principal> {
        self.timers.stop(&token.to_string());
        let removed = self.lock().remove(token);
        removed.and_then(|mut session| session.logout())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, AuthSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tenantry_auth::Role;
    use tenantry_core::UserId;
    use tenantry_session::SessionStatus;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(
            SessionPolicy::new(Duration::from_secs(300), Duration::from_secs(30)).unwrap(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn open_and_close_round_trip() {
        let sessions = registry();
        let principal = Principal::new(UserId::new(), Role::OWNER);

        sessions.open("tok", principal.clone());
        assert_eq!(sessions.principal("tok"), Some(principal.clone()));
        assert_eq!(sessions.state("tok").unwrap().status, SessionStatus::Active);

        assert_eq!(sessions.close("tok"), Some(principal));
        assert!(sessions.principal("tok").is_none());
        assert!(sessions.state("tok").is_none());
        assert!(!sessions.touch("tok"));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_expiry_tears_down_credentials() {
        let sessions = registry();
        sessions.open("tok", Principal::new(UserId::new(), Role::TENANT));

        advance_secs(305).await;

        assert!(sessions.principal("tok").is_none());
        assert!(sessions.is_empty());
    }

    async fn advance_secs(secs: u64) {
        for _ in 0..secs {
            tokio::time::advance(Duration::from_secs(1)).await;
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reopening_a_token_replaces_session_and_restarts_timer() {
        let sessions = registry();
        let first = Principal::new(UserId::new(), Role::OWNER);
        let second = Principal::new(UserId::new(), Role::MANAGER);

        sessions.open("tok", first);
        advance_secs(200).await;

        sessions.open("tok", second.clone());
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions.principal("tok"), Some(second.clone()));

        // The first timer would have logged out at 301s.
        advance_secs(150).await;
        assert_eq!(sessions.principal("tok"), Some(second.clone()));
        assert_eq!(sessions.state("tok").unwrap().status, SessionStatus::Active);

        advance_secs(155).await;
        assert!(sessions.principal("tok").is_none());
        assert!(sessions.state("tok").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn reopening_after_expiry_is_not_torn_down_by_the_old_timer() {
        let sessions = registry();
        sessions.open("tok", Principal::new(UserId::new(), Role::TENANT));
        advance_secs(305).await;
        assert!(sessions.is_empty());

        let fresh = Principal::new(UserId::new(), Role::TENANT);
        sessions.open("tok", fresh.clone());
        advance_secs(60).await;

        assert_eq!(sessions.principal("tok"), Some(fresh));
        assert_eq!(sessions.state("tok").unwrap().status, SessionStatus::Active);
    }
}
