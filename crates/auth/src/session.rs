//! Explicit authentication context for one client session.
//!
//! Credentials live in this value rather than in ambient storage: `login`
//! populates it, `logout` clears it, and every component that needs the
//! current principal is handed the session explicitly.

use crate::Principal;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    principal: Option<Principal>,
}

impl AuthSession {
    /// A signed-out session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Populate the session with an authenticated principal, replacing any
    /// previous one.
    pub fn login(&mut self, principal: Principal) {
        tracing::debug!(user_id = %principal.id, role = %principal.role, "session login");
        self.principal = Some(principal);
    }

    /// Tear down credentials. Returns the principal that was signed in, if any.
    pub fn logout(&mut self) -> Option<Principal> {
        let previous = self.principal.take();
        if let Some(p) = &previous {
            tracing::debug!(user_id = %p.id, "session logout");
        }
        previous
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }
}
