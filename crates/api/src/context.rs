use tenantry_auth::Principal;

/// Authenticated caller for a request: the session token it presented and the
/// principal that session holds.
///
/// Inserted by the access middleware; absent on requests that were denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    token: String,
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(token: impl Into<String>, principal: Principal) -> Self {
        Self {
            token: token.into(),
            principal,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}
