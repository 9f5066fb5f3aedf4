use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier used for RBAC.
///
/// Roles are opaque strings so deployments can add staff roles without a code
/// change. Only [`Role::ADMIN`] carries built-in meaning (access precedence).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// Platform administrator; overrides declared route restrictions.
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));
    /// Landlord / account holder owning the subscription.
    pub const OWNER: Role = Role(Cow::Borrowed("owner"));
    /// Staff member managing properties on an owner's behalf.
    pub const MANAGER: Role = Role(Cow::Borrowed("manager"));
    /// Renter with access to their own lease documents only.
    pub const TENANT: Role = Role(Cow::Borrowed("tenant"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        self.as_str() == Self::ADMIN.as_str()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
