use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are modeled as opaque strings (e.g. "users.manage").
/// A special wildcard permission `"*"` can be granted to indicate "allow all"
/// without enumerating every capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const WILDCARD: Permission = Permission(Cow::Borrowed("*"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Well-known permissions checked by privileged actions.
pub mod known {
    use super::Permission;
    use std::borrow::Cow;

    pub const USERS_MANAGE: Permission = Permission(Cow::Borrowed("users.manage"));
    pub const BILLING_MANAGE: Permission = Permission(Cow::Borrowed("billing.manage"));
    pub const PROPERTIES_WRITE: Permission = Permission(Cow::Borrowed("properties.write"));
    pub const DOCUMENTS_SIGN: Permission = Permission(Cow::Borrowed("documents.sign"));
    pub const REPORTS_READ: Permission = Permission(Cow::Borrowed("reports.read"));
}
