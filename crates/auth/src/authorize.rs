use thiserror::Error;

use crate::{Permission, Principal};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),

    #[error("forbidden: principals cannot edit their own permissions")]
    SelfEscalation,
}

/// Authorize a principal for a privileged action.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
///
/// The admin role implies every permission, the `"*"` wildcard grants every
/// permission, otherwise `required` must be held explicitly.
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    if principal.is_admin() {
        return Ok(());
    }

    let granted = principal
        .permissions
        .iter()
        .any(|p| p.is_wildcard() || p == required);

    if granted {
        Ok(())
    } else {
        tracing::info!(
            user_id = %principal.id,
            role = %principal.role,
            permission = %required,
            "permission denied"
        );
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}
