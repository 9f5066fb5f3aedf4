use std::collections::BTreeSet;

use tenantry_core::{Subscription, UserId};

use crate::{AuthzError, Permission, Role};

/// A fully resolved principal for authorization decisions.
///
/// Construction of this object is decoupled from storage and transport: the
/// authentication layer resolves identity, role, permissions, and the attached
/// subscription record, then hands the finished value to the policy checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: UserId,
    pub role: Role,
    pub permissions: BTreeSet<Permission>,
    pub subscription: Option<Subscription>,
}

impl Principal {
    pub fn new(id: UserId, role: Role) -> Self {
        Self {
            id,
            role,
            permissions: BTreeSet::new(),
            subscription: None,
        }
    }

    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions.extend(permissions);
        self
    }

    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.subscription = Some(subscription);
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Grant `permission` to this principal on behalf of `actor`.
    ///
    /// Only administrators may edit permission sets, and never their own.
    pub fn grant_permission(
        &mut self,
        actor: &Principal,
        permission: Permission,
    ) -> Result<(), AuthzError> {
        ensure_can_edit(actor, self)?;
        tracing::info!(
            actor = %actor.id,
            target = %self.id,
            permission = %permission,
            "permission granted"
        );
        self.permissions.insert(permission);
        Ok(())
    }

    /// Revoke `permission` from this principal on behalf of `actor`.
    pub fn revoke_permission(
        &mut self,
        actor: &Principal,
        permission: &Permission,
    ) -> Result<bool, AuthzError> {
        ensure_can_edit(actor, self)?;
        Ok(self.permissions.remove(permission))
    }
}

fn ensure_can_edit(actor: &Principal, target: &Principal) -> Result<(), AuthzError> {
    if actor.id == target.id {
        return Err(AuthzError::SelfEscalation);
    }
    if !actor.is_admin() {
        return Err(AuthzError::Forbidden(crate::permissions::known::USERS_MANAGE.to_string()));
    }
    Ok(())
}
