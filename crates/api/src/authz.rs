//! API-side authorization for actions gated on both role/permission and plan.
//!
//! The UI evaluates the same policies to show or hide controls; this is the
//! enforcement point and runs before the action is dispatched.

use tenantry_auth::{AuthzError, Permission, Principal, authorize};
use tenantry_billing::{EffectiveEntitlement, EntitlementDenied};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDenial {
    Permission(AuthzError),
    Entitlement(EntitlementDenied),
}

/// Require both the permission and the plan feature. Both checks are always
/// evaluated; either denial wins, the permission denial being reported first.
pub fn authorize_gated(
    principal: &Principal,
    permission: &Permission,
    entitlement: &EffectiveEntitlement,
    feature: &str,
) -> Result<(), GateDenial> {
    let role_check = authorize(principal, permission).map_err(GateDenial::Permission);
    let plan_check = entitlement
        .require_feature(feature)
        .map_err(GateDenial::Entitlement);
    role_check.and(plan_check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use tenantry_auth::Role;
    use tenantry_auth::permissions::known;
    use tenantry_billing::{EntitlementResolver, ExpiryPolicy, PlanCatalog};
    use tenantry_core::{PlanId, Subscription, UserId};

    fn entitlement_for(plan: &str) -> EffectiveEntitlement {
        let catalog = Arc::new(PlanCatalog::builtin().unwrap());
        let resolver = EntitlementResolver::new(catalog, ExpiryPolicy::Locked).unwrap();
        let now = Utc::now();
        let principal = Principal::new(UserId::new(), Role::OWNER).with_subscription(Subscription {
            owner_id: UserId::new(),
            plan_id: PlanId::new(plan).unwrap(),
            start_date: now - Duration::days(1),
            end_date: Some(now + Duration::days(30)),
            auto_renew: true,
        });
        resolver.resolve_for(&principal, now).unwrap()
    }

    #[test]
    fn both_checks_must_allow() {
        let manager =
            Principal::new(UserId::new(), Role::MANAGER).with_permissions([known::REPORTS_READ]);

        assert!(
            authorize_gated(&manager, &known::REPORTS_READ, &entitlement_for("standard"), "rapportsFinanciers")
                .is_ok()
        );
    }

    #[test]
    fn plan_denial_wins_even_when_permitted() {
        let manager =
            Principal::new(UserId::new(), Role::MANAGER).with_permissions([known::REPORTS_READ]);

        let denial = authorize_gated(
            &manager,
            &known::REPORTS_READ,
            &entitlement_for("free"),
            "rapportsFinanciers",
        )
        .unwrap_err();
        assert!(matches!(denial, GateDenial::Entitlement(_)));
    }

    #[test]
    fn admin_still_needs_the_plan_feature() {
        let admin = Principal::new(UserId::new(), Role::ADMIN);

        let denial = authorize_gated(
            &admin,
            &known::REPORTS_READ,
            &entitlement_for("free"),
            "rapportsFinanciers",
        )
        .unwrap_err();
        assert!(matches!(denial, GateDenial::Entitlement(_)));
    }

    #[test]
    fn permission_denial_reported_first() {
        let tenant = Principal::new(UserId::new(), Role::TENANT);

        let denial = authorize_gated(
            &tenant,
            &known::REPORTS_READ,
            &entitlement_for("free"),
            "rapportsFinanciers",
        )
        .unwrap_err();
        assert!(matches!(denial, GateDenial::Permission(_)));
    }
}
