//! Effective entitlement resolution and feature/limit queries.
//!
//! Resolution is a pure function of `(user, subscription, now)` and the
//! immutable catalog: the UI pre-check and the API enforcement call the same
//! code with the same inputs and cannot disagree.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use tenantry_auth::Principal;
use tenantry_core::{PlanId, Subscription, SubscriptionStatus, UserId};

use crate::{
    EntitlementDenied, EntitlementError, Limit, LimitCheck, Plan, PlanCatalog, UnknownPlan,
};

/// Profile substituted when a subscription has expired.
///
/// There is no default; deployments pick one explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpiryPolicy {
    /// No features, every limit disabled.
    Locked,
    /// Fall back to a catalog plan (e.g. `free`).
    Downgrade(PlanId),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementStatus {
    Active,
    Expired,
}

/// Features and limits in force for one `(user, subscription, now)` snapshot.
///
/// Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveEntitlement {
    pub user_id: UserId,
    pub status: EntitlementStatus,
    /// Plan named by the subscription, even when a degraded profile applies.
    pub subscription_plan_id: PlanId,
    pub plan: Plan,
    pub expires_at: DateTime<Utc>,
}

impl EffectiveEntitlement {
    pub fn is_active(&self) -> bool {
        self.status == EntitlementStatus::Active
    }

    /// Whole days until expiry, negative once expired.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_days()
    }

    pub fn has_feature(&self, name: &str) -> bool {
        self.plan.has_feature(name)
    }

    pub fn limit(&self, name: &str) -> Limit {
        self.plan.limit(name)
    }

    pub fn check_limit(&self, name: &str, current_usage: u64) -> LimitCheck {
        self.plan.check_limit(name, current_usage)
    }

    /// Enforcement form of [`has_feature`](Self::has_feature).
    pub fn require_feature(&self, name: &str) -> Result<(), EntitlementDenied> {
        if self.has_feature(name) {
            Ok(())
        } else {
            Err(EntitlementDenied::FeatureNotInPlan {
                feature: name.to_string(),
                plan: self.plan.name().to_string(),
            })
        }
    }

    /// Enforcement form of [`check_limit`](Self::check_limit).
    pub fn require_capacity(
        &self,
        name: &str,
        current_usage: u64,
    ) -> Result<LimitCheck, EntitlementDenied> {
        let check = self.check_limit(name, current_usage);
        if check.allowed {
            Ok(check)
        } else {
            Err(EntitlementDenied::LimitReached {
                name: name.to_string(),
                plan: self.plan.name().to_string(),
                limit: self.limit(name),
            })
        }
    }
}

#[derive(Debug, Clone)]
pub struct EntitlementResolver {
    catalog: Arc<PlanCatalog>,
    expired_profile: Plan,
}

impl EntitlementResolver {
    /// Fails with `UnknownPlan` if the policy downgrades to a plan the catalog
    /// does not define.
    pub fn new(catalog: Arc<PlanCatalog>, on_expiry: ExpiryPolicy) -> Result<Self, UnknownPlan> {
        let expired_profile = match &on_expiry {
            ExpiryPolicy::Locked => Plan::locked(),
            ExpiryPolicy::Downgrade(plan_id) => catalog.get(plan_id)?.clone(),
        };
        Ok(Self {
            catalog,
            expired_profile,
        })
    }

    pub fn expired_profile(&self) -> &Plan {
        &self.expired_profile
    }

    pub fn resolve(
        &self,
        user: &Principal,
        subscription: Option<&Subscription>,
        now: DateTime<Utc>,
    ) -> Result<EffectiveEntitlement, EntitlementError> {
        let Some(subscription) = subscription else {
            return Err(EntitlementError::MissingSubscription);
        };
        let Some(expires_at) = subscription.end_date else {
            return Err(EntitlementError::MissingSubscription);
        };

        let subscribed = self.catalog.get(&subscription.plan_id).inspect_err(|_| {
            tracing::error!(
                user_id = %user.id,
                plan_id = %subscription.plan_id,
                "subscription references a plan missing from the catalog"
            );
        })?;

        let (status, plan) = match subscription.status_at(now) {
            SubscriptionStatus::Malformed => return Err(EntitlementError::MissingSubscription),
            SubscriptionStatus::Active => (EntitlementStatus::Active, subscribed),
            SubscriptionStatus::Expired => (EntitlementStatus::Expired, &self.expired_profile),
        };

        tracing::debug!(
            user_id = %user.id,
            plan_id = %plan.id(),
            status = ?status,
            "entitlement resolved"
        );

        Ok(EffectiveEntitlement {
            user_id: user.id,
            status,
            subscription_plan_id: subscription.plan_id.clone(),
            plan: plan.clone(),
            expires_at,
        })
    }

    /// Resolve using the subscription attached to the principal.
    pub fn resolve_for(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<EffectiveEntitlement, EntitlementError> {
        self.resolve(principal, principal.subscription.as_ref(), now)
    }
}
