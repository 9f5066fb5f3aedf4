//! Request-boundary check that the caller's subscription is usable.
//!
//! The guard is stateless: every call reads the principal's attached
//! subscription and the supplied `now`, nothing is cached between calls.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tenantry_auth::Principal;
use tenantry_core::SubscriptionStatus;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionCode {
    SubscriptionMissing,
    SubscriptionExpired,
}

impl RejectionCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionCode::SubscriptionMissing => "subscription_missing",
            RejectionCode::SubscriptionExpired => "subscription_expired",
        }
    }
}

/// Structured rejection returned to the calling layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub code: RejectionCode,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Continue,
    Reject(Rejection),
}

#[derive(Debug, Default, Copy, Clone)]
pub struct SubscriptionGuard;

impl SubscriptionGuard {
    pub fn new() -> Self {
        Self
    }

    pub fn authorize(&self, principal: &Principal, now: DateTime<Utc>) -> GuardDecision {
        let Some(subscription) = principal.subscription.as_ref() else {
            return reject(principal, missing());
        };

        match (subscription.status_at(now), subscription.end_date) {
            (SubscriptionStatus::Active, _) => GuardDecision::Continue,
            (SubscriptionStatus::Expired, Some(end)) => reject(
                principal,
                Rejection {
                    code: RejectionCode::SubscriptionExpired,
                    message: format!(
                        "Your subscription expired on {}. Renew or upgrade your plan to continue.",
                        end.format("%Y-%m-%d")
                    ),
                },
            ),
            _ => reject(principal, missing()),
        }
    }

    /// Run `action` only if the guard lets the principal through.
    ///
    /// On rejection `action` is never invoked.
    pub fn run<T>(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
        action: impl FnOnce() -> T,
    ) -> Result<T, Rejection> {
        match self.authorize(principal, now) {
            GuardDecision::Continue => Ok(action()),
            GuardDecision::Reject(rejection) => Err(rejection),
        }
    }
}

fn missing() -> Rejection {
    Rejection {
        code: RejectionCode::SubscriptionMissing,
        message: "No active subscription is attached to this account. Choose a plan to continue."
            .to_string(),
    }
}

fn reject(principal: &Principal, rejection: Rejection) -> GuardDecision {
    tracing::warn!(
        user_id = %principal.id,
        code = rejection.code.as_str(),
        "subscription guard rejected request"
    );
    GuardDecision::Reject(rejection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tenantry_auth::Role;
    use tenantry_core::{PlanId, Subscription, UserId};

    fn principal_with_end(end_date: Option<DateTime<Utc>>) -> Principal {
        let now = Utc::now();
        Principal::new(UserId::new(), Role::OWNER).with_subscription(Subscription {
            owner_id: UserId::new(),
            plan_id: PlanId::new("standard").unwrap(),
            start_date: now - Duration::days(30),
            end_date,
            auto_renew: false,
        })
    }

    fn code(decision: GuardDecision) -> Option<RejectionCode> {
        match decision {
            GuardDecision::Continue => None,
            GuardDecision::Reject(r) => Some(r.code),
        }
    }

    #[test]
    fn unexpired_subscription_continues() {
        let now = Utc::now();
        let principal = principal_with_end(Some(now + Duration::days(1)));
        assert_eq!(SubscriptionGuard::new().authorize(&principal, now), GuardDecision::Continue);
    }

    #[test]
    fn yesterday_end_date_is_rejected_as_expired() {
        let now = Utc::now();
        let principal = principal_with_end(Some(now - Duration::days(1)));

        let GuardDecision::Reject(rejection) = SubscriptionGuard::new().authorize(&principal, now)
        else {
            panic!("expected rejection");
        };
        assert_eq!(rejection.code, RejectionCode::SubscriptionExpired);
        assert!(rejection.message.contains("expired"));
    }

    #[test]
    fn absent_or_malformed_subscription_is_missing() {
        let now = Utc::now();
        let guard = SubscriptionGuard::new();

        let bare = Principal::new(UserId::new(), Role::OWNER);
        assert_eq!(code(guard.authorize(&bare, now)), Some(RejectionCode::SubscriptionMissing));

        let no_end = principal_with_end(None);
        assert_eq!(code(guard.authorize(&no_end, now)), Some(RejectionCode::SubscriptionMissing));

        let inverted = principal_with_end(Some(now - Duration::days(90)));
        assert_eq!(
            code(guard.authorize(&inverted, now)),
            Some(RejectionCode::SubscriptionMissing)
        );
    }

    #[test]
    fn admin_role_does_not_bypass_the_guard() {
        let now = Utc::now();
        let mut admin = principal_with_end(Some(now - Duration::days(1)));
        admin.role = Role::ADMIN;

        assert_eq!(
            code(SubscriptionGuard::new().authorize(&admin, now)),
            Some(RejectionCode::SubscriptionExpired)
        );
    }

    #[test]
    fn rejected_run_never_invokes_action() {
        let now = Utc::now();
        let guard = SubscriptionGuard::new();
        let mut side_effects = 0;

        let expired = principal_with_end(Some(now - Duration::days(1)));
        let result = guard.run(&expired, now, || side_effects += 1);
        assert!(result.is_err());
        assert_eq!(side_effects, 0);

        let active = principal_with_end(Some(now + Duration::days(1)));
        guard.run(&active, now, || side_effects += 1).unwrap();
        assert_eq!(side_effects, 1);
    }

    #[test]
    fn decision_tracks_now_without_caching() {
        let now = Utc::now();
        let guard = SubscriptionGuard::new();
        let principal = principal_with_end(Some(now));

        assert_eq!(guard.authorize(&principal, now), GuardDecision::Continue);
        assert_eq!(
            code(guard.authorize(&principal, now + Duration::seconds(1))),
            Some(RejectionCode::SubscriptionExpired)
        );
        assert_eq!(guard.authorize(&principal, now), GuardDecision::Continue);
    }
}
