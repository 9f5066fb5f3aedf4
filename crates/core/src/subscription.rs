//! Subscription record: a user's time-bounded association with a plan.
//!
//! Records are created and renewed by billing (outside this workspace); here
//! they are read-only snapshots handed in by the calling layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{PlanId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub owner_id: UserId,
    pub plan_id: PlanId,
    pub start_date: DateTime<Utc>,
    /// `None` when the billing record is incomplete.
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub auto_renew: bool,
}

/// Validity of a subscription at a given instant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// `end_date` is missing, or ends before it starts.
    Malformed,
    /// `now <= end_date`.
    Active,
    /// `now > end_date`.
    Expired,
}

impl Subscription {
    /// Classify the subscription at `now`.
    ///
    /// The end date itself is still covered: expiry starts strictly after it.
    pub fn status_at(&self, now: DateTime<Utc>) -> SubscriptionStatus {
        match self.end_date {
            None => SubscriptionStatus::Malformed,
            Some(end) if end < self.start_date => SubscriptionStatus::Malformed,
            Some(end) if now > end => SubscriptionStatus::Expired,
            Some(_) => SubscriptionStatus::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn subscription(end_date: Option<DateTime<Utc>>) -> Subscription {
        Subscription {
            owner_id: UserId::new(),
            plan_id: PlanId::new("standard").unwrap(),
            start_date: Utc::now() - Duration::days(30),
            end_date,
            auto_renew: false,
        }
    }

    #[test]
    fn end_date_boundary_is_still_active() {
        let end = Utc::now();
        let sub = subscription(Some(end));
        assert_eq!(sub.status_at(end), SubscriptionStatus::Active);
        assert_eq!(
            sub.status_at(end + Duration::milliseconds(1)),
            SubscriptionStatus::Expired
        );
    }

    #[test]
    fn missing_or_inverted_end_date_is_malformed() {
        let now = Utc::now();
        assert_eq!(subscription(None).status_at(now), SubscriptionStatus::Malformed);
        assert_eq!(
            subscription(Some(now - Duration::days(60))).status_at(now),
            SubscriptionStatus::Malformed
        );
    }

    #[test]
    fn deserializes_camel_case_record() {
        let json = serde_json::json!({
            "ownerId": "0190f2a4-3c1e-7000-8000-000000000001",
            "planId": "premium",
            "startDate": "2026-01-01T00:00:00Z",
            "endDate": "2027-01-01T00:00:00Z",
        });
        let sub: Subscription = serde_json::from_value(json).unwrap();
        assert_eq!(sub.plan_id.as_str(), "premium");
        assert!(!sub.auto_renew);
    }
}
