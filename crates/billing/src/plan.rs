//! Plan definitions and the canonical limit/feature schema.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use tenantry_core::PlanId;

use crate::{Limit, LimitCheck};

/// Every limit name a plan may carry.
pub const LIMIT_NAMES: [&str; 5] = [
    "proprietesMax",
    "locatairesMax",
    "utilisateursMax",
    "documentsMax",
    "stockageMo",
];

/// Every feature flag a plan may carry.
pub const FEATURE_NAMES: [&str; 8] = [
    "gestionLocataires",
    "quittancesPdf",
    "rappelsAutomatiques",
    "rapportsFinanciers",
    "signatureElectronique",
    "multiUtilisateurs",
    "accesApi",
    "supportPrioritaire",
];

/// Id of the profile substituted for expired subscriptions under
/// [`ExpiryPolicy::Locked`](crate::ExpiryPolicy::Locked).
pub const LOCKED_PLAN_ID: &str = "locked";

/// A subscription tier. Immutable once loaded; compared by id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub(crate) id: PlanId,
    pub(crate) name: String,
    pub(crate) price_cents: u64,
    pub(crate) limits: BTreeMap<String, Limit>,
    pub(crate) features: BTreeSet<String>,
    pub(crate) support: BTreeMap<String, String>,
    pub(crate) security: BTreeMap<String, String>,
    pub(crate) conditions: BTreeMap<String, String>,
}

impl PartialEq for Plan {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Plan {}

impl Plan {
    /// Profile with no features and every canonical limit disabled.
    pub fn locked() -> Self {
        Self {
            id: PlanId::from_static(LOCKED_PLAN_ID),
            name: "Verrouillé".to_string(),
            price_cents: 0,
            limits: LIMIT_NAMES
                .iter()
                .map(|name| (name.to_string(), Limit::Disabled))
                .collect(),
            features: BTreeSet::new(),
            support: BTreeMap::new(),
            security: BTreeMap::new(),
            conditions: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &PlanId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price_cents(&self) -> u64 {
        self.price_cents
    }

    pub fn limits(&self) -> &BTreeMap<String, Limit> {
        &self.limits
    }

    pub fn features(&self) -> &BTreeSet<String> {
        &self.features
    }

    pub fn support(&self) -> &BTreeMap<String, String> {
        &self.support
    }

    pub fn security(&self) -> &BTreeMap<String, String> {
        &self.security
    }

    pub fn conditions(&self) -> &BTreeMap<String, String> {
        &self.conditions
    }

    /// Unknown feature names are simply not granted.
    pub fn has_feature(&self, name: &str) -> bool {
        self.features.contains(name)
    }

    /// Unknown limit names resolve to [`Limit::Disabled`].
    pub fn limit(&self, name: &str) -> Limit {
        self.limits.get(name).copied().unwrap_or(Limit::Disabled)
    }

    pub fn check_limit(&self, name: &str, current_usage: u64) -> LimitCheck {
        self.limit(name).check(current_usage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_profile_grants_nothing() {
        let locked = Plan::locked();

        assert_eq!(locked.id().as_str(), LOCKED_PLAN_ID);
        assert!(locked.features().is_empty());
        assert_eq!(locked.limits().len(), LIMIT_NAMES.len());
        for name in LIMIT_NAMES {
            assert!(!locked.check_limit(name, 0).allowed);
        }
    }

    #[test]
    fn unknown_names_fail_closed() {
        let locked = Plan::locked();
        assert!(!locked.has_feature("__nonexistent__"));
        assert_eq!(locked.limit("__nonexistent__"), Limit::Disabled);
    }
}
