//! Immutable registry of subscription tiers.
//!
//! The catalog is the boundary where raw tier data is validated against the
//! canonical schema and limit encodings are normalized into [`Limit`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Deserialize;
use serde_json::{Map, Value};

use tenantry_core::PlanId;

use crate::plan::{FEATURE_NAMES, LIMIT_NAMES};
use crate::{CatalogError, Limit, Plan, UnknownPlan};

const BUILTIN_PLANS: &str = include_str!("plans.json");

/// Raw tier as found in catalog JSON.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlan {
    id: String,
    name: String,
    #[serde(default)]
    price_cents: u64,
    #[serde(default)]
    limits: Map<String, Value>,
    #[serde(default)]
    features: Vec<String>,
    #[serde(default)]
    support: BTreeMap<String, String>,
    #[serde(default)]
    security: BTreeMap<String, String>,
    #[serde(default)]
    conditions: BTreeMap<String, String>,
}

impl RawPlan {
    fn normalize(self) -> Result<Plan, CatalogError> {
        let id = PlanId::new(self.id)?;

        if let Some(name) = self.limits.keys().find(|k| !LIMIT_NAMES.contains(&k.as_str())) {
            return Err(CatalogError::UnknownLimit {
                plan: id,
                name: name.clone(),
            });
        }
        if let Some(name) = self.features.iter().find(|f| !FEATURE_NAMES.contains(&f.as_str())) {
            return Err(CatalogError::UnknownFeature {
                plan: id,
                name: name.clone(),
            });
        }

        let mut limits = BTreeMap::new();
        for name in LIMIT_NAMES {
            limits.insert(name.to_string(), Limit::from_raw(name, self.limits.get(name))?);
        }

        Ok(Plan {
            id,
            name: self.name,
            price_cents: self.price_cents,
            limits,
            features: self.features.into_iter().collect::<BTreeSet<_>>(),
            support: self.support,
            security: self.security,
            conditions: self.conditions,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PlanCatalog {
    plans: Vec<Plan>,
    index: HashMap<PlanId, usize>,
}

impl PlanCatalog {
    /// The three shipped tiers: `free`, `standard`, `premium`.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_PLANS)
    }

    /// Load a catalog from a JSON array of tiers, in display order.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: Vec<RawPlan> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        if raw.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut plans = Vec::with_capacity(raw.len());
        let mut index = HashMap::with_capacity(raw.len());
        for raw_plan in raw {
            let plan = raw_plan.normalize()?;
            if index.insert(plan.id.clone(), plans.len()).is_some() {
                return Err(CatalogError::DuplicatePlan(plan.id));
            }
            plans.push(plan);
        }

        tracing::debug!(plans = plans.len(), "plan catalog loaded");
        Ok(Self { plans, index })
    }

    pub fn get(&self, plan_id: &PlanId) -> Result<&Plan, UnknownPlan> {
        self.index
            .get(plan_id)
            .map(|&i| &self.plans[i])
            .ok_or_else(|| UnknownPlan(plan_id.clone()))
    }

    /// All plans in display order.
    pub fn all(&self) -> &[Plan] {
        &self.plans
    }
}
