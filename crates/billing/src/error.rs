//! Billing-side error model.

use thiserror::Error;

use tenantry_core::{DomainError, PlanId};

/// A plan id that does not resolve in the catalog.
///
/// When this comes out of a subscription lookup it means the billing record is
/// corrupt; callers must surface it, never default around it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown plan '{0}'")]
pub struct UnknownPlan(pub PlanId);

/// Failure while loading a plan catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(String),

    #[error("catalog defines no plans")]
    Empty,

    #[error(transparent)]
    InvalidPlanId(#[from] DomainError),

    #[error("plan '{0}' is defined more than once")]
    DuplicatePlan(PlanId),

    #[error("plan '{plan}' declares limit '{name}' outside the canonical schema")]
    UnknownLimit { plan: PlanId, name: String },

    #[error("plan '{plan}' declares feature '{name}' outside the canonical schema")]
    UnknownFeature { plan: PlanId, name: String },

    #[error("limit '{name}' has invalid value {raw}")]
    InvalidLimit { name: String, raw: String },
}

/// Failure while resolving a user's entitlement.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntitlementError {
    #[error("no usable subscription is attached to this account")]
    MissingSubscription,

    #[error(transparent)]
    UnknownPlan(#[from] UnknownPlan),
}

/// A gated action refused by the user's current entitlement.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntitlementDenied {
    #[error("the '{feature}' feature is not included in the {plan} plan; upgrade to use it")]
    FeatureNotInPlan { feature: String, plan: String },

    #[error("the {plan} plan allows {limit} for '{name}'; upgrade to add more")]
    LimitReached {
        name: String,
        plan: String,
        limit: crate::Limit,
    },
}
