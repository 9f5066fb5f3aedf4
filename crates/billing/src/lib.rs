//! `tenantry-billing` — plan catalog, entitlement resolution, and the
//! subscription guard.
//!
//! Everything here is synchronous and pure over an immutable catalog plus a
//! `(user, subscription, now)` snapshot; concurrent requests need no locking.

pub mod catalog;
pub mod entitlement;
pub mod error;
pub mod guard;
pub mod limit;
pub mod plan;

pub use catalog::PlanCatalog;
pub use entitlement::{EffectiveEntitlement, EntitlementResolver, EntitlementStatus, ExpiryPolicy};
pub use error::{CatalogError, EntitlementDenied, EntitlementError, UnknownPlan};
pub use guard::{GuardDecision, Rejection, RejectionCode, SubscriptionGuard};
pub use limit::{Limit, LimitCheck};
pub use plan::{FEATURE_NAMES, LIMIT_NAMES, LOCKED_PLAN_ID, Plan};
