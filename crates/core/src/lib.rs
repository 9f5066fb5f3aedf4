//! `tenantry-core` — shared identifiers, the subscription record, and the domain error model.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod subscription;

pub use error::DomainError;
pub use id::{PlanId, UserId};
pub use subscription::{Subscription, SubscriptionStatus};
