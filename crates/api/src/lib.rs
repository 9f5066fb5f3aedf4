//! HTTP API: request-boundary enforcement of access, subscription, and
//! entitlement policy.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
pub mod sessions;
