//! `tenantry-auth` — pure role/permission policy and the explicit session context.
//!
//! This crate is decoupled from HTTP and storage; the principal is resolved by
//! an external authentication layer and passed in.

pub mod access;
pub mod authorize;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod session;

pub use access::{AccessController, AccessDecision, AccessState, Denial, DenialCode, Surface};
pub use authorize::{AuthzError, authorize};
pub use permissions::Permission;
pub use principal::Principal;
pub use roles::Role;
pub use session::AuthSession;
