//! `tenantry-session` — idle-session countdown and forced logout.
//!
//! [`lifecycle`] is the pure, clock-injected state machine; [`timers`] drives
//! one instance per session on the tokio runtime.

pub mod lifecycle;
pub mod timers;

pub use lifecycle::{
    PolicyError, SessionLifecycle, SessionPolicy, SessionState, SessionStatus, Transition,
};
pub use timers::{LogoutCallback, SessionTimers};
