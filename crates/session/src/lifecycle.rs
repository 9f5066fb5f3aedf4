//! Idle-timeout state machine for one live session.
//!
//! `Active → Warning → Expired`, driven by [`SessionLifecycle::tick`] at a
//! fixed rate. `Expired` is terminal; a new login creates a fresh instance.

use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("warning window must be at least one second")]
    EmptyWarningWindow,

    #[error("warning window ({window:?}) must be shorter than the idle timeout ({timeout:?})")]
    WindowExceedsTimeout { window: Duration, timeout: Duration },
}

/// Idle timeout and the grace window announced before it.
///
/// The warning fires once idle time exceeds `idle_timeout - warning_window`;
/// the countdown then starts at `warning_window` whole seconds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionPolicy {
    idle_timeout: Duration,
    warning_window: Duration,
}

impl SessionPolicy {
    pub fn new(idle_timeout: Duration, warning_window: Duration) -> Result<Self, PolicyError> {
        if warning_window.as_secs() == 0 {
            return Err(PolicyError::EmptyWarningWindow);
        }
        if warning_window >= idle_timeout {
            return Err(PolicyError::WindowExceedsTimeout {
                window: warning_window,
                timeout: idle_timeout,
            });
        }
        Ok(Self {
            idle_timeout,
            warning_window,
        })
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub fn warning_window(&self) -> Duration {
        self.warning_window
    }

    pub fn warning_threshold(&self) -> Duration {
        self.idle_timeout - self.warning_window
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Warning,
    Expired,
}

/// Snapshot for display.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub status: SessionStatus,
    /// Seconds left before forced logout; only set while in `Warning`.
    pub countdown_remaining: Option<u64>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Transition {
    EnteredWarning { countdown: u64 },
    Expired,
    /// Activity answered the warning.
    Resumed,
}

#[derive(Debug, Clone)]
pub struct SessionLifecycle {
    policy: SessionPolicy,
    last_activity_at: Instant,
    status: SessionStatus,
    countdown_remaining: u64,
}

impl SessionLifecycle {
    pub fn new(policy: SessionPolicy, now: Instant) -> Self {
        Self {
            policy,
            last_activity_at: now,
            status: SessionStatus::Active,
            countdown_remaining: 0,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn last_activity_at(&self) -> Instant {
        self.last_activity_at
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            status: self.status,
            countdown_remaining: (self.status == SessionStatus::Warning)
                .then_some(self.countdown_remaining),
        }
    }

    /// Record user activity.
    ///
    /// Resets the idle clock while `Active`, cancels the countdown while in
    /// `Warning`, and is ignored once `Expired`.
    pub fn record_activity(&mut self, now: Instant) -> Option<Transition> {
        match self.status {
            SessionStatus::Active => {
                self.last_activity_at = now;
                None
            }
            SessionStatus::Warning => {
                self.last_activity_at = now;
                self.status = SessionStatus::Active;
                self.countdown_remaining = 0;
                Some(Transition::Resumed)
            }
            SessionStatus::Expired => None,
        }
    }

    /// Advance one timer tick.
    pub fn tick(&mut self, now: Instant) -> Option<Transition> {
        match self.status {
            SessionStatus::Active => {
                let idle = now.saturating_duration_since(self.last_activity_at);
                if idle > self.policy.warning_threshold() {
                    self.status = SessionStatus::Warning;
                    self.countdown_remaining = self.policy.warning_window.as_secs();
                    Some(Transition::EnteredWarning {
                        countdown: self.countdown_remaining,
                    })
                } else {
                    None
                }
            }
            SessionStatus::Warning => {
                self.countdown_remaining = self.countdown_remaining.saturating_sub(1);
                if self.countdown_remaining == 0 {
                    self.status = SessionStatus::Expired;
                    Some(Transition::Expired)
                } else {
                    None
                }
            }
            SessionStatus::Expired => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn policy(timeout: u64, window: u64) -> SessionPolicy {
        SessionPolicy::new(Duration::from_secs(timeout), Duration::from_secs(window)).unwrap()
    }

    /// Tick once per second from `from` through `to` (inclusive) seconds after `t0`.
    fn tick_through(s: &mut SessionLifecycle, t0: Instant, from: u64, to: u64) -> Vec<(u64, Transition)> {
        (from..=to)
            .filter_map(|sec| s.tick(t0 + Duration::from_secs(sec)).map(|t| (sec, t)))
            .collect()
    }

    #[test]
    fn policy_validation() {
        assert_eq!(
            SessionPolicy::new(Duration::from_secs(300), Duration::ZERO),
            Err(PolicyError::EmptyWarningWindow)
        );
        assert!(matches!(
            SessionPolicy::new(Duration::from_secs(30), Duration::from_secs(30)),
            Err(PolicyError::WindowExceedsTimeout { .. })
        ));
        assert_eq!(policy(300, 30).warning_threshold(), Duration::from_secs(270));
    }

    #[test]
    fn idle_scenario_warns_at_271_and_expires_at_301() {
        let t0 = Instant::now();
        let mut session = SessionLifecycle::new(policy(300, 30), t0);

        assert!(tick_through(&mut session, t0, 1, 270).is_empty());
        assert_eq!(session.status(), SessionStatus::Active);

        assert_eq!(
            session.tick(t0 + Duration::from_secs(271)),
            Some(Transition::EnteredWarning { countdown: 30 })
        );
        assert_eq!(session.state().countdown_remaining, Some(30));

        let transitions = tick_through(&mut session, t0, 272, 301);
        assert_eq!(transitions, vec![(301, Transition::Expired)]);
        assert_eq!(
            session.state(),
            SessionState { status: SessionStatus::Expired, countdown_remaining: None }
        );
    }

    #[test]
    fn activity_while_active_resets_idle_clock() {
        let t0 = Instant::now();
        let mut session = SessionLifecycle::new(policy(300, 30), t0);

        tick_through(&mut session, t0, 1, 200);
        session.record_activity(t0 + Duration::from_secs(200));

        assert!(tick_through(&mut session, t0, 201, 470).is_empty());
        assert_eq!(session.status(), SessionStatus::Active);
        assert_eq!(
            session.tick(t0 + Duration::from_secs(471)),
            Some(Transition::EnteredWarning { countdown: 30 })
        );
    }

    #[test]
    fn activity_during_warning_returns_to_active() {
        let t0 = Instant::now();
        let mut session = SessionLifecycle::new(policy(300, 30), t0);
        tick_through(&mut session, t0, 1, 280);
        assert_eq!(session.status(), SessionStatus::Warning);

        let resumed = session.record_activity(t0 + Duration::from_secs(281));

        assert_eq!(resumed, Some(Transition::Resumed));
        assert_eq!(session.state().countdown_remaining, None);
        assert_eq!(session.last_activity_at(), t0 + Duration::from_secs(281));
    }

    #[test]
    fn expired_is_terminal() {
        let t0 = Instant::now();
        let mut session = SessionLifecycle::new(policy(10, 2), t0);
        tick_through(&mut session, t0, 1, 20);
        assert_eq!(session.status(), SessionStatus::Expired);

        assert_eq!(session.record_activity(t0 + Duration::from_secs(21)), None);
        assert_eq!(session.tick(t0 + Duration::from_secs(22)), None);
        assert_eq!(session.status(), SessionStatus::Expired);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: the countdown never increases while in `Warning`, never
        /// goes below zero, and expiry happens exactly on the tick that
        /// reaches zero.
        #[test]
        fn countdown_is_monotonic_and_expires_at_zero(window in 1u64..60, extra in 1u64..600) {
            let timeout = window + extra;
            let t0 = Instant::now();
            let mut session = SessionLifecycle::new(policy(timeout, window), t0);

            let mut previous: Option<u64> = None;
            for sec in 1..=(timeout + 5) {
                let transition = session.tick(t0 + Duration::from_secs(sec));
                let state = session.state();

                if let (Some(prev), Some(now)) = (previous, state.countdown_remaining) {
                    prop_assert!(now <= prev);
                }
                if state.status == SessionStatus::Warning {
                    prop_assert!(state.countdown_remaining.unwrap_or(0) > 0);
                }
                if transition == Some(Transition::Expired) {
                    prop_assert_eq!(previous, Some(1));
                    prop_assert_eq!(sec, timeout + 1);
                }
                previous = state.countdown_remaining;
            }
            prop_assert_eq!(session.status(), SessionStatus::Expired);
        }
    }
}
