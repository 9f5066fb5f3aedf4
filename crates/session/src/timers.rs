//! One timer task per live session, on the tokio runtime.
//!
//! Starting a timer for a session aborts any timer already running for it, and
//! a timer only fires the logout callback while it is still the registered one
//! for its session. A timer therefore never outlives its session.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::lifecycle::{SessionLifecycle, SessionPolicy, SessionState, Transition};

/// Invoked with the session key when a session expires (credential teardown,
/// navigation to the entry point).
///
/// Runs while the timer registry is locked; it must not call back into the
/// owning [`SessionTimers`].
pub type LogoutCallback<K> = Arc<dyn Fn(&K) + Send + Sync>;

struct TimerEntry {
    generation: u64,
    activity: mpsc::UnboundedSender<()>,
    state: watch::Receiver<SessionState>,
    task: JoinHandle<()>,
}

struct Registry<K> {
    next_generation: u64,
    timers: HashMap<K, TimerEntry>,
}

impl<K: Eq + Hash> Registry<K> {
    /// Remove the entry only if it still belongs to `generation`.
    fn retire(&mut self, key: &K, generation: u64) -> bool {
        match self.timers.get(key) {
            Some(entry) if entry.generation == generation => {
                self.timers.remove(key);
                true
            }
            _ => false,
        }
    }
}

pub struct SessionTimers<K> {
    policy: SessionPolicy,
    tick: Duration,
    on_expired: LogoutCallback<K>,
    registry: Arc<Mutex<Registry<K>>>,
}

impl<K> SessionTimers<K>
where
    K: Eq + Hash + Clone + core::fmt::Debug + Send + Sync + 'static,
{
    /// Timers ticking once per second.
    pub fn new(policy: SessionPolicy, on_expired: LogoutCallback<K>) -> Self {
        Self::with_tick(policy, Duration::from_secs(1), on_expired)
    }

    pub fn with_tick(policy: SessionPolicy, tick: Duration, on_expired: LogoutCallback<K>) -> Self {
        Self {
            policy,
            tick,
            on_expired,
            registry: Arc::new(Mutex::new(Registry {
                next_generation: 0,
                timers: HashMap::new(),
            })),
        }
    }

    /// Start (or restart) the timer for `key`, cancelling any previous one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, key: K) -> watch::Receiver<SessionState> {
        let started = Instant::now();
        let lifecycle = SessionLifecycle::new(self.policy, started.into_std());
        let (state_tx, state_rx) = watch::channel(lifecycle.state());
        let (activity_tx, activity_rx) = mpsc::unbounded_channel();

        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let generation = registry.next_generation;
        registry.next_generation += 1;

        let task = tokio::spawn(run_timer(
            key.clone(),
            generation,
            lifecycle,
            started,
            self.tick,
            activity_rx,
            state_tx,
            Arc::clone(&self.registry),
            Arc::clone(&self.on_expired),
        ));

        let entry = TimerEntry {
            generation,
            activity: activity_tx,
            state: state_rx.clone(),
            task,
        };
        if let Some(previous) = registry.timers.insert(key.clone(), entry) {
            previous.task.abort();
            tracing::debug!(session = ?key, "previous session timer cancelled");
        }

        state_rx
    }

    /// Forward user activity to the session's timer. Returns `false` if no
    /// timer is running for `key`.
    pub fn record_activity(&self, key: &K) -> bool {
        let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        registry
            .timers
            .get(key)
            .is_some_and(|entry| entry.activity.send(()).is_ok())
    }

    /// Current state of the session's timer, if one is running.
    pub fn state(&self, key: &K) -> Option<SessionState> {
        let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        registry.timers.get(key).map(|entry| *entry.state.borrow())
    }

    /// Cancel the session's timer (logout or teardown). Returns `false` if
    /// nothing was running.
    pub fn stop(&self, key: &K) -> bool {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        match registry.timers.remove(key) {
            Some(entry) => {
                entry.task.abort();
                true
            }
            None => false,
        }
    }

    pub fn active_sessions(&self) -> usize {
        let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        registry.timers.len()
    }
}

impl<K> Drop for SessionTimers<K> {
    fn drop(&mut self) {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        for (_, entry) in registry.timers.drain() {
            entry.task.abort();
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_timer<K>(
    key: K,
    generation: u64,
    mut lifecycle: SessionLifecycle,
    started: Instant,
    tick: Duration,
    mut activity: mpsc::UnboundedReceiver<()>,
    state: watch::Sender<SessionState>,
    registry: Arc<Mutex<Registry<K>>>,
    on_expired: LogoutCallback<K>,
) where
    K: Eq + Hash + core::fmt::Debug,
{
    let mut interval = tokio::time::interval_at(started + tick, tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            Some(()) = activity.recv() => {
                if lifecycle.record_activity(Instant::now().into_std()) == Some(Transition::Resumed) {
                    tracing::info!(session = ?key, "session warning dismissed by activity");
                }
                state.send_replace(lifecycle.state());
            }
            at = interval.tick() => {
                let transition = lifecycle.tick(at.into_std());
                state.send_replace(lifecycle.state());

                match transition {
                    Some(Transition::EnteredWarning { countdown }) => {
                        tracing::info!(session = ?key, countdown, "session idle; logout warning started");
                    }
                    Some(Transition::Expired) => {
                        // Teardown runs under the registry lock so a restart
                        // for the same key lands strictly before or after it.
                        let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
                        if registry.retire(&key, generation) {
                            tracing::info!(session = ?key, "session expired; forcing logout");
                            on_expired(&key);
                        }
                        return;
                    }
                    Some(Transition::Resumed) | None => {
                        tracing::debug!(session = ?key, countdown = ?lifecycle.state().countdown_remaining, "session tick");
                    }
                }
            }
        }
    }
}
