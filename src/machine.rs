//! The walkthrough machine — active-state store and transition engine.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, broadcast};
use tracing::{debug, warn};

use crate::claims::{ClaimRegistry, InstanceId};
use crate::config::{PreviousFromComplete, WalkthroughConfig};
use crate::error::Result;
use crate::registry::StepRegistry;
use crate::state::ActiveState;
use crate::step::{StepHandle, StepOptions};
use crate::store::StateStore;

/// A named, ordered onboarding walkthrough.
///
/// One machine per walkthrough name. Cheap to clone (all clones share the
/// same state); pass clones down to whatever renders the steps rather than
/// holding a global. All mutation goes through the public operations here
/// and on [`StepHandle`]; every committed transition is written through the
/// injected [`StateStore`] and broadcast to subscribers.
#[derive(Clone)]
pub struct Walkthrough {
    inner: Arc<Inner>,
}

struct Inner {
    name: String,
    registry: StepRegistry,
    config: WalkthroughConfig,
    store: Arc<dyn StateStore>,
    state: RwLock<ActiveState>,
    claims: Mutex<ClaimRegistry>,
    /// Steps whose claimed display unmounted without explicit navigation.
    unmounted: Mutex<HashSet<String>>,
    events: broadcast::Sender<ActiveState>,
}

impl Walkthrough {
    /// Build a machine, restoring any persisted position.
    ///
    /// Restoration order: a persisted completion marker wins, then a
    /// persisted known step id; anything else (including a malformed
    /// entry) falls back to the first step when
    /// `config.start_immediately` is set, or to not-started.
    ///
    /// Fails on an empty step sequence or duplicate step ids. A failing
    /// `load` is treated as nothing persisted, not as a construction
    /// error.
    pub async fn create<I, S>(
        name: impl Into<String>,
        steps: I,
        config: WalkthroughConfig,
        store: Arc<dyn StateStore>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let registry = StepRegistry::new(&name, steps)?;

        let persisted = match store.load(&name).await {
            Ok(value) => value,
            Err(e) => {
                warn!(walkthrough = %name, error = %e, "Failed to load walkthrough state");
                None
            }
        };
        let initial = match persisted
            .as_deref()
            .and_then(|raw| ActiveState::from_persisted(raw, &registry))
        {
            Some(state) => state,
            None if config.start_immediately => ActiveState::Active(registry.first().to_string()),
            None => ActiveState::NotStarted,
        };
        debug!(walkthrough = %name, state = %initial, "Walkthrough created");

        let (events, _) = broadcast::channel(16);
        Ok(Self {
            inner: Arc::new(Inner {
                name,
                registry,
                config,
                store,
                state: RwLock::new(initial),
                claims: Mutex::new(ClaimRegistry::new()),
                unmounted: Mutex::new(HashSet::new()),
                events,
            }),
        })
    }

    /// The walkthrough's name (the persistence key).
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Current state of the machine.
    pub async fn active_step(&self) -> ActiveState {
        self.inner.state.read().await.clone()
    }

    /// Subscribe to state changes. Each committed transition is delivered
    /// to every live receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<ActiveState> {
        self.inner.events.subscribe()
    }

    /// Handle for one rendered instance of `step`, with default options.
    pub fn step(&self, step: &str) -> Result<StepHandle> {
        self.step_with(step, StepOptions::default())
    }

    /// Handle for one rendered instance of `step`.
    ///
    /// Fails if `step` is not in the registry. Each call yields a distinct
    /// instance identity — one handle per mounted UI instance.
    pub fn step_with(&self, step: &str, options: StepOptions) -> Result<StepHandle> {
        if !self.inner.registry.contains(step) {
            return Err(crate::error::Error::UnknownStep {
                name: self.inner.name.clone(),
                step: step.to_string(),
            });
        }
        Ok(StepHandle::new(self.clone(), step.to_string(), options))
    }

    // ── Transitions ─────────────────────────────────────────────────

    /// Start the walkthrough on its first step. No-op unless not started.
    pub async fn begin(&self) {
        let mut state = self.inner.state.write().await;
        if state.is_not_started() {
            debug!(walkthrough = %self.inner.name, "Begin walkthrough");
            let first = ActiveState::Active(self.inner.registry.first().to_string());
            self.commit(&mut state, first).await;
        }
    }

    /// Mark the whole walkthrough complete, from any state.
    pub async fn skip(&self) {
        let mut state = self.inner.state.write().await;
        self.commit(&mut state, ActiveState::Complete).await;
    }

    /// Abandon the walkthrough, from any state. The persisted entry is
    /// erased, so a fresh machine starts over.
    pub async fn cancel(&self) {
        let mut state = self.inner.state.write().await;
        self.commit(&mut state, ActiveState::NotStarted).await;
    }

    /// Advance one step. From not-started this behaves as [`begin`];
    /// from the last step it completes; from complete it is a no-op.
    ///
    /// [`begin`]: Self::begin
    pub async fn next(&self) {
        let mut state = self.inner.state.write().await;
        let target = match &*state {
            ActiveState::NotStarted => ActiveState::Active(self.inner.registry.first().to_string()),
            ActiveState::Active(step) => self.step_after(step),
            ActiveState::Complete => return,
        };
        self.commit(&mut state, target).await;
    }

    /// Step back. From not-started this behaves as [`begin`]; from the
    /// first step it returns to not-started; from complete it follows the
    /// configured [`PreviousFromComplete`] policy.
    ///
    /// [`begin`]: Self::begin
    pub async fn previous(&self) {
        let mut state = self.inner.state.write().await;
        let target = match &*state {
            ActiveState::NotStarted => ActiveState::Active(self.inner.registry.first().to_string()),
            ActiveState::Active(step) => self.step_before(step),
            ActiveState::Complete => match self.inner.config.previous_from_complete {
                PreviousFromComplete::Ignore => return,
                PreviousFromComplete::LastStep => {
                    ActiveState::Active(self.inner.registry.last().to_string())
                }
            },
        };
        self.commit(&mut state, target).await;
    }

    /// Advance past `step` only if it is the currently active step.
    ///
    /// Lets a caller request completion by step identity without racing
    /// against whichever step is actually active.
    pub async fn complete_step(&self, step: &str) {
        self.next_from(step).await;
    }

    // ── Step-bound transitions (used by StepHandle) ─────────────────

    /// `next()` guarded on `step` still being active, so a stale handle
    /// cannot advance a machine that has already moved on.
    pub(crate) async fn next_from(&self, step: &str) {
        let mut state = self.inner.state.write().await;
        if state.is_active(step) {
            let target = self.step_after(step);
            self.commit(&mut state, target).await;
        }
    }

    /// `previous()` guarded on `step` still being active.
    pub(crate) async fn previous_from(&self, step: &str) {
        let mut state = self.inner.state.write().await;
        if state.is_active(step) {
            let target = self.step_before(step);
            self.commit(&mut state, target).await;
        }
    }

    fn step_after(&self, step: &str) -> ActiveState {
        match self.inner.registry.after(step) {
            Some(next) => ActiveState::Active(next.to_string()),
            None => ActiveState::Complete,
        }
    }

    fn step_before(&self, step: &str) -> ActiveState {
        match self.inner.registry.before(step) {
            Some(prev) => ActiveState::Active(prev.to_string()),
            None => ActiveState::NotStarted,
        }
    }

    /// Commit a transition: mutate, write through the store, notify.
    ///
    /// Must be called with the state write lock held (the guard is the
    /// first argument), so transitions serialize in call order. The store
    /// write is best-effort — a failure is logged and never rolls back
    /// the in-memory state.
    async fn commit(&self, state: &mut ActiveState, target: ActiveState) {
        if *state == target {
            return;
        }
        debug!(
            walkthrough = %self.inner.name,
            from = %state,
            to = %target,
            "Walkthrough transition"
        );
        // Explicit navigation away from a step defuses its pending
        // unmount-advance check.
        if let ActiveState::Active(prev) = &*state {
            self.inner.unmounted.lock().await.remove(prev);
        }
        *state = target.clone();

        let written = match target.persisted_value() {
            Some(value) => self.inner.store.save(&self.inner.name, value).await,
            None => self.inner.store.clear(&self.inner.name).await,
        };
        if let Err(e) = written {
            warn!(walkthrough = %self.inner.name, error = %e, "Failed to persist walkthrough state");
        }

        let _ = self.inner.events.send(target);
    }

    // ── Claim and unmount bookkeeping (used by StepHandle) ──────────

    pub(crate) fn registry(&self) -> &StepRegistry {
        &self.inner.registry
    }

    pub(crate) fn config(&self) -> &WalkthroughConfig {
        &self.inner.config
    }

    pub(crate) async fn claim(&self, key: &str, instance: InstanceId) -> bool {
        self.inner.claims.lock().await.register(key, instance)
    }

    pub(crate) async fn release_claim(&self, key: &str, instance: InstanceId) {
        self.inner.claims.lock().await.release(key, instance);
    }

    pub(crate) async fn holds_claim(&self, key: &str, instance: InstanceId) -> bool {
        self.inner.claims.lock().await.holds(key, instance)
    }

    pub(crate) async fn mark_unmounted(&self, step: &str) {
        self.inner.unmounted.lock().await.insert(step.to_string());
    }

    pub(crate) async fn clear_unmounted(&self, step: &str) {
        self.inner.unmounted.lock().await.remove(step);
    }

    pub(crate) async fn is_unmounted(&self, step: &str) -> bool {
        self.inner.unmounted.lock().await.contains(step)
    }
}
