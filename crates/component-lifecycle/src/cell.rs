//! # Lifecycle Cell
//!
//! A [`ComponentCell`] owns zero or one component instance together with its lifecycle
//! stage, the cancellation flag and the component's dependency edges. Many tasks may
//! read or wait on a cell at once; exactly one orchestrator drives its transitions.
//!
//! ## Exclusion and Wakeups
//!
//! All mutable state lives behind one `Mutex`. Every externally visible change is
//! followed by `Notify::notify_waiters`, and blocking operations follow the
//! enable-then-check pattern:
//!
//! 1. Create a `Notified` future and `enable()` it, registering the waiter.
//! 2. Lock the state and evaluate the predicate.
//! 3. If it does not hold, drop the lock and await the notification, then repeat.
//!
//! A mutation that lands after step 1 always wakes the waiter, and a mutation that
//! lands before step 2 is always observed by it, so no wakeup is lost. The predicate is
//! re-evaluated after every wakeup; a wakeup alone proves nothing.
//!
//! ## Ownership
//!
//! The cell holds the component as `Arc<C>`. Readers get shared handles, but the right
//! to stop the component leaves the cell exactly once, through
//! [`ComponentCell::extract_component`].

use crate::component::Component;
use crate::edges::DependencyEdges;
use crate::error::LifecycleError;
use crate::stage::LifetimeStage;
use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tracing::{debug, error, warn};

pub(crate) struct CellState<C: ?Sized> {
    pub(crate) held: Option<Arc<C>>,
    pub(crate) stage: LifetimeStage,
    pub(crate) cancellation_requested: bool,
    pub(crate) edges: DependencyEdges,
}

/// Concurrent lifecycle and ownership guard for a single named component.
pub struct ComponentCell<C: ?Sized = dyn Component> {
    name: String,
    state: Mutex<CellState<C>>,
    changed: Notify,
    pub(crate) cancellation_hook_fired: AtomicBool,
}

impl<C: Component + ?Sized> ComponentCell<C> {
    /// Creates an empty cell in the [`LifetimeStage::Unborn`] stage.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(CellState {
                held: None,
                stage: LifetimeStage::Unborn,
                cancellation_requested: false,
                edges: DependencyEdges::new(),
            }),
            changed: Notify::new(),
            cancellation_hook_fired: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // =========================================================================
    // Ownership slot
    // =========================================================================

    /// Installs a freshly constructed component and advances the stage to
    /// [`LifetimeStage::Constructed`].
    ///
    /// A cell is single-shot: installing into a cell that already held a component is
    /// an orchestrator bug, and the new instance is rejected.
    ///
    /// If cancellation was requested before construction finished, the component's
    /// cancellation hook fires inline before this returns.
    pub fn set_component(&self, component: Arc<C>) {
        let cancelled = {
            let mut state = self.lock();
            if state.held.is_some() || state.stage != LifetimeStage::Unborn {
                error!(
                    component = %self.name,
                    stage = %state.stage,
                    "Rejecting second installation into a single-shot cell"
                );
                return;
            }
            state.held = Some(component);
            state.stage = LifetimeStage::Constructed;
            state.cancellation_requested
        };
        debug!(component = %self.name, cancelled, "Component installed");

        if cancelled {
            self.fire_cancellation_hook_once();
        }
        self.changed.notify_waiters();
    }

    /// Non-blocking lookup.
    pub fn get_component(&self) -> Option<Arc<C>> {
        self.lock().held.clone()
    }

    pub fn has_component(&self) -> bool {
        self.lock().held.is_some()
    }

    /// Waits until the component is installed.
    ///
    /// A component that is already held is returned even if cancellation was requested
    /// afterwards. Otherwise cancellation releases the waiter with
    /// [`LifecycleError::Cancelled`].
    pub async fn wait_and_get_component(&self) -> Result<Arc<C>, LifecycleError> {
        self.wait_until(|state| match &state.held {
            Some(component) => Some(Ok(component.clone())),
            None if state.cancellation_requested => {
                Some(Err(LifecycleError::cancelled("wait_and_get_component")))
            }
            None => None,
        })
        .await
    }

    /// Takes the component out of the cell, leaving it empty for good.
    ///
    /// Concurrent callers race; exactly one receives the component.
    pub fn extract_component(&self) -> Option<Arc<C>> {
        let extracted = self.lock().held.take();
        if extracted.is_some() {
            debug!(component = %self.name, "Component extracted");
            self.changed.notify_waiters();
        }
        extracted
    }

    // =========================================================================
    // Stage machine
    // =========================================================================

    /// Moves the cell to `stage`.
    ///
    /// Stages never move backward; such a request is ignored. Skipping a stage is
    /// applied but reported, because a waiter targeting the skipped stage would only be
    /// released by cancellation.
    pub fn set_stage(&self, stage: LifetimeStage) {
        {
            let mut state = self.lock();
            if stage < state.stage {
                warn!(component = %self.name, current = %state.stage, requested = %stage, "Ignoring backward stage switch");
                return;
            }
            if stage > state.stage && state.stage.next() != Some(stage) {
                warn!(component = %self.name, current = %state.stage, requested = %stage, "Stage switch skips a stage");
            }
            state.stage = stage;
        }
        debug!(component = %self.name, %stage, "Stage switched");
        self.changed.notify_waiters();
    }

    pub fn get_stage(&self) -> LifetimeStage {
        self.lock().stage
    }

    /// Waits until the cell is exactly at `target`.
    ///
    /// `operation` names the caller for diagnostics; it ends up in the
    /// [`LifecycleError::Cancelled`] returned when cancellation fires first.
    pub async fn wait_stage(
        &self,
        target: LifetimeStage,
        operation: &str,
    ) -> Result<(), LifecycleError> {
        self.wait_until(|state| {
            if state.stage == target {
                Some(Ok(()))
            } else if state.cancellation_requested {
                Some(Err(LifecycleError::cancelled(operation)))
            } else {
                None
            }
        })
        .await
    }

    // =========================================================================
    // Dependency edges
    // =========================================================================

    pub fn add_depends_on(&self, name: impl Into<String>) {
        let inserted = self.lock().edges.add_depends_on(name);
        if inserted {
            self.changed.notify_waiters();
        }
    }

    pub fn add_depended_on_by(&self, name: impl Into<String>) {
        let inserted = self.lock().edges.add_depended_on_by(name);
        if inserted {
            self.changed.notify_waiters();
        }
    }

    /// Does this component require `name`?
    pub fn depends_on(&self, name: &str) -> bool {
        self.lock().edges.depends_on(name)
    }

    /// Does `name` require this component?
    pub fn is_depended_on_by(&self, name: &str) -> bool {
        self.lock().edges.is_depended_on_by(name)
    }

    pub fn dependencies(&self) -> Vec<String> {
        self.lock().edges.dependencies()
    }

    pub fn dependents(&self) -> Vec<String> {
        self.lock().edges.dependents()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    pub(crate) fn lock(&self) -> MutexGuard<'_, CellState<C>> {
        // Hooks never run under this lock, so poisoning cannot leave a torn state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn notify_changed(&self) {
        self.changed.notify_waiters();
    }

    async fn wait_until<T>(&self, mut ready: impl FnMut(&CellState<C>) -> Option<T>) -> T {
        loop {
            let notified = self.changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let outcome = {
                let state = self.lock();
                ready(&state)
            };
            if let Some(outcome) = outcome {
                return outcome;
            }

            notified.await;
        }
    }
}

impl<C: ?Sized> fmt::Debug for ComponentCell<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("ComponentCell")
            .field("name", &self.name)
            .field("stage", &state.stage)
            .field("has_component", &state.held.is_some())
            .field("cancellation_requested", &state.cancellation_requested)
            .finish()
    }
}
