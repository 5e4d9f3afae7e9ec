//! # Cancellation Protocol
//!
//! Cancellation means "stop trying to finish startup, but do not corrupt state". It is a
//! one-way flag per cell plus an exactly-once notification of the held component.
//!
//! Construction and cancellation run on independent tasks, so two orderings must
//! converge on the same outcome:
//!
//! 1. The component is already installed when the orchestrator cancels. The orchestrator
//!    calls [`ComponentCell::request_cancellation`] and then
//!    [`ComponentCell::fire_cancellation_hook_once`].
//! 2. Cancellation lands first. [`ComponentCell::set_component`] sees the flag and fires
//!    the hook itself before returning.
//!
//! Both paths go through the same guarded function, and the fired flag is a single
//! atomic test-and-set, so the hook runs at most once however the race resolves.

use crate::cell::ComponentCell;
use crate::component::Component;
use std::sync::atomic::Ordering;
use tracing::{debug, info};

impl<C: Component + ?Sized> ComponentCell<C> {
    /// Marks startup as aborted for this cell and wakes every waiter.
    ///
    /// Does not notify the component; see [`Self::fire_cancellation_hook_once`].
    pub fn request_cancellation(&self) {
        let first = {
            let mut state = self.lock();
            !std::mem::replace(&mut state.cancellation_requested, true)
        };
        if first {
            debug!(component = %self.name(), "Cancellation requested");
        }
        self.notify_changed();
    }

    pub fn is_cancellation_requested(&self) -> bool {
        self.lock().cancellation_requested
    }

    /// Invokes [`Component::on_loading_cancelled`] if a component is held and the hook
    /// has not fired yet. Returns `true` if this call fired it.
    ///
    /// The hook runs outside the cell lock.
    pub fn fire_cancellation_hook_once(&self) -> bool {
        let Some(component) = self.get_component() else {
            return false;
        };
        if self.cancellation_hook_fired.swap(true, Ordering::AcqRel) {
            return false;
        }
        info!(component = %self.name(), "Notifying component about cancelled loading");
        component.on_loading_cancelled();
        true
    }

    pub fn cancellation_hook_fired(&self) -> bool {
        self.cancellation_hook_fired.load(Ordering::Acquire)
    }
}
