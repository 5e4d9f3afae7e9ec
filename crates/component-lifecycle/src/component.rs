//! # Component Trait
//!
//! The `Component` trait is the contract every long-lived service object (storage, caches,
//! clients, handlers) implements so a [`ComponentCell`](crate::ComponentCell) can own it
//! and drive its lifecycle hooks.
//!
//! # Provided Methods (Hooks)
//! Every hook has a default implementation, so a component only overrides what it needs:
//! - [`Component::on_loading_cancelled`]
//! - [`Component::on_all_components_loaded`]
//! - [`Component::on_all_components_are_stopping`]
//! - [`Component::on_stop`]
//!
//! # Object Safety
//! Cells of heterogeneous components are stored side by side as
//! `ComponentCell<dyn Component>`. The [`AsAny`] supertrait lets a dependent recover the
//! concrete type from the shared handle it receives.

use crate::error::BoxError;
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

/// Upcast helper so `Arc<dyn Component>` can be downcast to `Arc<T>`.
///
/// Implemented automatically for every `Send + Sync + 'static` type.
pub trait AsAny: Any + Send + Sync {
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A constructed service object managed by a lifecycle cell.
///
/// # Hook Failure Policy
/// - `on_loading_cancelled` is infallible; a panic propagates to whoever fired the hook.
/// - `on_all_components_loaded` failures are fatal to startup.
/// - `on_all_components_are_stopping` failures are logged and ignored so one component
///   cannot block teardown of the rest.
#[async_trait]
pub trait Component: AsAny {
    /// Startup is being aborted after this component was already constructed.
    ///
    /// Called at most once per component. Runs synchronously, possibly on the task that
    /// installed the component, so it must not block.
    fn on_loading_cancelled(&self) {}

    /// Every component of the system was constructed and every dependency of this one
    /// has finished its own `on_all_components_loaded`.
    async fn on_all_components_loaded(&self) -> Result<(), BoxError> {
        Ok(())
    }

    /// Shutdown started. Every component depending on this one was already notified.
    async fn on_all_components_are_stopping(&self) -> Result<(), BoxError> {
        Ok(())
    }

    /// Release resources. Invoked exactly once, by whoever extracted the component.
    async fn on_stop(&self) {}
}

/// Downcasts a shared component handle to its concrete type.
///
/// Returns `None` if the component is not a `T`.
pub fn downcast_component<T: Component>(component: Arc<dyn Component>) -> Option<Arc<T>> {
    component.as_any_arc().downcast::<T>().ok()
}
