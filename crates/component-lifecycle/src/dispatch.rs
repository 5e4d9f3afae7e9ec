//! # Hook Dispatch
//!
//! Runs the fleet-wide lifecycle hooks on a cell's component, each with its own failure
//! policy:
//!
//! | Hook | On failure |
//! |---|---|
//! | `on_all_components_loaded` | fatal: wrapped with the component name and returned |
//! | `on_all_components_are_stopping` | contained: logged and swallowed |
//!
//! Also hosts [`ComponentCell::clear_component`], the extraction-driven shutdown path.

use crate::cell::ComponentCell;
use crate::component::Component;
use crate::error::LifecycleError;
use tracing::{error, info, info_span, Instrument};

impl<C: Component + ?Sized> ComponentCell<C> {
    /// Runs `on_all_components_loaded`. No-op for an empty cell.
    pub async fn on_all_components_loaded(&self) -> Result<(), LifecycleError> {
        let Some(component) = self.get_component() else {
            return Ok(());
        };
        let span = info_span!("on_all_components_loaded", component = %self.name());
        match component.on_all_components_loaded().instrument(span).await {
            Ok(()) => Ok(()),
            Err(source) => {
                let err = LifecycleError::HookFailure {
                    component: self.name().to_string(),
                    source,
                };
                error!(component = %self.name(), error = %err, "Loading hook failed");
                Err(err)
            }
        }
    }

    /// Runs `on_all_components_are_stopping`. Failures are logged, never returned.
    pub async fn on_all_components_are_stopping(&self) {
        let Some(component) = self.get_component() else {
            return;
        };
        let span = info_span!("on_all_components_are_stopping", component = %self.name());
        if let Err(e) = component.on_all_components_are_stopping().instrument(span).await {
            error!(
                component = %self.name(),
                error = %e,
                "on_all_components_are_stopping() failed"
            );
        }
    }

    /// Extracts the component and stops it. Returns `true` if this call did the stop.
    ///
    /// Safe to race: only the caller that wins the extraction runs `on_stop`.
    pub async fn clear_component(&self) -> bool {
        let Some(component) = self.extract_component() else {
            return false;
        };
        let span = info_span!("component_stop", component_name = %self.name());
        async {
            info!("Stopping component");
            component.on_stop().await;
            info!("Stopped component");
        }
        .instrument(span)
        .await;
        true
    }
}
