//! Errors surfaced by the orchestrator and by [`ComponentContext`](super::ComponentContext).

use component_lifecycle::{BoxError, LifecycleError};
use std::time::Duration;

/// Failures of a dependency lookup performed by a component factory.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("Component {0} is not registered or disabled")]
    UnknownComponent(String),

    /// The cell exists but holds no component, e.g. it was already stopped.
    #[error("Component {0} is not available")]
    Unavailable(String),

    #[error("Circular dependency between components: {}", .0.join(" -> "))]
    CircularDependency(Vec<String>),

    #[error("Component {component} is not a {expected}")]
    TypeMismatch {
        component: String,
        expected: &'static str,
    },

    /// Startup was aborted while waiting for the dependency.
    #[error(transparent)]
    Cancelled(#[from] LifecycleError),
}

/// Failures of a whole-system startup.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("Component {0} registered twice")]
    DuplicateComponent(String),

    #[error("Component {component} failed to construct: {source}")]
    ComponentFailed {
        component: String,
        #[source]
        source: BoxError,
    },

    #[error("Lifecycle task of component {component} panicked")]
    ComponentPanicked { component: String },

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Startup aborted")]
    StartupAborted,

    #[error("Startup did not finish within {0:?}")]
    StartupTimeout(Duration),
}
