//! # Lifecycle Errors
//!
//! Only two things can go wrong inside a lifecycle cell: a blocked waiter is released
//! because startup was aborted, or an "all components loaded" hook fails. Both are
//! defined here so the orchestrator and dependent components match on the same type.

/// Error type produced by component hooks and factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by a [`ComponentCell`](crate::ComponentCell).
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// Cancellation won the race against the awaited condition.
    ///
    /// This never means the component itself is broken; it means startup is being
    /// aborted and the caller should unwind.
    #[error("{operation} cancelled")]
    Cancelled { operation: String },

    /// `on_all_components_loaded` failed. Always fatal to startup.
    #[error("on_all_components_loaded() failed for component {component}: {source}")]
    HookFailure {
        component: String,
        #[source]
        source: BoxError,
    },
}

impl LifecycleError {
    pub fn cancelled(operation: impl Into<String>) -> Self {
        LifecycleError::Cancelled {
            operation: operation.into(),
        }
    }

    /// Returns `true` if this error only signals an aborted startup.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LifecycleError::Cancelled { .. })
    }
}
