//! # Observability & Tracing
//!
//! Structured logging for the lifecycle machinery, built on the `tracing` crate.
//!
//! ## What Gets Traced
//!
//! - **Installation**: `Component installed` with the cancellation flag at that instant
//! - **Stage switches**: `Stage switched` at debug level, warnings for backward or
//!   skipping switches
//! - **Cancellation**: `Cancellation requested`, `Notifying component about cancelled loading`
//! - **Hooks**: spans `on_all_components_loaded` and `on_all_components_are_stopping`
//! - **Shutdown**: span `component_stop` around `Stopping component` / `Stopped component`
//!
//! Every event carries the component name as a structured field, so
//! `RUST_LOG=component_lifecycle=debug` gives a per-component timeline.
//!
//! ```bash
//! RUST_LOG=info cargo run      # Lifecycle milestones
//! RUST_LOG=debug cargo run     # Every stage switch and edge
//! ```

use tracing_subscriber::EnvFilter;

/// Initializes the global subscriber, filtering with `RUST_LOG` and falling back to
/// `default_directive` (e.g. `"info"`) when `RUST_LOG` is unset or invalid.
pub fn setup_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
