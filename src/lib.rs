//! # Component Runtime
//!
//! > **Concurrent construction, loading and teardown of interdependent service components.**
//!
//! A service process is a set of long-lived components (storage, caches, clients,
//! handlers). This crate starts them all at once, lets each one discover its dependencies
//! while it is being built, and stops them in reverse order. The per-component state
//! machine lives in the [`component_lifecycle`] crate; this crate is the orchestrator on
//! top of it.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Orchestrator ([`lifecycle`])
//! - **Role**: Runs every factory concurrently, waits out the dependency graph, aborts
//!   cleanly and tears everything down.
//! - **Key items**: [`ComponentSystem`](lifecycle::ComponentSystem),
//!   [`ComponentList`](lifecycle::ComponentList),
//!   [`ComponentContext`](lifecycle::ComponentContext).
//!
//! ### 2. Configuration ([`config`])
//! - **Role**: TOML config with the log level, the startup timeout and one section per
//!   component.
//! - **Key items**: [`RuntimeConfig`](config::RuntimeConfig), [`load_config`](config::load_config).
//!
//! ### 3. Sample Components ([`components`])
//! - **Role**: A small `storage <- cache <- greeter` chain showing factories, lookups
//!   and hooks.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run
//!
//! # Run it with a config file
//! COMPONENT_RUNTIME_CONFIG=runtime.toml cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test --workspace
//! ```

pub mod components;
pub mod config;
pub mod lifecycle;
