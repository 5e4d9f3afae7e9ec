//! Runtime configuration.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read, parse & validate)
//!     → RuntimeConfig (immutable)
//!     → ComponentSystem::start (enabled components, startup timeout)
//!     → ComponentContext::config (per-component settings)
//! ```
//!
//! Every field has a default, so an empty file is a valid config.

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{ComponentConfig, RuntimeConfig};
