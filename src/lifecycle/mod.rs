//! # System Lifecycle & Orchestration
//!
//! This module drives every [`ComponentCell`](component_lifecycle::ComponentCell) of a
//! service process from construction to teardown.
//!
//! ## The Orchestration Pattern
//!
//! Individual components are simple. **Wiring them together** is where complexity lives:
//! components are built concurrently and discover their dependencies while they are
//! being built, so nobody knows the dependency graph up front.
//!
//! **Key Responsibilities:**
//! 1. **Construction** - Run every factory concurrently on tokio
//! 2. **Dependency Injection** - Factories block on the cells of their dependencies
//!    through [`ComponentContext::find_component`]
//! 3. **Loading** - Run `on_all_components_loaded` once all dependencies have run theirs
//! 4. **Abort** - Cancel every cell on the first failure, an external abort or a timeout
//! 5. **Graceful Shutdown** - Stop components in reverse construction order
//!
//! ## Dependency Injection via Context
//!
//! ```rust,ignore
//! async fn create(ctx: ComponentContext) -> Result<GreetingCache, BoxError> {
//!     // Blocks until storage is constructed; records cache -> storage
//!     let storage = ctx.find_component::<KeyValueStorage>("storage").await?;
//!     Ok(GreetingCache::new(storage))
//! }
//!
//! let list = ComponentList::new()
//!     .add("storage", storage::create)
//!     .add("cache", create);
//! let system = ComponentSystem::start(list, &RuntimeConfig::default()).await?;
//! ```
//!
//! Cycles are reported as [`ContextError::CircularDependency`] by the lookup that closes
//! them, before anything blocks on the cycle.

pub mod component_list;
pub mod component_system;
pub mod context;
pub mod error;

pub use component_list::{ComponentFactory, ComponentList};
pub use component_system::ComponentSystem;
pub use context::ComponentContext;
pub use error::{ContextError, SystemError};
