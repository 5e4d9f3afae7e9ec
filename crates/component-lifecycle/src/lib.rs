//! # Component Lifecycle
//!
//! The per-component concurrent lifecycle state machine of a dependency-injection
//! runtime. Every component of a long-lived service process is wrapped in a
//! [`ComponentCell`]: many tasks race to construct components, many more block until the
//! components they depend on are available, and an orchestrator may abort the whole
//! startup at any moment.
//!
//! ## Architecture Overview
//!
//! 1. **Lifecycle Cell** ([`ComponentCell`]) - ownership slot, stage, cancellation flag
//!    and edge sets behind one lock, with blocking waits that never lose a wakeup
//! 2. **Stage Machine** ([`LifetimeStage`]) - the ordered stages a component moves through
//! 3. **Cancellation Protocol** ([`cancellation`]) - the one-way abort signal and the
//!    exactly-once cancellation hook
//! 4. **Dependency Edge Registry** ([`DependencyEdges`]) - both directions of every edge,
//!    queryable in O(1)
//!
//! ## Example
//!
//! ```rust
//! use component_lifecycle::{Component, ComponentCell, LifetimeStage};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct Storage;
//!
//! #[async_trait]
//! impl Component for Storage {}
//!
//! #[tokio::main]
//! async fn main() {
//!     let cell: Arc<ComponentCell> = Arc::new(ComponentCell::new("storage"));
//!
//!     // A dependent blocks until the component is constructed.
//!     let waiter = tokio::spawn({
//!         let cell = cell.clone();
//!         async move { cell.wait_and_get_component().await }
//!     });
//!
//!     cell.set_component(Arc::new(Storage));
//!     assert!(waiter.await.unwrap().is_ok());
//!     assert_eq!(cell.get_stage(), LifetimeStage::Constructed);
//!
//!     // Teardown: extraction hands the component out exactly once.
//!     assert!(cell.clear_component().await);
//!     assert!(cell.extract_component().is_none());
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Cells are shared as `Arc<ComponentCell>` across Tokio tasks
//! - Mutations are mutually exclusive and always followed by a broadcast wakeup
//! - [`ComponentCell::wait_and_get_component`] and [`ComponentCell::wait_stage`] are the
//!   only suspension points; both re-check their predicate after every wakeup
//! - Cancellation has no timeout of its own; race a wait against `tokio::time::timeout`
//!   when a deadline is needed
//!
//! ## Testing
//!
//! See the [`mock`] module for a hook-counting [`Component`].

pub mod cancellation;
pub mod cell;
pub mod component;
pub mod dispatch;
pub mod edges;
pub mod error;
pub mod mock;
pub mod stage;
pub mod tracing;

pub use cell::ComponentCell;
pub use component::{downcast_component, AsAny, Component};
pub use edges::DependencyEdges;
pub use error::{BoxError, LifecycleError};
pub use stage::LifetimeStage;
