//! Sample components wired as `storage <- cache <- greeter`.
//!
//! Each module exposes its component type, a `NAME` constant and an
//! `async fn create(ctx)` factory.

pub mod cache;
pub mod greeter;
pub mod storage;

pub use cache::GreetingCache;
pub use greeter::Greeter;
pub use storage::KeyValueStorage;

use crate::lifecycle::ComponentList;

/// Registers every sample component.
pub fn component_list() -> ComponentList {
    ComponentList::new()
        .add(storage::NAME, storage::create)
        .add(cache::NAME, cache::create)
        .add(greeter::NAME, greeter::create)
}
