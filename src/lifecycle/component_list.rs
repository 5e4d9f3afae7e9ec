//! Registration of named component factories.

use super::context::ComponentContext;
use async_trait::async_trait;
use component_lifecycle::{BoxError, Component};
use std::future::Future;
use std::sync::Arc;

/// Builds one component, looking up its dependencies through the context.
///
/// Implemented for every `Fn(ComponentContext) -> impl Future<Output = Result<C, BoxError>>`,
/// so plain async closures and `async fn create(ctx)` functions work as factories.
#[async_trait]
pub trait ComponentFactory: Send + Sync + 'static {
    async fn create(&self, context: ComponentContext) -> Result<Arc<dyn Component>, BoxError>;
}

#[async_trait]
impl<F, Fut, C> ComponentFactory for F
where
    F: Fn(ComponentContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<C, BoxError>> + Send + 'static,
    C: Component,
{
    async fn create(&self, context: ComponentContext) -> Result<Arc<dyn Component>, BoxError> {
        let component = (self)(context).await?;
        Ok(Arc::new(component))
    }
}

/// Ordered set of `(name, factory)` pairs to start as one system.
///
/// ```rust,ignore
/// let list = ComponentList::new()
///     .add("storage", storage::create)
///     .add("cache", cache::create);
/// let system = ComponentSystem::start(list, &RuntimeConfig::default()).await?;
/// ```
#[derive(Default)]
pub struct ComponentList {
    entries: Vec<(String, Arc<dyn ComponentFactory>)>,
}

impl ComponentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory. Duplicate names are rejected when the system starts.
    pub fn add(mut self, name: impl Into<String>, factory: impl ComponentFactory) -> Self {
        self.entries.push((name.into(), Arc::new(factory)));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<(String, Arc<dyn ComponentFactory>)> {
        self.entries
    }
}
