//! Dependency lookup for component factories.
//!
//! Every factory receives a [`ComponentContext`]. Looking up a dependency records the
//! edge pair in both cells, rejects a dependency cycle before anyone blocks on it, and
//! then waits on the dependency's cell until it is constructed or startup is aborted.

use super::error::ContextError;
use crate::config::ComponentConfig;
use component_lifecycle::{downcast_component, Component, ComponentCell};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Cells and configuration shared by the orchestrator and every factory.
pub(crate) struct Registry {
    cells: HashMap<String, Arc<ComponentCell>>,
    configs: HashMap<String, ComponentConfig>,
    /// Serializes edge insertion with cycle detection.
    graph_lock: Mutex<()>,
    /// Names in the order their cells received a component.
    constructed: Mutex<Vec<String>>,
}

impl Registry {
    pub(crate) fn new(names: &[String], configs: HashMap<String, ComponentConfig>) -> Self {
        let cells = names
            .iter()
            .map(|name| (name.clone(), Arc::new(ComponentCell::new(name.clone()))))
            .collect();
        Self {
            cells,
            configs,
            graph_lock: Mutex::new(()),
            constructed: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn cell(&self, name: &str) -> Option<&Arc<ComponentCell>> {
        self.cells.get(name)
    }

    pub(crate) fn cells(&self) -> impl Iterator<Item = &Arc<ComponentCell>> {
        self.cells.values()
    }

    /// Records the construction order, then hands the component to its cell.
    ///
    /// The name is recorded first so that a dependent, which can only finish after this
    /// cell is filled, is always recorded later.
    pub(crate) fn install(&self, name: &str, component: Arc<dyn Component>) {
        let Some(cell) = self.cells.get(name) else {
            warn!(component = %name, "Dropping component without a cell");
            return;
        };
        self.constructed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(name.to_string());
        cell.set_component(component);
    }

    pub(crate) fn construction_order(&self) -> Vec<String> {
        self.constructed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Adds `requester -> target` and fails if the edge closes a cycle.
    fn link(&self, requester: &str, target: &str) -> Result<(), ContextError> {
        let _graph = self.graph_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (Some(from), Some(to)) = (self.cells.get(requester), self.cells.get(target)) else {
            return Err(ContextError::UnknownComponent(target.to_string()));
        };
        from.add_depends_on(target);
        to.add_depended_on_by(requester);

        if let Some(path) = self.dependency_path(target, requester) {
            let mut cycle = vec![requester.to_string()];
            cycle.extend(path);
            return Err(ContextError::CircularDependency(cycle));
        }
        Ok(())
    }

    /// A chain of `depends_on` edges leading from `from` to `to`, both included.
    fn dependency_path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        let mut stack = vec![vec![from.to_string()]];
        let mut visited = HashSet::new();
        while let Some(path) = stack.pop() {
            let node = path.last()?.clone();
            if node == to {
                return Some(path);
            }
            if !visited.insert(node.clone()) {
                continue;
            }
            if let Some(cell) = self.cells.get(&node) {
                for next in cell.dependencies() {
                    let mut extended = path.clone();
                    extended.push(next);
                    stack.push(extended);
                }
            }
        }
        None
    }
}

/// Handle given to a component factory while the system starts.
#[derive(Clone)]
pub struct ComponentContext {
    name: String,
    registry: Arc<Registry>,
}

impl ComponentContext {
    pub(crate) fn new(name: String, registry: Arc<Registry>) -> Self {
        Self { name, registry }
    }

    /// Name of the component being constructed.
    pub fn component_name(&self) -> &str {
        &self.name
    }

    /// This component's `[components.<name>]` section, or the defaults.
    pub fn config(&self) -> ComponentConfig {
        self.registry
            .configs
            .get(&self.name)
            .cloned()
            .unwrap_or_default()
    }

    /// `true` once startup was aborted. Long-running factories may poll this to give up
    /// early; nothing forces them to.
    pub fn is_cancelled(&self) -> bool {
        self.registry
            .cell(&self.name)
            .is_some_and(|cell| cell.is_cancellation_requested())
    }

    /// Waits for component `name` and returns it as a `T`.
    ///
    /// # Errors
    ///
    /// - [`ContextError::UnknownComponent`] if no such component is registered
    /// - [`ContextError::CircularDependency`] if the lookup closes a cycle
    /// - [`ContextError::Cancelled`] if startup is aborted first
    /// - [`ContextError::TypeMismatch`] if the component is not a `T`
    pub async fn find_component<T: Component>(&self, name: &str) -> Result<Arc<T>, ContextError> {
        self.registry.link(&self.name, name)?;
        let Some(cell) = self.registry.cell(name) else {
            return Err(ContextError::UnknownComponent(name.to_string()));
        };

        debug!(component = %self.name, dependency = %name, "Waiting for dependency");
        let component = cell.wait_and_get_component().await?;
        downcast_component::<T>(component).ok_or_else(|| ContextError::TypeMismatch {
            component: name.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }
}
