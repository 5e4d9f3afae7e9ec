use super::component_list::{ComponentFactory, ComponentList};
use super::context::{ComponentContext, Registry};
use super::error::{ContextError, SystemError};
use crate::config::RuntimeConfig;
use component_lifecycle::{downcast_component, Component, ComponentCell, LifetimeStage};
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{Id, JoinSet};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

const LOADING_OPERATION: &str = "on_all_components_loaded";

/// The orchestrator driving every component cell of a service process.
///
/// `ComponentSystem` is responsible for:
/// - **Construction**: Running every factory concurrently; factories block on the cells
///   of the components they depend on
/// - **Loading**: Calling `on_all_components_loaded` on each component once all of its
///   dependencies have finished theirs
/// - **Abort**: Broadcasting cancellation to every cell when anything fails, when the
///   caller's abort signal fires, or when the startup deadline passes
/// - **Teardown**: Notifying and stopping components in reverse construction order
///
/// # Example
///
/// ```ignore
/// let system = ComponentSystem::start(component_list(), &config).await?;
///
/// let greeter = system.find_component::<Greeter>("greeter")?;
/// greeter.greet("Alice");
///
/// system.shutdown().await;
/// ```
pub struct ComponentSystem {
    registry: Arc<Registry>,
}

type LifecycleTasks = JoinSet<Result<(), SystemError>>;

impl ComponentSystem {
    /// Constructs and loads every component in `list`.
    ///
    /// On failure, every component constructed so far is torn down before the error is
    /// returned.
    pub async fn start(list: ComponentList, config: &RuntimeConfig) -> Result<Self, SystemError> {
        Self::start_until(list, config, std::future::pending()).await
    }

    /// Like [`start`](Self::start), but aborts startup as soon as `abort` completes.
    ///
    /// Construction already in progress is not interrupted; it finishes, sees the
    /// cancellation and is torn down.
    pub async fn start_until(
        list: ComponentList,
        config: &RuntimeConfig,
        abort: impl Future<Output = ()>,
    ) -> Result<Self, SystemError> {
        debug!(registered = list.len(), "Registering components");
        let mut seen = HashSet::new();
        let mut factories = Vec::new();
        for (name, factory) in list.into_entries() {
            if !seen.insert(name.clone()) {
                return Err(SystemError::DuplicateComponent(name));
            }
            if config.is_enabled(&name) {
                factories.push((name, factory));
            } else {
                info!(component = %name, "Component disabled by config");
            }
        }

        let names: Vec<String> = factories.iter().map(|(name, _)| name.clone()).collect();
        let registry = Arc::new(Registry::new(&names, config.components.clone()));
        let system = Self { registry };

        let deadline = config.startup_timeout().map(|timeout| (Instant::now() + timeout, timeout));
        let mut abort = std::pin::pin!(abort);
        let mut supervisor = Supervisor {
            system: &system,
            abort: abort.as_mut(),
            deadline,
            failure: None,
        };

        info!(components = names.len(), "Starting component system");
        let mut outcome = supervisor.run(system.spawn_construction(factories)).await;
        if outcome.is_ok() {
            info!("All components constructed");
            outcome = supervisor.run(system.spawn_loading()).await;
        }

        match outcome {
            Ok(()) => {
                info!("All components loaded");
                Ok(system)
            }
            Err(e) => {
                error!(error = %e, "Component system startup failed");
                system.teardown().await;
                Err(e)
            }
        }
    }

    /// Notifies and stops every component in reverse construction order.
    ///
    /// Failures of `on_all_components_are_stopping` are logged and never prevent the
    /// remaining components from stopping.
    pub async fn shutdown(self) {
        info!("Shutting down component system...");
        self.teardown().await;
        info!("Component system shutdown complete.");
    }

    /// Returns a constructed component as a `T`, without waiting.
    pub fn find_component<T: Component>(&self, name: &str) -> Result<Arc<T>, ContextError> {
        let cell = self
            .registry
            .cell(name)
            .ok_or_else(|| ContextError::UnknownComponent(name.to_string()))?;
        let component = cell
            .get_component()
            .ok_or_else(|| ContextError::Unavailable(name.to_string()))?;
        downcast_component::<T>(component).ok_or_else(|| ContextError::TypeMismatch {
            component: name.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }

    pub fn cell(&self, name: &str) -> Option<Arc<ComponentCell>> {
        self.registry.cell(name).cloned()
    }

    /// Component names in construction order.
    pub fn component_names(&self) -> Vec<String> {
        self.registry.construction_order()
    }

    /// One line per component with its stage and both edge directions.
    pub fn startup_report(&self) -> String {
        let mut report = String::new();
        for name in self.registry.construction_order() {
            if let Some(cell) = self.registry.cell(&name) {
                let _ = writeln!(
                    report,
                    "{name} [{}] depends_on=[{}] depended_on_by=[{}]",
                    cell.get_stage(),
                    cell.dependencies().join(", "),
                    cell.dependents().join(", "),
                );
            }
        }
        report
    }

    // =========================================================================
    // Phases
    // =========================================================================

    fn spawn_construction(
        &self,
        factories: Vec<(String, Arc<dyn ComponentFactory>)>,
    ) -> (LifecycleTasks, HashMap<Id, String>) {
        let mut tasks = JoinSet::new();
        let mut names = HashMap::new();
        for (name, factory) in factories {
            let handle = tasks.spawn(construct(self.registry.clone(), name.clone(), factory));
            names.insert(handle.id(), name);
        }
        (tasks, names)
    }

    fn spawn_loading(&self) -> (LifecycleTasks, HashMap<Id, String>) {
        let mut tasks = JoinSet::new();
        let mut names = HashMap::new();
        for name in self.registry.construction_order() {
            let handle = tasks.spawn(load(self.registry.clone(), name.clone()));
            names.insert(handle.id(), name);
        }
        (tasks, names)
    }

    /// Broadcasts cancellation: every waiter is released and every constructed
    /// component is told that loading was cancelled.
    fn cancel_components_load(&self) {
        warn!("Cancelling components load");
        for cell in self.registry.cells() {
            cell.request_cancellation();
        }
        for cell in self.registry.cells() {
            cell.fire_cancellation_hook_once();
        }
    }

    async fn teardown(&self) {
        let order = self.registry.construction_order();

        for name in order.iter().rev() {
            if let Some(cell) = self.registry.cell(name) {
                cell.on_all_components_are_stopping().await;
                advance_to(cell, LifetimeStage::NotifiedPeersStopping);
            }
        }
        for name in order.iter().rev() {
            if let Some(cell) = self.registry.cell(name) {
                cell.clear_component().await;
                advance_to(cell, LifetimeStage::TornDown);
            }
        }
    }
}

async fn construct(
    registry: Arc<Registry>,
    name: String,
    factory: Arc<dyn ComponentFactory>,
) -> Result<(), SystemError> {
    debug!(component = %name, "Constructing component");
    let context = ComponentContext::new(name.clone(), registry.clone());
    match factory.create(context).await {
        Ok(component) => {
            registry.install(&name, component);
            info!(component = %name, "Component constructed");
            Ok(())
        }
        Err(source) => Err(SystemError::ComponentFailed {
            component: name,
            source,
        }),
    }
}

/// Waits for every dependency to reach `Running`, runs the loading hook, then switches
/// the component to `Running`.
async fn load(registry: Arc<Registry>, name: String) -> Result<(), SystemError> {
    let Some(cell) = registry.cell(&name) else {
        return Ok(());
    };
    for dependency in cell.dependencies() {
        if let Some(dependency_cell) = registry.cell(&dependency) {
            dependency_cell
                .wait_stage(LifetimeStage::Running, LOADING_OPERATION)
                .await?;
        }
    }
    cell.on_all_components_loaded().await?;
    cell.set_stage(LifetimeStage::Running);
    debug!(component = %name, "Component loaded");
    Ok(())
}

/// Steps a constructed cell forward one stage at a time up to `target`.
fn advance_to(cell: &ComponentCell, target: LifetimeStage) {
    let mut stage = cell.get_stage();
    if stage == LifetimeStage::Unborn {
        return;
    }
    while stage < target {
        let Some(next) = stage.next() else {
            break;
        };
        cell.set_stage(next);
        stage = next;
    }
}

/// Joins a phase's tasks while watching for the first failure, the abort signal and
/// the startup deadline.
struct Supervisor<'a, A: Future<Output = ()>> {
    system: &'a ComponentSystem,
    abort: Pin<&'a mut A>,
    deadline: Option<(Instant, Duration)>,
    failure: Option<SystemError>,
}

impl<A: Future<Output = ()>> Supervisor<'_, A> {
    /// Runs a phase to completion. Once anything fails, cancellation is broadcast and
    /// the remaining tasks are still joined, so nothing outlives the phase.
    async fn run(
        &mut self,
        (mut tasks, names): (LifecycleTasks, HashMap<Id, String>),
    ) -> Result<(), SystemError> {
        loop {
            let armed = self.failure.is_none();
            let (deadline, timeout) = self.deadline.unwrap_or((Instant::now(), Duration::ZERO));

            let joined = tokio::select! {
                joined = tasks.join_next_with_id() => joined,
                _ = self.abort.as_mut(), if armed => {
                    self.fail(SystemError::StartupAborted);
                    continue;
                }
                _ = tokio::time::sleep_until(deadline), if armed && self.deadline.is_some() => {
                    self.fail(SystemError::StartupTimeout(timeout));
                    continue;
                }
            };

            let result = match joined {
                None => break,
                Some(Ok((_, result))) => result,
                Some(Err(join_error)) => Err(SystemError::ComponentPanicked {
                    component: names
                        .get(&join_error.id())
                        .cloned()
                        .unwrap_or_else(|| "<unknown>".to_string()),
                }),
            };
            if let Err(e) = result {
                self.fail(e);
            }
        }

        match self.failure.take() {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }

    fn fail(&mut self, error: SystemError) {
        if self.failure.is_some() {
            debug!(error = %error, "Ignoring failure after cancellation");
            return;
        }
        error!(error = %error, "Aborting startup");
        self.failure = Some(error);
        self.system.cancel_components_load();
    }
}
