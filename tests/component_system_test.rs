use component_lifecycle::mock::{EventJournal, MockComponent};
use component_lifecycle::{BoxError, LifecycleError, LifetimeStage};
use component_runtime::components::KeyValueStorage;
use component_runtime::config::RuntimeConfig;
use component_runtime::lifecycle::{
    ComponentContext, ComponentFactory, ComponentList, ComponentSystem, ContextError, SystemError,
};
use std::time::Duration;

/// A mock factory that looks up `deps` before constructing itself.
fn mock(
    name: &'static str,
    deps: &'static [&'static str],
    journal: &EventJournal,
) -> impl ComponentFactory {
    let journal = journal.clone();
    move |ctx: ComponentContext| {
        let journal = journal.clone();
        async move {
            for dep in deps {
                ctx.find_component::<MockComponent>(dep).await?;
            }
            Ok::<_, BoxError>(MockComponent::named(name).with_journal(journal))
        }
    }
}

fn failing(name: &'static str, delay: Duration) -> impl ComponentFactory {
    move |_ctx: ComponentContext| async move {
        tokio::time::sleep(delay).await;
        Err::<MockComponent, BoxError>(format!("{name} exploded").into())
    }
}

fn count(journal: &EventJournal, event: &str) -> usize {
    journal.events().iter().filter(|e| *e == event).count()
}

fn context_error(error: &SystemError) -> &ContextError {
    match error {
        SystemError::ComponentFailed { source, .. } => source
            .downcast_ref::<ContextError>()
            .expect("failure caused by a lookup"),
        other => panic!("expected a construction failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_chain_loads_in_dependency_order_and_stops_in_reverse() {
    let journal = EventJournal::new();
    // Registered out of order on purpose.
    let list = ComponentList::new()
        .add("greeter", mock("greeter", &["cache"], &journal))
        .add("cache", mock("cache", &["storage"], &journal))
        .add("storage", mock("storage", &[], &journal));

    let system = ComponentSystem::start(list, &RuntimeConfig::default())
        .await
        .expect("startup");

    assert_eq!(system.component_names(), vec!["storage", "cache", "greeter"]);
    let cells: Vec<_> = system
        .component_names()
        .iter()
        .map(|name| system.cell(name).unwrap())
        .collect();
    for cell in &cells {
        assert_eq!(cell.get_stage(), LifetimeStage::Running);
    }
    let cache = system.cell("cache").unwrap();
    assert!(cache.depends_on("storage"));
    assert!(cache.is_depended_on_by("greeter"));

    let loaded = |name: &str| journal.position(&format!("loaded:{name}")).unwrap();
    assert!(loaded("storage") < loaded("cache"));
    assert!(loaded("cache") < loaded("greeter"));

    system.shutdown().await;

    assert_eq!(
        journal.events()[3..],
        [
            "stopping:greeter",
            "stopping:cache",
            "stopping:storage",
            "stop:greeter",
            "stop:cache",
            "stop:storage",
        ]
    );
    for cell in &cells {
        assert_eq!(cell.get_stage(), LifetimeStage::TornDown);
        assert!(!cell.has_component());
        assert!(!cell.cancellation_hook_fired());
    }
}

#[tokio::test]
async fn test_construction_failure_cancels_and_tears_down() {
    let journal = EventJournal::new();
    let list = ComponentList::new()
        .add("storage", mock("storage", &[], &journal))
        .add("cache", mock("cache", &["storage", "broken"], &journal))
        .add("broken", failing("broken", Duration::from_millis(20)));

    let err = ComponentSystem::start(list, &RuntimeConfig::default())
        .await
        .err()
        .expect("startup must fail");

    match &err {
        SystemError::ComponentFailed { component, source } => {
            assert_eq!(component, "broken");
            assert_eq!(source.to_string(), "broken exploded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(count(&journal, "cancelled:storage"), 1);
    assert_eq!(count(&journal, "stopping:storage"), 1);
    assert_eq!(count(&journal, "stop:storage"), 1);
    assert!(journal.events().iter().all(|e| !e.ends_with(":cache")));
}

#[tokio::test]
async fn test_unknown_dependency() {
    let journal = EventJournal::new();
    let list = ComponentList::new().add("cache", mock("cache", &["storage"], &journal));

    let err = ComponentSystem::start(list, &RuntimeConfig::default())
        .await
        .err()
        .expect("startup must fail");

    assert!(matches!(
        context_error(&err),
        ContextError::UnknownComponent(name) if name == "storage"
    ));
}

#[tokio::test]
async fn test_dependency_cycle_is_reported() {
    let journal = EventJournal::new();
    let list = ComponentList::new()
        .add("a", mock("a", &["b"], &journal))
        .add("b", mock("b", &["c"], &journal))
        .add("c", mock("c", &["a"], &journal));

    let err = tokio::time::timeout(
        Duration::from_secs(5),
        ComponentSystem::start(list, &RuntimeConfig::default()),
    )
    .await
    .expect("a cycle must not deadlock")
    .err()
    .expect("startup must fail");

    match context_error(&err) {
        ContextError::CircularDependency(path) => {
            assert_eq!(path.len(), 4);
            assert_eq!(path.first(), path.last());
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(journal.events().is_empty());
}

#[tokio::test]
async fn test_loading_hook_failure_aborts_startup() {
    let journal = EventJournal::new();
    let cache_journal = journal.clone();
    let list = ComponentList::new()
        .add("storage", mock("storage", &[], &journal))
        .add("cache", move |ctx: ComponentContext| {
            let journal = cache_journal.clone();
            async move {
                ctx.find_component::<MockComponent>("storage").await?;
                Ok::<_, BoxError>(
                    MockComponent::named("cache")
                        .with_journal(journal)
                        .fail_on_loaded("warm-up failed"),
                )
            }
        })
        .add("greeter", mock("greeter", &["cache"], &journal));

    let err = ComponentSystem::start(list, &RuntimeConfig::default())
        .await
        .err()
        .expect("startup must fail");

    match err {
        SystemError::Lifecycle(LifecycleError::HookFailure { component, source }) => {
            assert_eq!(component, "cache");
            assert_eq!(source.to_string(), "warm-up failed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(count(&journal, "loaded:greeter"), 0);
    for name in ["storage", "cache", "greeter"] {
        assert_eq!(count(&journal, &format!("cancelled:{name}")), 1);
        assert_eq!(count(&journal, &format!("stop:{name}")), 1);
    }
}

#[tokio::test]
async fn test_stopping_hook_failure_is_contained() {
    let journal = EventJournal::new();
    let cache_journal = journal.clone();
    let list = ComponentList::new()
        .add("storage", mock("storage", &[], &journal))
        .add("cache", move |ctx: ComponentContext| {
            let journal = cache_journal.clone();
            async move {
                ctx.find_component::<MockComponent>("storage").await?;
                Ok::<_, BoxError>(
                    MockComponent::named("cache")
                        .with_journal(journal)
                        .fail_on_stopping("flush failed"),
                )
            }
        });

    let system = ComponentSystem::start(list, &RuntimeConfig::default())
        .await
        .expect("startup");
    system.shutdown().await;

    assert_eq!(count(&journal, "stopping:storage"), 1);
    assert_eq!(count(&journal, "stop:cache"), 1);
    assert_eq!(count(&journal, "stop:storage"), 1);
}

#[tokio::test]
async fn test_abort_signal_cancels_slow_construction() {
    let journal = EventJournal::new();
    let slow_journal = journal.clone();
    let list = ComponentList::new()
        .add("storage", mock("storage", &[], &journal))
        .add("slow", move |_ctx: ComponentContext| {
            let journal = slow_journal.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok::<_, BoxError>(MockComponent::named("slow").with_journal(journal))
            }
        })
        .add("cache", mock("cache", &["slow"], &journal));

    let abort = tokio::time::sleep(Duration::from_millis(20));
    let err = ComponentSystem::start_until(list, &RuntimeConfig::default(), abort)
        .await
        .err()
        .expect("startup must be aborted");

    assert!(matches!(err, SystemError::StartupAborted));
    assert_eq!(count(&journal, "cancelled:storage"), 1);
    assert_eq!(count(&journal, "cancelled:slow"), 1);
    assert_eq!(count(&journal, "stop:slow"), 1);
    assert_eq!(count(&journal, "stop:storage"), 1);
    assert_eq!(count(&journal, "cancelled:cache"), 0);
}

#[tokio::test]
async fn test_startup_timeout() {
    let config = RuntimeConfig::from_toml_str("startup_timeout_ms = 30").unwrap();
    let list = ComponentList::new().add("patient", |ctx: ComponentContext| async move {
        while !ctx.is_cancelled() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        Err::<MockComponent, BoxError>("gave up".into())
    });

    let err = ComponentSystem::start(list, &config)
        .await
        .err()
        .expect("startup must time out");

    assert!(matches!(
        err,
        SystemError::StartupTimeout(timeout) if timeout == Duration::from_millis(30)
    ));
}

#[tokio::test]
async fn test_type_mismatch() {
    let journal = EventJournal::new();
    let list = ComponentList::new()
        .add("storage", mock("storage", &[], &journal))
        .add("cache", |ctx: ComponentContext| async move {
            ctx.find_component::<KeyValueStorage>("storage").await?;
            Ok::<_, BoxError>(MockComponent::named("cache"))
        });

    let err = ComponentSystem::start(list, &RuntimeConfig::default())
        .await
        .err()
        .expect("startup must fail");

    assert!(matches!(
        context_error(&err),
        ContextError::TypeMismatch { component, .. } if component == "storage"
    ));
}

#[tokio::test]
async fn test_duplicate_component() {
    let journal = EventJournal::new();
    let list = ComponentList::new()
        .add("storage", mock("storage", &[], &journal))
        .add("storage", mock("storage", &[], &journal));

    let err = ComponentSystem::start(list, &RuntimeConfig::default())
        .await
        .err()
        .expect("startup must fail");

    assert!(matches!(err, SystemError::DuplicateComponent(name) if name == "storage"));
    assert!(journal.events().is_empty());
}

#[tokio::test]
async fn test_panicking_factory() {
    let list = ComponentList::new().add("storage", |_ctx: ComponentContext| async move {
        if true {
            panic!("factory bug");
        }
        Ok::<_, BoxError>(MockComponent::new())
    });

    let err = ComponentSystem::start(list, &RuntimeConfig::default())
        .await
        .err()
        .expect("startup must fail");

    assert!(matches!(
        err,
        SystemError::ComponentPanicked { component } if component == "storage"
    ));
}

#[tokio::test]
async fn test_disabled_component_is_skipped() {
    let journal = EventJournal::new();
    let config = RuntimeConfig::from_toml_str(
        r#"
        [components.cache]
        enabled = false
        "#,
    )
    .unwrap();
    let list = ComponentList::new()
        .add("storage", mock("storage", &[], &journal))
        .add("cache", mock("cache", &["storage"], &journal));

    let system = ComponentSystem::start(list, &config).await.expect("startup");

    assert_eq!(system.component_names(), vec!["storage"]);
    assert!(system.cell("cache").is_none());
    assert!(matches!(
        system.find_component::<MockComponent>("cache"),
        Err(ContextError::UnknownComponent(_))
    ));
    system.shutdown().await;
}

#[tokio::test]
async fn test_find_component_on_running_system() {
    let journal = EventJournal::new();
    let list = ComponentList::new().add("storage", mock("storage", &[], &journal));
    let system = ComponentSystem::start(list, &RuntimeConfig::default())
        .await
        .expect("startup");

    let storage = system.find_component::<MockComponent>("storage").unwrap();
    assert_eq!(storage.name(), "storage");
    assert_eq!(storage.loaded_calls(), 1);
    assert!(matches!(
        system.find_component::<KeyValueStorage>("storage"),
        Err(ContextError::TypeMismatch { .. })
    ));

    drop(storage);
    system.shutdown().await;
}

#[tokio::test]
async fn test_find_component_after_extraction() {
    let journal = EventJournal::new();
    let list = ComponentList::new().add("storage", mock("storage", &[], &journal));
    let system = ComponentSystem::start(list, &RuntimeConfig::default())
        .await
        .expect("startup");

    let cell = system.cell("storage").unwrap();
    assert!(cell.extract_component().is_some());

    assert!(matches!(
        system.find_component::<MockComponent>("storage"),
        Err(ContextError::Unavailable(name)) if name == "storage"
    ));
    assert!(matches!(
        system.find_component::<MockComponent>("missing"),
        Err(ContextError::UnknownComponent(name)) if name == "missing"
    ));
    system.shutdown().await;
}

#[tokio::test]
async fn test_startup_report() {
    let journal = EventJournal::new();
    let list = ComponentList::new()
        .add("storage", mock("storage", &[], &journal))
        .add("cache", mock("cache", &["storage"], &journal));
    let system = ComponentSystem::start(list, &RuntimeConfig::default())
        .await
        .expect("startup");

    assert_eq!(
        system.startup_report(),
        "storage [running] depends_on=[] depended_on_by=[cache]\n\
         cache [running] depends_on=[storage] depended_on_by=[]\n"
    );
    system.shutdown().await;
}
