//! # Mock Component
//!
//! A [`Component`] that counts every hook invocation and can be told to fail specific
//! hooks. Use it to test cells and orchestrators without real services.
//!
//! ```rust
//! use component_lifecycle::mock::{EventJournal, MockComponent};
//! use component_lifecycle::ComponentCell;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let journal = EventJournal::new();
//!     let cell = ComponentCell::new("cache");
//!     cell.set_component(Arc::new(MockComponent::named("cache").with_journal(journal.clone())));
//!
//!     cell.on_all_components_loaded().await.unwrap();
//!     cell.clear_component().await;
//!
//!     assert_eq!(journal.events(), vec!["loaded:cache", "stop:cache"]);
//! }
//! ```

use crate::component::Component;
use crate::error::BoxError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Shared, ordered record of hook invocations across several mock components.
#[derive(Clone, Debug, Default)]
pub struct EventJournal {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: impl Into<String>) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Position of `event` in the journal, if recorded.
    pub fn position(&self, event: &str) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }
}

/// Hook-counting test component.
#[derive(Debug, Default)]
pub struct MockComponent {
    name: String,
    journal: Option<EventJournal>,
    loaded_error: Option<String>,
    stopping_error: Option<String>,
    loading_cancelled: AtomicUsize,
    loaded: AtomicUsize,
    stopping: AtomicUsize,
    stopped: AtomicUsize,
}

impl MockComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose journal entries are suffixed with `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_journal(mut self, journal: EventJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Makes `on_all_components_loaded` fail with `message`.
    pub fn fail_on_loaded(mut self, message: impl Into<String>) -> Self {
        self.loaded_error = Some(message.into());
        self
    }

    /// Makes `on_all_components_are_stopping` fail with `message`.
    pub fn fail_on_stopping(mut self, message: impl Into<String>) -> Self {
        self.stopping_error = Some(message.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn loading_cancelled_calls(&self) -> usize {
        self.loading_cancelled.load(Ordering::SeqCst)
    }

    pub fn loaded_calls(&self) -> usize {
        self.loaded.load(Ordering::SeqCst)
    }

    pub fn stopping_calls(&self) -> usize {
        self.stopping.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> usize {
        self.stopped.load(Ordering::SeqCst)
    }

    fn record(&self, hook: &str) {
        if let Some(journal) = &self.journal {
            journal.record(format!("{hook}:{}", self.name));
        }
    }
}

#[async_trait]
impl Component for MockComponent {
    fn on_loading_cancelled(&self) {
        self.loading_cancelled.fetch_add(1, Ordering::SeqCst);
        self.record("cancelled");
    }

    async fn on_all_components_loaded(&self) -> Result<(), BoxError> {
        self.loaded.fetch_add(1, Ordering::SeqCst);
        self.record("loaded");
        match &self.loaded_error {
            Some(message) => Err(message.clone().into()),
            None => Ok(()),
        }
    }

    async fn on_all_components_are_stopping(&self) -> Result<(), BoxError> {
        self.stopping.fetch_add(1, Ordering::SeqCst);
        self.record("stopping");
        match &self.stopping_error {
            Some(message) => Err(message.clone().into()),
            None => Ok(()),
        }
    }

    async fn on_stop(&self) {
        self.stopped.fetch_add(1, Ordering::SeqCst);
        self.record("stop");
    }
}
