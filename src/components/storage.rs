//! In-memory key-value storage. Has no dependencies.

use crate::lifecycle::ComponentContext;
use async_trait::async_trait;
use component_lifecycle::{BoxError, Component};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info};

pub const NAME: &str = "storage";

/// Display names keyed by user id, seeded from the `entries` setting:
///
/// ```toml
/// [components.storage.entries]
/// alice = "Alice Liddell"
/// ```
#[derive(Debug, Default)]
pub struct KeyValueStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl KeyValueStorage {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        debug!(key = %key, "Storing entry");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value.into());
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Component for KeyValueStorage {
    async fn on_stop(&self) {
        info!(size = self.len(), "Releasing storage");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

pub async fn create(ctx: ComponentContext) -> Result<KeyValueStorage, BoxError> {
    let entries: HashMap<String, String> = ctx.config().get("entries")?.unwrap_or_default();
    info!(size = entries.len(), "Storage seeded");
    Ok(KeyValueStorage::new(entries))
}
