//! Read-through cache in front of [`KeyValueStorage`].

use super::storage::{self, KeyValueStorage};
use crate::lifecycle::ComponentContext;
use async_trait::async_trait;
use component_lifecycle::{BoxError, Component};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

pub const NAME: &str = "cache";

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Warm-up key {0} not found in storage")]
    MissingWarmKey(String),
}

/// Caches storage lookups. Keys listed in the `warm_keys` setting are loaded once every
/// component is up, and a missing warm key fails startup.
pub struct GreetingCache {
    storage: Arc<KeyValueStorage>,
    warm_keys: Vec<String>,
    cached: Mutex<HashMap<String, String>>,
    loading_cancelled: AtomicBool,
}

impl GreetingCache {
    pub fn new(storage: Arc<KeyValueStorage>, warm_keys: Vec<String>) -> Self {
        Self {
            storage,
            warm_keys,
            cached: Mutex::new(HashMap::new()),
            loading_cancelled: AtomicBool::new(false),
        }
    }

    pub fn lookup(&self, key: &str) -> Option<String> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = cached.get(key) {
            return Some(value.clone());
        }
        let value = self.storage.get(key)?;
        debug!(key = %key, "Cache miss");
        cached.insert(key.to_string(), value.clone());
        Some(value)
    }

    pub fn cached_len(&self) -> usize {
        self.cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_loading_cancelled(&self) -> bool {
        self.loading_cancelled.load(Ordering::Acquire)
    }
}

#[async_trait]
impl Component for GreetingCache {
    fn on_loading_cancelled(&self) {
        warn!("Cache warm-up cancelled");
        self.loading_cancelled.store(true, Ordering::Release);
    }

    async fn on_all_components_loaded(&self) -> Result<(), BoxError> {
        for key in &self.warm_keys {
            if self.lookup(key).is_none() {
                return Err(CacheError::MissingWarmKey(key.clone()).into());
            }
        }
        info!(size = self.cached_len(), "Cache warmed up");
        Ok(())
    }

    async fn on_all_components_are_stopping(&self) -> Result<(), BoxError> {
        self.cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        debug!("Cache flushed");
        Ok(())
    }
}

pub async fn create(ctx: ComponentContext) -> Result<GreetingCache, BoxError> {
    let storage = ctx.find_component::<KeyValueStorage>(storage::NAME).await?;
    let warm_keys: Vec<String> = ctx.config().get("warm_keys")?.unwrap_or_default();
    Ok(GreetingCache::new(storage, warm_keys))
}
