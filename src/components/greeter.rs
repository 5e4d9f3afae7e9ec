//! Greets users by their stored display name.

use super::cache::{self, GreetingCache};
use crate::lifecycle::ComponentContext;
use async_trait::async_trait;
use component_lifecycle::{BoxError, Component};
use std::sync::Arc;
use tracing::info;

pub const NAME: &str = "greeter";

const DEFAULT_GREETING: &str = "Hello";

pub struct Greeter {
    cache: Arc<GreetingCache>,
    greeting: String,
}

impl Greeter {
    pub fn new(cache: Arc<GreetingCache>, greeting: impl Into<String>) -> Self {
        Self {
            cache,
            greeting: greeting.into(),
        }
    }

    /// Unknown users are greeted by id.
    pub fn greet(&self, user_id: &str) -> String {
        let name = self
            .cache
            .lookup(user_id)
            .unwrap_or_else(|| user_id.to_string());
        format!("{}, {name}!", self.greeting)
    }
}

#[async_trait]
impl Component for Greeter {
    async fn on_all_components_loaded(&self) -> Result<(), BoxError> {
        info!(greeting = %self.greeting, "Greeter ready");
        Ok(())
    }
}

pub async fn create(ctx: ComponentContext) -> Result<Greeter, BoxError> {
    let cache = ctx.find_component::<GreetingCache>(cache::NAME).await?;
    let greeting = ctx
        .config()
        .get::<String>("greeting")?
        .unwrap_or_else(|| DEFAULT_GREETING.to_string());
    Ok(Greeter::new(cache, greeting))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::storage::KeyValueStorage;
    use std::collections::HashMap;

    #[test]
    fn test_greet_known_and_unknown_user() {
        let storage = Arc::new(KeyValueStorage::new(HashMap::from([(
            "alice".to_string(),
            "Alice".to_string(),
        )])));
        let greeter = Greeter::new(Arc::new(GreetingCache::new(storage, Vec::new())), "Hi");

        assert_eq!(greeter.greet("alice"), "Hi, Alice!");
        assert_eq!(greeter.greet("bob"), "Hi, bob!");
    }
}
