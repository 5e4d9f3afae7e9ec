//! Demo binary: starts the sample components, greets a few users and shuts down.
//!
//! Reads its config from the file named by `COMPONENT_RUNTIME_CONFIG`, or uses the
//! defaults when the variable is unset. Ctrl-C during startup aborts it.

use component_lifecycle::tracing::setup_tracing;
use component_runtime::components::{self, greeter, Greeter};
use component_runtime::config::{load_config, RuntimeConfig};
use component_runtime::lifecycle::ComponentSystem;
use std::path::PathBuf;
use tracing::{info, Instrument};

const CONFIG_ENV: &str = "COMPONENT_RUNTIME_CONFIG";

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => load_config(&PathBuf::from(path)).map_err(|e| e.to_string())?,
        None => RuntimeConfig::default(),
    };

    setup_tracing(&config.log_level);
    info!("Starting component runtime");

    let abort = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
        info!("Interrupted");
    };
    let system = ComponentSystem::start_until(components::component_list(), &config, abort)
        .await
        .map_err(|e| e.to_string())?;

    info!(report = %system.startup_report(), "Components running");

    let greeter = system
        .find_component::<Greeter>(greeter::NAME)
        .map_err(|e| e.to_string())?;

    let span = tracing::info_span!("greetings");
    async {
        for user_id in ["alice", "bob"] {
            info!(user_id, "{}", greeter.greet(user_id));
        }
    }
    .instrument(span)
    .await;

    drop(greeter);
    system.shutdown().await;

    info!("Application completed successfully");
    Ok(())
}
