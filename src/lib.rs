pub mod appointments; // booking repository + lifecycle
pub mod booking; // slot validation
pub mod catalog; // service/pet pass-through CRUD
pub mod config;
pub mod error;
pub mod models;
pub mod store; // entity collections + id sequence

use tracing_subscriber::EnvFilter;

/// Initialize tracing for embedders that do not install their own
/// subscriber. Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    }
}
