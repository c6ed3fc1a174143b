use rentora_core::config::{AppConfig, ConfigError, LoadOptions};
use thiserror::Error;
use tracing::info;

use crate::state::AppState;
use rentora_store::StoreError;

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("storage initialization failed: {0}")]
    Storage(#[from] StoreError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        "starting application bootstrap"
    );
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    let state = AppState::new(config.clone());
    state.store.ensure_data_dir()?;
    info!(
        event_name = "system.bootstrap.storage_ready",
        data_dir = %state.store.data_dir().display(),
        "storage directory ready"
    );

    Ok(Application { config, state })
}
