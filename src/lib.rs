// Library interface for Caffeine
// Shared by the CLI and the tray app, and by the integration tests

pub mod app_state;
pub mod config_file;
pub mod constants;
pub mod hotkeys;
pub mod input;
pub mod keep_awake;
pub mod utils;

use anyhow::{Context, Result};
use app_state::{CaffeineToggle, StatusView};
use config_file::Config;
use input::InputBackend;
use keep_awake::FatalHandler;
use log::info;
use std::sync::Arc;

/// Build the toggle for `config` after checking the injector works
///
/// This is the startup path shared by both binaries: the key must resolve
/// and the backend must be able to bind it, otherwise the caller exits.
pub fn build_toggle<V: StatusView>(
    config: Config,
    backend: Arc<dyn InputBackend>,
    view: V,
    on_fatal: FatalHandler,
) -> Result<CaffeineToggle<V>> {
    let toggle = CaffeineToggle::new(config, backend.clone(), view, on_fatal)?;
    let key = toggle.key();

    // Bind once up front so a broken input system fails startup
    backend
        .bind(key)
        .with_context(|| format!("Failed to bind key {}", key))?;

    info!("Caffeine ready: key {}", key);
    Ok(toggle)
}
