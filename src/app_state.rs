use anyhow::Result;
use log::{debug, info};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::config_file::Config;
use crate::constants::{LABEL_START, LABEL_STOP};
use crate::input::InputBackend;
use crate::keep_awake::{FatalHandler, PeriodicLoop};
use crate::utils::keycode::{self, KeyCode};

/// Whether the keep-awake loop is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    Idle,
    Active,
}

impl ToggleState {
    /// Label of the toggle menu item while in this state
    pub fn menu_label(self) -> &'static str {
        match self {
            ToggleState::Idle => LABEL_START,
            ToggleState::Active => LABEL_STOP,
        }
    }
}

/// Receives state changes so the UI can swap icons and labels
pub trait StatusView {
    fn show_state(&self, state: ToggleState);
}

/// View that only logs, for headless use
pub struct LogView;

impl StatusView for LogView {
    fn show_state(&self, state: ToggleState) {
        info!("Caffeine is now {:?}", state);
    }
}

/// Start/stop state machine around the keep-awake loop
///
/// Every operation takes the internal lock, so callers on different
/// threads (menu, hotkey, signal handler) are serialized. At most one
/// [`PeriodicLoop`] exists at any time: a loop is always fully stopped
/// before the next one is spawned.
pub struct CaffeineToggle<V: StatusView> {
    inner: Mutex<ToggleInner<V>>,
    backend: Arc<dyn InputBackend>,
    on_fatal: FatalHandler,
}

struct ToggleInner<V> {
    config: Config,
    key: KeyCode,
    worker: Option<PeriodicLoop>,
    view: V,
}

impl<V: StatusView> CaffeineToggle<V> {
    /// Create an idle toggle for `config`
    ///
    /// Fails if the configured key is not supported.
    pub fn new(
        config: Config,
        backend: Arc<dyn InputBackend>,
        view: V,
        on_fatal: FatalHandler,
    ) -> Result<Self> {
        let key = keycode::resolve(&config.key)?;
        view.show_state(ToggleState::Idle);

        Ok(Self {
            inner: Mutex::new(ToggleInner {
                config,
                key,
                worker: None,
                view,
            }),
            backend,
            on_fatal,
        })
    }

    pub fn state(&self) -> ToggleState {
        self.inner.lock().state()
    }

    pub fn is_awake(&self) -> bool {
        self.state() == ToggleState::Active
    }

    /// Key the loop presses (or will press once started)
    pub fn key(&self) -> KeyCode {
        self.inner.lock().key
    }

    /// Snapshot of the configuration currently in use
    pub fn config(&self) -> Config {
        self.inner.lock().config.clone()
    }

    /// Flip between Idle and Active, returning the new state
    pub fn toggle(&self) -> Result<ToggleState> {
        let mut inner = self.inner.lock();
        match inner.state() {
            ToggleState::Idle => self.start_locked(&mut inner)?,
            ToggleState::Active => inner.stop(),
        }
        Ok(inner.state())
    }

    /// Start the loop; no-op when already active
    pub fn start(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.worker.is_none() {
            self.start_locked(&mut inner)?;
        }
        Ok(())
    }

    /// Stop the loop and wait for it to exit; no-op when idle
    pub fn stop(&self) {
        self.inner.lock().stop();
    }

    /// Replace the configuration wholesale
    ///
    /// A running loop is restarted so the new key and interval take effect.
    /// A configuration naming an unsupported key is rejected and the
    /// previous configuration stays in place.
    pub fn reload(&self, config: Config) -> Result<()> {
        let key = keycode::resolve(&config.key)?;

        let mut inner = self.inner.lock();
        inner.config = config;
        inner.key = key;
        info!("Configuration replaced: {:?}", inner.config);

        if inner.worker.is_some() {
            debug!("Restarting keep-awake loop with new settings");
            inner.stop();
            self.start_locked(&mut inner)?;
        }
        Ok(())
    }

    /// Stop any running loop before the process exits
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock();
        if inner.worker.is_some() {
            info!("Stopping caffeine before exit");
            inner.stop();
        }
    }

    fn start_locked(&self, inner: &mut ToggleInner<V>) -> Result<()> {
        info!("Starting caffeine");
        let worker = PeriodicLoop::spawn(
            self.backend.clone(),
            inner.key,
            inner.config.interval(),
            self.on_fatal.clone(),
        )?;
        inner.worker = Some(worker);
        inner.view.show_state(ToggleState::Active);
        Ok(())
    }
}

impl<V> ToggleInner<V>
where
    V: StatusView,
{
    fn state(&self) -> ToggleState {
        if self.worker.is_some() {
            ToggleState::Active
        } else {
            ToggleState::Idle
        }
    }

    fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            info!("Stopping caffeine");
            worker.stop();
            self.view.show_state(ToggleState::Idle);
        }
    }
}

impl<V: StatusView> Drop for CaffeineToggle<V> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
