//! Synthetic key presses
//!
//! The keep-awake loop only needs two things from the OS: bind a key, then
//! press it on demand. Both sit behind traits so the loop can be driven by
//! a fake backend in tests.

pub mod enigo_backend;

pub use enigo_backend::EnigoBackend;

use anyhow::Result;

use crate::utils::keycode::KeyCode;

/// Factory for key handles
///
/// Shared between the UI thread and the worker thread, so it must be
/// `Send + Sync`. Handles themselves stay on the thread that bound them.
pub trait InputBackend: Send + Sync {
    fn bind(&self, key: KeyCode) -> Result<Box<dyn KeyHandle>>;
}

/// A key bound to an input connection
pub trait KeyHandle {
    /// Press and release the bound key once
    fn press(&mut self) -> Result<()>;
}
