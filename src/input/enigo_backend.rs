use anyhow::{anyhow, Result};
use enigo::{Direction, Enigo, Keyboard, Settings};
use log::debug;

use super::{InputBackend, KeyHandle};
use crate::utils::keycode::KeyCode;

/// Backend that injects key events through enigo
#[derive(Debug, Default)]
pub struct EnigoBackend;

impl EnigoBackend {
    pub fn new() -> Self {
        Self
    }
}

impl InputBackend for EnigoBackend {
    fn bind(&self, key: KeyCode) -> Result<Box<dyn KeyHandle>> {
        // One connection per handle; Enigo is not shared across threads
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| anyhow!("Failed to connect to input system: {}", e))?;
        debug!("Bound key {}", key);
        Ok(Box::new(EnigoKey { enigo, key }))
    }
}

struct EnigoKey {
    enigo: Enigo,
    key: KeyCode,
}

impl KeyHandle for EnigoKey {
    fn press(&mut self) -> Result<()> {
        self.enigo
            .key(self.key.key(), Direction::Click)
            .map_err(|e| anyhow!("Failed to press {}: {}", self.key, e))
    }
}
