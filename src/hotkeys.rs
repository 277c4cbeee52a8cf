use anyhow::{Context, Result};
use global_hotkey::{hotkey::HotKey, GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use log::info;

/// Owns the optional global hotkey that toggles caffeine
pub struct HotkeyManager {
    manager: GlobalHotKeyManager,
    toggle_hotkey: Option<HotKey>,
}

impl HotkeyManager {
    pub fn new() -> Result<Self> {
        let manager =
            GlobalHotKeyManager::new().context("Failed to create global hotkey manager")?;

        Ok(Self {
            manager,
            toggle_hotkey: None,
        })
    }

    /// Register `accelerator` (e.g. "ctrl+alt+shift+KeyC") as the toggle
    /// hotkey, replacing any previous one. `None` just clears it.
    pub fn set_toggle_hotkey(&mut self, accelerator: Option<&str>) -> Result<()> {
        let hotkey = accelerator.map(parse_hotkey).transpose()?;
        if hotkey == self.toggle_hotkey {
            return Ok(());
        }

        self.unregister_all()?;

        if let Some(hotkey) = hotkey {
            self.manager
                .register(hotkey)
                .context("Failed to register toggle hotkey")?;
            self.toggle_hotkey = Some(hotkey);
            info!("Toggle hotkey registered: {}", accelerator.unwrap_or_default());
        }
        Ok(())
    }

    /// Check if a hotkey event is a press of the toggle hotkey
    pub fn is_toggle_press(&self, event: &GlobalHotKeyEvent) -> bool {
        event.state == HotKeyState::Pressed
            && self.toggle_hotkey.is_some_and(|hk| hk.id() == event.id)
    }

    pub fn unregister_all(&mut self) -> Result<()> {
        if let Some(hotkey) = self.toggle_hotkey.take() {
            self.manager.unregister(hotkey)?;
        }
        Ok(())
    }
}

/// Parse an accelerator string into a hotkey
pub fn parse_hotkey(accelerator: &str) -> Result<HotKey> {
    accelerator
        .parse::<HotKey>()
        .with_context(|| format!("Invalid hotkey: '{}'", accelerator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hotkey() {
        assert!(parse_hotkey("ctrl+alt+shift+KeyC").is_ok());
        assert!(parse_hotkey("shift+F15").is_ok());
        assert!(parse_hotkey("not a hotkey").is_err());
    }

    #[test]
    fn test_same_accelerator_same_id() {
        let a = parse_hotkey("ctrl+shift+KeyC").unwrap();
        let b = parse_hotkey("ctrl+shift+KeyC").unwrap();
        assert_eq!(a.id(), b.id());
    }
}
