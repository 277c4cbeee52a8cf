//! Centralized constants for the Caffeine application
//!
//! Defaults, file locations and user-visible strings live here so the
//! CLI and the tray app stay in agreement.

// ============================================================================
// CONFIGURATION DEFAULTS
// ============================================================================

/// Key pressed when the config file does not name one.
/// F15 exists on almost no physical keyboard, so pressing it is invisible
/// to whatever application has focus.
pub const DEFAULT_KEY: &str = "F15";

/// Default interval between two key presses.
/// Unit: seconds
/// Recommended range: 30-290 (must stay below the OS idle timeout)
pub const DEFAULT_INTERVAL_SECONDS: u64 = 290;

/// Whether the tray app starts the keep-awake loop on launch.
pub const DEFAULT_AUTOSTART: bool = true;

// ============================================================================
// FILE LOCATIONS
// ============================================================================

/// Directory created under the per-user config directory.
pub const APP_DIR_NAME: &str = "caffeine";

/// Config file name inside APP_DIR_NAME.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Log file name inside APP_DIR_NAME (tray app only).
pub const LOG_FILE_NAME: &str = "caffeine.log";

// ============================================================================
// TRAY APPEARANCE
// ============================================================================

pub const TRAY_TITLE: &str = "caffeine";
pub const TRAY_TOOLTIP: &str = "Caffeine keeps your system awake";

pub const LABEL_START: &str = "Start Caffeine ☕";
pub const LABEL_STOP: &str = "Stop Caffeine 🛑";
pub const LABEL_RELOAD: &str = "Reload config ♻️";
pub const LABEL_QUIT: &str = "Quit 🏃";

// ============================================================================
// NOTIFICATION TIMEOUTS
// ============================================================================

/// Error notification display duration.
/// Unit: milliseconds
pub const NOTIFICATION_ERROR_TIMEOUT_MS: u32 = 5000;
