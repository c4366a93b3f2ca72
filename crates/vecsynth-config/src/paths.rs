//! Platform-specific location of the settings file.
//!
//! - Linux: `~/.config/vecsynth/settings.toml`
//! - macOS: `~/Library/Application Support/vecsynth/settings.toml`
//! - Windows: `%APPDATA%\vecsynth\settings.toml`

use std::path::PathBuf;

/// Application name used for directory paths.
const APP_NAME: &str = "vecsynth";

/// File name of the settings file inside the config directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the default settings file path.
pub fn settings_path() -> PathBuf {
    user_config_dir().join(SETTINGS_FILE)
}
