//! Player settings stored as TOML.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Default output sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;

/// Default output buffer size in frames.
pub const DEFAULT_BUFFER_SIZE: u32 = 256;

/// Accepted sample-rate range in Hz.
pub const SAMPLE_RATE_RANGE: std::ops::RangeInclusive<u32> = 8000..=192_000;

/// Accepted buffer-size range in frames.
pub const BUFFER_SIZE_RANGE: std::ops::RangeInclusive<u32> = 16..=8192;

/// Complete player settings.
///
/// Every field has a default, so a partial file (or none at all) is valid:
///
/// ```toml
/// [audio]
/// sample_rate = 44100
/// output_device = "USB Audio"
///
/// [midi]
/// device = "/dev/snd/midiC1D0"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Audio output settings.
    pub audio: AudioSettings,
    /// MIDI input settings.
    pub midi: MidiSettings,
}

/// The `[audio]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Output buffer size in frames.
    pub buffer_size: u32,
    /// Output device: index, exact name, or partial name. `None` uses the
    /// system default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_device: Option<String>,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            buffer_size: DEFAULT_BUFFER_SIZE,
            output_device: None,
        }
    }
}

/// The `[midi]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MidiSettings {
    /// Raw MIDI device node to read from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<PathBuf>,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Replaces `audio.sample_rate`.
    pub sample_rate: Option<u32>,
    /// Replaces `audio.buffer_size`.
    pub buffer_size: Option<u32>,
    /// Replaces `audio.output_device`.
    pub output_device: Option<String>,
    /// Replaces `midi.device`.
    pub midi_device: Option<PathBuf>,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load settings from a TOML file, or defaults if it does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(toml_str)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save the settings to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the settings to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every value is usable by the player.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SAMPLE_RATE_RANGE.contains(&self.audio.sample_rate) {
            return Err(ConfigError::invalid(
                "audio.sample_rate",
                format!(
                    "{} Hz is outside {}..={} Hz",
                    self.audio.sample_rate,
                    SAMPLE_RATE_RANGE.start(),
                    SAMPLE_RATE_RANGE.end()
                ),
            ));
        }
        if !BUFFER_SIZE_RANGE.contains(&self.audio.buffer_size) {
            return Err(ConfigError::invalid(
                "audio.buffer_size",
                format!(
                    "{} frames is outside {}..={}",
                    self.audio.buffer_size,
                    BUFFER_SIZE_RANGE.start(),
                    BUFFER_SIZE_RANGE.end()
                ),
            ));
        }
        if self
            .audio
            .output_device
            .as_deref()
            .is_some_and(|d| d.trim().is_empty())
        {
            return Err(ConfigError::invalid("audio.output_device", "empty device name"));
        }
        if self
            .midi
            .device
            .as_deref()
            .is_some_and(|d| d.as_os_str().is_empty())
        {
            return Err(ConfigError::invalid("midi.device", "empty device path"));
        }
        Ok(())
    }

    /// Apply command-line overrides and re-validate.
    pub fn apply(&mut self, overrides: Overrides) -> Result<(), ConfigError> {
        if let Some(rate) = overrides.sample_rate {
            self.audio.sample_rate = rate;
        }
        if let Some(size) = overrides.buffer_size {
            self.audio.buffer_size = size;
        }
        if overrides.output_device.is_some() {
            self.audio.output_device = overrides.output_device;
        }
        if overrides.midi_device.is_some() {
            self.midi.device = overrides.midi_device;
        }
        self.validate()
    }
}
