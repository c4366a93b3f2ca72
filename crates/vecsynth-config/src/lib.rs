//! Runtime settings for the vecsynth player.
//!
//! Settings cover the outer surfaces only: which audio device to open, at
//! what sample rate and buffer size, and which MIDI device node to read.
//! Synthesis parameters are never persisted; the instrument always starts
//! from its defaults and is shaped live from the controller.
//!
//! # Example
//!
//! ```rust,no_run
//! use vecsynth_config::{Overrides, Settings, paths};
//!
//! let mut settings = Settings::load_or_default(paths::settings_path()).unwrap();
//! settings
//!     .apply(Overrides {
//!         sample_rate: Some(44100),
//!         ..Overrides::default()
//!     })
//!     .unwrap();
//! println!("{} Hz", settings.audio.sample_rate);
//! ```

mod error;
mod settings;

/// Platform-specific settings location.
pub mod paths;

pub use error::ConfigError;
pub use paths::{settings_path, user_config_dir};
pub use settings::{
    AudioSettings, BUFFER_SIZE_RANGE, DEFAULT_BUFFER_SIZE, DEFAULT_SAMPLE_RATE, MidiSettings,
    Overrides, SAMPLE_RATE_RANGE, Settings,
};
