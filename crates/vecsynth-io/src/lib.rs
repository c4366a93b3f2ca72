//! Audio and MIDI I/O for vecsynth.
//!
//! This crate connects the synthesis engine to the outside world:
//!
//! - **MIDI input**: [`MidiDecoder`] turns a raw byte stream into
//!   [`ControlMessage`]s and [`MidiInput`] reads a device node on its own
//!   thread, sending messages over a channel
//! - **Engine**: [`SynthEngine`] owns the voice pool on the audio thread and
//!   applies queued messages at the start of every buffer
//! - **Audio output**: [`OutputStream`] drives a cpal output device
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vecsynth_io::{MidiInput, OutputStream, StreamConfig, SynthEngine};
//!
//! let (tx, rx) = crossbeam_channel::unbounded();
//! let _midi = MidiInput::open("/dev/snd/midiC1D0", tx)?;
//!
//! let mut stream = OutputStream::new(StreamConfig::default())?;
//! let channels = stream.output_channels() as usize;
//! let mut engine = SynthEngine::<24>::new(stream.sample_rate() as f32, rx);
//! stream.run(move |data| {
//!     engine.render(data, channels);
//! })?;
//! ```

mod engine;
mod midi;
mod stream;

pub use engine::{EngineHandle, SynthEngine};
pub use midi::{MidiDecoder, MidiInput, list_midi_devices, midi_devices_in};
pub use stream::{
    AudioDevice, OutputStream, StreamConfig, default_output_device, list_devices,
};
pub use vecsynth_synth::ControlMessage;

use std::path::PathBuf;

/// Error types for audio and MIDI I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// The MIDI device node could not be opened.
    #[error("Cannot open MIDI device '{path}': {source}")]
    MidiDevice {
        /// Device node path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
