//! VecSynth Synth - the vector synthesis engine
//!
//! This crate turns control messages into audio: oscillators, envelopes and
//! the per-note [`Voice`] are pooled by a [`VoiceManager`] that mixes them
//! and applies global modulation.
//!
//! # Core Components
//!
//! ## Oscillators
//!
//! - [`Oscillator`] - Audio-rate oscillator with PolyBLEP anti-aliasing
//! - [`Waveform`] - Sine, Square, Triangle, Sawtooth, Custom
//! - [`Wavetable`] - Single-cycle table read by the custom waveform
//!
//! ```rust
//! use vecsynth_synth::{Oscillator, Waveform};
//!
//! let mut osc = Oscillator::new(48000.0).with_waveform(Waveform::Sawtooth);
//! osc.set_frequency(440.0);
//! let sample = osc.advance();
//! ```
//!
//! ## Envelopes
//!
//! - [`EnvelopeGenerator`] - Exponential ADSR with a floor level
//! - [`EnvelopeStage`] - Off, Attack, Decay, Sustain, Release
//!
//! ## Voices
//!
//! - [`Voice`] - Four oscillators, two envelopes and a ladder filter
//! - [`WaveMix`] - The α/β/γ vector-mix weights
//! - [`VoiceManager`] - First-fit voice pool, tremolo and cutoff LFOs
//!
//! ## Control
//!
//! - [`ControlMessage`] - Raw `(status, data1, data2)` triple
//! - [`Command`] - A message resolved through the controller map
//! - [`key_to_freq`] - 88-key frequency table lookup
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc` for shared
//! wavetables). Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! vecsynth-synth = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use vecsynth_synth::{ControlMessage, VectorSynth};
//!
//! let mut synth = VectorSynth::new(48000.0);
//!
//! // C major triad
//! synth.handle_message(ControlMessage::note_on(48, 100));
//! synth.handle_message(ControlMessage::note_on(52, 100));
//! synth.handle_message(ControlMessage::note_on(55, 100));
//!
//! let mut buffer = vec![0.0; 1024];
//! synth.render(&mut buffer);
//!
//! synth.handle_message(ControlMessage::note_off(48));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod control;
pub mod envelope;
pub mod keyboard;
pub mod manager;
pub mod oscillator;
pub mod voice;
pub mod wavetable;

pub use control::{Command, ControlMessage, EnvelopeParam, EnvelopeTarget};
pub use envelope::{EnvelopeGenerator, EnvelopeStage};
pub use keyboard::{HIGHEST_KEY, KEY_COUNT, KEY_FREQUENCIES, LOWEST_KEY, key_to_freq};
pub use manager::{DEFAULT_POLYPHONY, DEFAULT_SAMPLE_RATE, VectorSynth, VoiceManager};
pub use oscillator::{Oscillator, Waveform, poly_blep};
pub use voice::{Voice, WaveMix};
pub use wavetable::{Wavetable, WavetableError};

// Re-export the filter types voices are configured with
pub use vecsynth_core::{LadderFilter, LadderMode};
