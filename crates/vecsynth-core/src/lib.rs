//! VecSynth Core - filter primitives for the vector synthesizer
//!
//! This crate provides the recursive filtering building blocks of the
//! synthesis engine, designed for real-time audio with zero allocation in
//! the audio path.
//!
//! # Filters
//!
//! - [`OnePoleStage`] - Zero-delay-feedback trapezoidal one-pole lowpass
//! - [`LadderFilter`] - Four-pole resonant ladder with six response types
//! - [`LadderMode`] - Closed set of ladder responses with their mix table
//!
//! # Utilities
//!
//! - [`flush_denormal`], [`lerp`], [`wrap`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! vecsynth-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use vecsynth_core::{LadderFilter, LadderMode};
//!
//! let mut filter = LadderFilter::new(48000.0);
//! filter.set_mode(LadderMode::Hp2);
//! filter.set_cutoff(2000.0);
//!
//! let mut buffer = [0.5f32; 64];
//! filter.process_block_inplace(&mut buffer);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod ladder;
pub mod math;
pub mod one_pole;

pub use ladder::{
    DEFAULT_CUTOFF, DEFAULT_RESONANCE, LadderFilter, LadderMode, MAX_CUTOFF_RATIO, MAX_RESONANCE,
    MIN_CUTOFF,
};
pub use math::{flush_denormal, lerp, wrap};
pub use one_pole::OnePoleStage;
