//! Single-cycle wavetables for the custom oscillator waveform.
//!
//! A table holds one period of an arbitrary waveform. It is read by phase
//! fraction with linear interpolation between adjacent entries. The table is
//! stored with one guard sample (a copy of entry 0) appended so the
//! interpolation never needs to wrap its second index.
//!
//! Table contents are an asset supplied by the host. Until one is supplied
//! the voices use [`Wavetable::sine`].

use alloc::vec::Vec;
use core::fmt;
use core::f32::consts::TAU;
use libm::sinf;
use vecsynth_core::lerp;

/// Default table length used by [`Wavetable::default`].
pub const DEFAULT_TABLE_SIZE: usize = 2048;

/// Smallest accepted table length.
pub const MIN_TABLE_SIZE: usize = 2;

/// Error building a [`Wavetable`] from supplied samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavetableError {
    /// Fewer than [`MIN_TABLE_SIZE`] samples were supplied.
    TooShort(usize),
    /// The sample at this index is NaN or infinite.
    NonFinite(usize),
}

impl fmt::Display for WavetableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WavetableError::TooShort(len) => write!(
                f,
                "wavetable needs at least {MIN_TABLE_SIZE} samples, got {len}"
            ),
            WavetableError::NonFinite(index) => {
                write!(f, "wavetable sample {index} is not finite")
            }
        }
    }
}

impl core::error::Error for WavetableError {}

/// One period of a waveform, read by phase with linear interpolation.
#[derive(Clone, PartialEq)]
pub struct Wavetable {
    // len() + 1 entries, last is a copy of the first
    samples: Vec<f32>,
}

impl fmt::Debug for Wavetable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wavetable").field("len", &self.len()).finish()
    }
}

impl Default for Wavetable {
    fn default() -> Self {
        Self::sine(DEFAULT_TABLE_SIZE)
    }
}

impl Wavetable {
    /// Build a table from one period of samples.
    ///
    /// The slice covers phase `[0, 2π)`; the first sample is at phase 0.
    pub fn from_samples(samples: &[f32]) -> Result<Self, WavetableError> {
        if samples.len() < MIN_TABLE_SIZE {
            return Err(WavetableError::TooShort(samples.len()));
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(WavetableError::NonFinite(index));
        }

        let mut table = Vec::with_capacity(samples.len() + 1);
        table.extend_from_slice(samples);
        table.push(samples[0]);
        Ok(Self { samples: table })
    }

    /// A sine table of `len` entries (at least [`MIN_TABLE_SIZE`]).
    pub fn sine(len: usize) -> Self {
        let len = len.max(MIN_TABLE_SIZE);
        let mut table: Vec<f32> = (0..len)
            .map(|i| sinf(TAU * i as f32 / len as f32))
            .collect();
        table.push(table[0]);
        Self { samples: table }
    }

    /// Number of samples in one period (excluding the guard sample).
    pub fn len(&self) -> usize {
        self.samples.len() - 1
    }

    /// Always false; a table holds at least [`MIN_TABLE_SIZE`] samples.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The period samples, without the guard sample.
    pub fn samples(&self) -> &[f32] {
        &self.samples[..self.len()]
    }

    /// Read the table at `fraction` of a period, `fraction` in `[0, 1)`.
    #[inline]
    pub fn read(&self, fraction: f32) -> f32 {
        let len = self.len();
        let position = fraction * len as f32;
        let index = (position as usize).min(len - 1);
        let frac = position - index as f32;
        lerp(self.samples[index], self.samples[index + 1], frac)
    }
}
