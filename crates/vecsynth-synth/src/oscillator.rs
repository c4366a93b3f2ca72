//! Audio-rate oscillators with anti-aliasing.
//!
//! Phase is kept in radians, `[0, 2π)`. Square and sawtooth outputs are
//! corrected with a 2nd-order PolyBLEP (Polynomial Band-Limited Step) at each
//! discontinuity; sine, triangle and wavetable outputs are continuous and
//! left as is.
//!
//! Two read paths share the phase accumulator:
//!
//! - [`Oscillator::advance`] - band-limited, used for audio
//! - [`Oscillator::advance_naive`] - raw formulas, used for LFOs where the
//!   hard edges of square/saw shapes are the point

use alloc::sync::Arc;
use core::f32::consts::TAU;
use libm::{fabsf, sinf};
use vecsynth_core::wrap;

use crate::wavetable::Wavetable;

/// Oscillator waveform types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Waveform {
    /// Sine waveform, pure fundamental.
    #[default]
    Sine,
    /// Square waveform (50% duty cycle), odd harmonics.
    Square,
    /// Triangle waveform, odd harmonics rolling off at 12 dB/oct.
    Triangle,
    /// Sawtooth waveform, all harmonics.
    Sawtooth,
    /// Single-cycle wavetable supplied with [`Oscillator::set_wavetable`].
    Custom,
}

/// Audio-rate oscillator with PolyBLEP anti-aliasing.
///
/// A frequency of 0 Hz silences the oscillator: it yields exact zeros and
/// the phase does not move.
///
/// # Example
///
/// ```rust
/// use vecsynth_synth::{Oscillator, Waveform};
///
/// let mut osc = Oscillator::new(48000.0);
/// osc.set_waveform(Waveform::Sawtooth);
/// osc.set_frequency(220.0);
///
/// let sample = osc.advance();
/// assert!(sample.abs() <= 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    /// Current phase [0, 2π)
    phase: f32,
    /// Phase increment per sample in radians
    phase_inc: f32,
    sample_rate: f32,
    frequency: f32,
    amplitude: f32,
    waveform: Waveform,
    wavetable: Option<Arc<Wavetable>>,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Oscillator {
    /// Create a silent sine oscillator (0 Hz, amplitude 1).
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: 0.0,
            sample_rate,
            frequency: 0.0,
            amplitude: 1.0,
            waveform: Waveform::Sine,
            wavetable: None,
        }
    }

    /// Builder: set the waveform.
    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    /// Builder: set the amplitude.
    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Set frequency in Hz. Negative values clamp to 0.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = freq_hz.max(0.0);
        self.phase_inc = TAU * self.frequency / self.sample_rate;
    }

    /// Get current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Set output amplitude.
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    /// Get output amplitude.
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Set waveform type.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Get current waveform.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Attach the table read by [`Waveform::Custom`]. Without one the
    /// custom waveform is silent.
    pub fn set_wavetable(&mut self, table: Arc<Wavetable>) {
        self.wavetable = Some(table);
    }

    /// Currently attached wavetable.
    pub fn wavetable(&self) -> Option<&Arc<Wavetable>> {
        self.wavetable.as_ref()
    }

    /// Set sample rate and recalculate phase increment.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.set_frequency(self.frequency);
    }

    /// Get current sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Set phase in radians, wrapped into [0, 2π).
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = wrap(phase, TAU);
    }

    /// Get current phase in radians.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Phase increment per sample in radians.
    pub fn phase_increment(&self) -> f32 {
        self.phase_inc
    }

    /// Zero frequency and phase. Waveform, amplitude and table are kept.
    pub fn reset(&mut self) {
        self.frequency = 0.0;
        self.phase_inc = 0.0;
        self.phase = 0.0;
    }

    /// Generate the next band-limited sample.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.frequency == 0.0 {
            return 0.0;
        }
        let output = self.naive_sample() + self.blep_correction();
        self.advance_phase();
        output
    }

    /// Generate the next sample without anti-aliasing.
    #[inline]
    pub fn advance_naive(&mut self) -> f32 {
        if self.frequency == 0.0 {
            return 0.0;
        }
        let output = self.naive_sample();
        self.advance_phase();
        output
    }

    #[inline]
    fn advance_phase(&mut self) {
        self.phase += self.phase_inc;
        if self.phase >= TAU {
            self.phase = wrap(self.phase, TAU);
        }
    }

    #[inline]
    fn naive_sample(&self) -> f32 {
        let t = self.phase / TAU;
        let raw = match self.waveform {
            Waveform::Sine => sinf(self.phase),
            // Edge decided on t so it agrees with the PolyBLEP windows
            Waveform::Square => {
                if t < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 2.0 * (fabsf(2.0 * t - 1.0) - 0.5),
            Waveform::Sawtooth => 2.0 * t - 1.0,
            Waveform::Custom => self.wavetable.as_ref().map_or(0.0, |table| table.read(t)),
        };
        raw * self.amplitude
    }

    #[inline]
    fn blep_correction(&self) -> f32 {
        let t = self.phase / TAU;
        let dt = self.phase_inc / TAU;
        let correction = match self.waveform {
            Waveform::Sawtooth => -poly_blep(t, dt),
            // Rising edge at t = 0, falling edge at t = 0.5
            Waveform::Square => poly_blep(t, dt) - poly_blep(wrap(t + 0.5, 1.0), dt),
            Waveform::Sine | Waveform::Triangle | Waveform::Custom => return 0.0,
        };
        correction * self.amplitude
    }
}

/// 2nd-order PolyBLEP (Polynomial Band-Limited Step) residual.
///
/// Replaces the unit step at a discontinuity with a quadratic blended over
/// one sample on each side. The residual lies in `[-1, 0]` just after the
/// step and `[0, 1]` just before it.
///
/// # Arguments
/// * `t` - Phase position in [0.0, 1.0)
/// * `dt` - Phase increment per sample as a fraction of a period
///
/// Reference: Välimäki & Huovilainen, "Antialiasing Oscillators in
/// Subtractive Synthesis", IEEE Signal Processing Magazine, 2007.
#[inline]
pub fn poly_blep(t: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    if t < dt {
        let t = t / dt;
        2.0 * t - t * t - 1.0
    } else if t > 1.0 - dt {
        let t = (t - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}
