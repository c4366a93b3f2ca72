//! Four-pole resonant ladder filter.
//!
//! Four [`OnePoleStage`]s in series with global feedback, a `tanh` input
//! saturator, and a five-tap output mixer that turns the same cascade into
//! six response types.
//!
//! # Topology
//!
//! ```text
//!            ┌──────────── K · Σ βᵢ·zᵢ ◄──────────────────┐
//!            ▼                                             │
//! x·(1+K) ─(−)─ ×α₀ ─ tanh ─┬─ LP1 ─┬─ LP2 ─┬─ LP3 ─┬─ LP4 ─┤
//!                           │       │       │       │       │
//!                           A       B       C       D       E   → Σ → y
//! ```
//!
//! With `g = tan(π·Fc/fs)` and `G = g/(1+g)` every stage gets `α = G`; the
//! feedback taps are weighted back-to-front (`β₄ = 1/(1+g)`, `βᵢ = G·βᵢ₊₁`)
//! so that the zero-delay loop resolves to `α₀ = 1/(1 + K·G⁴)`.
//!
//! # Coefficient updates
//!
//! Changing cutoff or sample rate recomputes every coefficient. Changing
//! resonance only recomputes `α₀`; the stage coefficients do not depend on K.
//!
//! # Reference
//!
//! Will Pirkle, "Designing Software Synthesizer Plug-Ins in C++", ch. 7.
//! Vadim Zavalishin, "The Art of VA Filter Design", ch. 5 (ladder filter).

use core::f32::consts::PI;
use libm::{tanf, tanhf};

use crate::one_pole::OnePoleStage;

/// Lowest accepted cutoff in Hz.
pub const MIN_CUTOFF: f32 = 1.0;

/// Highest accepted cutoff as a fraction of the sample rate.
pub const MAX_CUTOFF_RATIO: f32 = 0.45;

/// Highest accepted resonance. K = 4 is the self-oscillation threshold.
pub const MAX_RESONANCE: f32 = 4.0;

/// Default cutoff in Hz.
pub const DEFAULT_CUTOFF: f32 = 10000.0;

/// Default resonance.
pub const DEFAULT_RESONANCE: f32 = 1.0;

/// Response type of the ladder's output mixer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LadderMode {
    /// 24 dB/oct lowpass.
    #[default]
    Lp4,
    /// 12 dB/oct lowpass.
    Lp2,
    /// 24 dB/oct bandpass.
    Bp4,
    /// 12 dB/oct bandpass.
    Bp2,
    /// 24 dB/oct highpass.
    Hp4,
    /// 12 dB/oct highpass.
    Hp2,
}

impl LadderMode {
    /// Every mode, in declaration order.
    pub const ALL: [LadderMode; 6] = [
        LadderMode::Lp4,
        LadderMode::Lp2,
        LadderMode::Bp4,
        LadderMode::Bp2,
        LadderMode::Hp4,
        LadderMode::Hp2,
    ];

    /// Output mix weights `[A, B, C, D, E]` applied to
    /// `[u, lp1, lp2, lp3, lp4]`.
    pub const fn coefficients(self) -> [f32; 5] {
        match self {
            LadderMode::Lp4 => [0.0, 0.0, 0.0, 0.0, 1.0],
            LadderMode::Lp2 => [0.0, 0.0, 1.0, 0.0, 0.0],
            LadderMode::Bp4 => [0.0, 0.0, 4.0, -8.0, 4.0],
            LadderMode::Bp2 => [0.0, 2.0, -2.0, 0.0, 0.0],
            LadderMode::Hp4 => [1.0, -4.0, 6.0, -4.0, 1.0],
            LadderMode::Hp2 => [1.0, -2.0, 1.0, 0.0, 0.0],
        }
    }

    /// Short display name.
    pub const fn name(self) -> &'static str {
        match self {
            LadderMode::Lp4 => "LP4",
            LadderMode::Lp2 => "LP2",
            LadderMode::Bp4 => "BP4",
            LadderMode::Bp2 => "BP2",
            LadderMode::Hp4 => "HP4",
            LadderMode::Hp2 => "HP2",
        }
    }
}

/// Multi-mode resonant ladder filter.
///
/// ## Parameters
///
/// - `cutoff`: Hz, clamped to `[MIN_CUTOFF, sample_rate × MAX_CUTOFF_RATIO]` (default 10 kHz)
/// - `resonance`: feedback gain K, clamped to `[0, MAX_RESONANCE]` (default 1.0)
/// - `mode`: output response (default [`LadderMode::Lp4`])
///
/// # Example
///
/// ```rust
/// use vecsynth_core::{LadderFilter, LadderMode};
///
/// let mut filter = LadderFilter::new(48000.0);
/// filter.set_cutoff(800.0);
/// filter.set_resonance(2.5);
/// filter.set_mode(LadderMode::Bp2);
///
/// let out = filter.process(0.25);
/// assert!(out.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct LadderFilter {
    stages: [OnePoleStage; 4],

    // Coefficients
    gamma: f32,
    alpha0: f32,
    mix: [f32; 5],

    // Parameters
    sample_rate: f32,
    cutoff: f32,
    resonance: f32,
    mode: LadderMode,
}

impl Default for LadderFilter {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl LadderFilter {
    /// Create a filter at the given sample rate with default parameters.
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            stages: [
                OnePoleStage::new(),
                OnePoleStage::new(),
                OnePoleStage::new(),
                OnePoleStage::new(),
            ],
            gamma: 0.0,
            alpha0: 1.0,
            mix: LadderMode::Lp4.coefficients(),
            sample_rate,
            cutoff: DEFAULT_CUTOFF,
            resonance: DEFAULT_RESONANCE,
            mode: LadderMode::Lp4,
        };
        filter.update_coefficients();
        filter
    }

    /// Set the cutoff frequency in Hz and recompute all coefficients.
    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff = cutoff.clamp(MIN_CUTOFF, self.sample_rate * MAX_CUTOFF_RATIO);
        self.update_coefficients();
    }

    /// Get the cutoff frequency in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Set the resonance K. Only the loop normalisation is recomputed.
    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance.clamp(0.0, MAX_RESONANCE);
        self.update_alpha0();
    }

    /// Get the resonance K.
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Select the output response.
    pub fn set_mode(&mut self, mode: LadderMode) {
        self.mode = mode;
        self.mix = mode.coefficients();
    }

    /// Get the output response.
    pub fn mode(&self) -> LadderMode {
        self.mode
    }

    /// Update the sample rate and recompute all coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.set_cutoff(self.cutoff);
    }

    /// Get the sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Loop gain `G⁴`.
    pub fn loop_gain(&self) -> f32 {
        self.gamma
    }

    /// Feedback normalisation `1 / (1 + K·G⁴)`.
    pub fn input_gain(&self) -> f32 {
        self.alpha0
    }

    /// The four cascaded stages, input side first.
    pub fn stages(&self) -> &[OnePoleStage; 4] {
        &self.stages
    }

    /// Clear all four stage memories.
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let sigma: f32 = self.stages.iter().map(OnePoleStage::feedback_output).sum();

        // Passband gain compensation
        let x = input * (1.0 + self.resonance);
        let u = tanhf((x - self.resonance * sigma) * self.alpha0);

        let lp1 = self.stages[0].process(u);
        let lp2 = self.stages[1].process(lp1);
        let lp3 = self.stages[2].process(lp2);
        let lp4 = self.stages[3].process(lp3);

        let [a, b, c, d, e] = self.mix;
        a * u + b * lp1 + c * lp2 + d * lp3 + e * lp4
    }

    /// Filter a buffer in place.
    pub fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    fn update_coefficients(&mut self) {
        let g = tanf(PI * self.cutoff / self.sample_rate);
        let big_g = g / (1.0 + g);

        let beta4 = 1.0 / (1.0 + g);
        let beta3 = big_g * beta4;
        let beta2 = big_g * beta3;
        let beta1 = big_g * beta2;

        self.stages[0].set_coefficients(big_g, beta1);
        self.stages[1].set_coefficients(big_g, beta2);
        self.stages[2].set_coefficients(big_g, beta3);
        self.stages[3].set_coefficients(big_g, beta4);

        self.gamma = big_g * big_g * big_g * big_g;
        self.update_alpha0();
    }

    fn update_alpha0(&mut self) {
        self.alpha0 = 1.0 / (1.0 + self.resonance * self.gamma);
    }
}
