//! Zero-delay-feedback one-pole lowpass stage.
//!
//! The atomic building block of [`LadderFilter`](crate::LadderFilter). A
//! trapezoidal integrator in "integrator doubling" form:
//!
//! ```text
//! v = (x - z) * alpha
//! y = v + z
//! z = v + y
//! ```
//!
//! Unlike a naive difference equation there is no unit delay between input
//! and output, so the stage can sit inside a global feedback loop and still
//! be resolved in one pass.
//!
//! The coefficients are owned by the enclosing filter: `alpha` is the
//! feed-forward gain `G = g / (1 + g)` and `beta` scales the integrator state
//! when the ladder sums its feedback taps.
//!
//! # Reference
//!
//! Will Pirkle, "Designing Software Synthesizer Plug-Ins in C++", ch. 7
//! (virtual-analog one-pole and Moog ladder).

use crate::flush_denormal;

/// Trapezoidal one-pole lowpass with an exposed feedback tap.
///
/// # Invariants
///
/// - `alpha` and `beta` are only written by the owning ladder filter
/// - `z` is flushed to zero below 1e-20 (denormal protection)
#[derive(Debug, Clone, Default)]
pub struct OnePoleStage {
    alpha: f32,
    beta: f32,
    z: f32,
}

impl OnePoleStage {
    /// Create a stage with zero coefficients and cleared memory.
    pub const fn new() -> Self {
        Self {
            alpha: 0.0,
            beta: 0.0,
            z: 0.0,
        }
    }

    /// Feed-forward coefficient.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Feedback-tap coefficient.
    pub fn beta(&self) -> f32 {
        self.beta
    }

    /// Current integrator memory.
    pub fn state(&self) -> f32 {
        self.z
    }

    pub(crate) fn set_coefficients(&mut self, alpha: f32, beta: f32) {
        self.alpha = alpha;
        self.beta = beta;
    }

    /// Contribution of this stage to the ladder's feedback sum (`beta * z`).
    #[inline]
    pub fn feedback_output(&self) -> f32 {
        self.beta * self.z
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let v = (input - self.z) * self.alpha;
        let out = v + self.z;
        self.z = flush_denormal(v + out);
        out
    }

    /// Clear the integrator memory. Coefficients are kept.
    pub fn reset(&mut self) {
        self.z = 0.0;
    }
}
