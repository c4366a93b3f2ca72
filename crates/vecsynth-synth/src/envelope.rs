//! ADSR envelope generator for synthesis.
//!
//! Exponential segments at sample granularity: entering a timed stage fixes
//! its length in samples and a per-sample multiplier, so the level lands on
//! the stage target exactly when the stage boundary is reached.
//!
//! ```text
//! level
//!   1 ┤    ╭╮
//!     │   ╱  ╲
//!   S ┤  ╱    ╰──────────╮
//!     │ ╱                 ╲
//! min ┼╯                   ╰───
//!     Off A  D   Sustain  R  Off
//! ```
//!
//! The level never drops below [`MIN_LEVEL`]; an exponential ramp toward
//! zero would otherwise never arrive and would drift into denormals.
//!
//! Reference: Martin Finke, "Making Audio Plugins Part 10: Envelopes".

use libm::{exp, log};

/// Floor of the envelope level.
pub const MIN_LEVEL: f32 = 0.0001;

/// Default attack time in seconds.
pub const DEFAULT_ATTACK: f32 = 0.01;
/// Default decay time in seconds.
pub const DEFAULT_DECAY: f32 = 0.5;
/// Default sustain level.
pub const DEFAULT_SUSTAIN: f32 = 0.1;
/// Default release time in seconds.
pub const DEFAULT_RELEASE: f32 = 1.0;

/// Envelope stages
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EnvelopeStage {
    /// Inactive, holding the floor level.
    #[default]
    Off,
    /// Rising toward 1.0 from the current level.
    Attack,
    /// Falling from 1.0 toward the sustain level.
    Decay,
    /// Holding the sustain level until released.
    Sustain,
    /// Falling from the current level toward the floor.
    Release,
}

impl EnvelopeStage {
    /// Stage entered automatically when this one's time runs out.
    fn next(self) -> EnvelopeStage {
        match self {
            EnvelopeStage::Attack => EnvelopeStage::Decay,
            EnvelopeStage::Decay => EnvelopeStage::Sustain,
            EnvelopeStage::Release => EnvelopeStage::Off,
            EnvelopeStage::Off | EnvelopeStage::Sustain => self,
        }
    }

    fn is_timed(self) -> bool {
        matches!(
            self,
            EnvelopeStage::Attack | EnvelopeStage::Decay | EnvelopeStage::Release
        )
    }
}

/// ADSR envelope generator.
///
/// Attack, decay and release are durations in seconds; sustain is a level in
/// `[0, 1]`. Parameter changes apply from the next stage entry.
///
/// # Example
///
/// ```rust
/// use vecsynth_synth::{EnvelopeGenerator, EnvelopeStage};
///
/// let mut env = EnvelopeGenerator::new(48000.0);
/// env.set_attack(0.005);
/// env.set_decay(0.01);
/// env.set_sustain(0.7);
///
/// // 240 attack samples, then 480 decay samples
/// env.enter_stage(EnvelopeStage::Attack);
/// for _ in 0..1000 {
///     let _level = env.advance();
/// }
/// assert_eq!(env.stage(), EnvelopeStage::Sustain);
///
/// env.enter_stage(EnvelopeStage::Release);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeGenerator {
    stage: EnvelopeStage,
    level: f64,
    multiplier: f64,
    sample_rate: f32,

    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,

    sample_index: u64,
    next_stage_index: u64,
    finished: bool,
}

impl Default for EnvelopeGenerator {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl EnvelopeGenerator {
    /// Create an idle envelope with default parameters.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            stage: EnvelopeStage::Off,
            level: f64::from(MIN_LEVEL),
            multiplier: 1.0,
            sample_rate,
            attack: DEFAULT_ATTACK,
            decay: DEFAULT_DECAY,
            sustain: DEFAULT_SUSTAIN,
            release: DEFAULT_RELEASE,
            sample_index: 0,
            next_stage_index: 0,
            finished: true,
        }
    }

    /// Set attack time in seconds.
    pub fn set_attack(&mut self, seconds: f32) {
        self.attack = seconds.max(0.0);
    }

    /// Get attack time in seconds.
    pub fn attack(&self) -> f32 {
        self.attack
    }

    /// Set decay time in seconds.
    pub fn set_decay(&mut self, seconds: f32) {
        self.decay = seconds.max(0.0);
    }

    /// Get decay time in seconds.
    pub fn decay(&self) -> f32 {
        self.decay
    }

    /// Set sustain level (0.0 to 1.0).
    pub fn set_sustain(&mut self, level: f32) {
        self.sustain = level.clamp(0.0, 1.0);
    }

    /// Get sustain level.
    pub fn sustain(&self) -> f32 {
        self.sustain
    }

    /// Set release time in seconds.
    pub fn set_release(&mut self, seconds: f32) {
        self.release = seconds.max(0.0);
    }

    /// Get release time in seconds.
    pub fn release(&self) -> f32 {
        self.release
    }

    /// Set sample rate. Applies to stages entered afterwards.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Get sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Current stage.
    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    /// Current output level.
    pub fn level(&self) -> f32 {
        self.level as f32
    }

    /// True once a Release has run down to Off, until the next Attack.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Check if the envelope is in any stage other than Off.
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Off
    }

    /// Number of samples the current timed stage lasts (0 for Off/Sustain).
    pub fn stage_length(&self) -> u64 {
        self.next_stage_index
    }

    /// Switch to `stage` immediately.
    ///
    /// Attack and Release ramp from the current level, so retriggering a
    /// sounding envelope does not click.
    pub fn enter_stage(&mut self, stage: EnvelopeStage) {
        let floor = f64::from(MIN_LEVEL);
        let sustain = f64::from(self.sustain.max(MIN_LEVEL));

        self.stage = stage;
        self.sample_index = 0;
        self.next_stage_index = match stage {
            EnvelopeStage::Attack => self.stage_samples(self.attack),
            EnvelopeStage::Decay => self.stage_samples(self.decay),
            EnvelopeStage::Release => self.stage_samples(self.release),
            EnvelopeStage::Off | EnvelopeStage::Sustain => 0,
        };

        match stage {
            EnvelopeStage::Off => {
                self.level = floor;
                self.multiplier = 1.0;
                self.finished = true;
            }
            EnvelopeStage::Attack => {
                self.level = self.level.clamp(floor, 1.0);
                self.multiplier = ramp_multiplier(self.level, 1.0, self.next_stage_index);
                self.finished = false;
            }
            EnvelopeStage::Decay => {
                self.level = 1.0;
                self.multiplier = ramp_multiplier(1.0, sustain, self.next_stage_index);
            }
            EnvelopeStage::Sustain => {
                self.level = sustain;
                self.multiplier = 1.0;
            }
            EnvelopeStage::Release => {
                self.level = self.level.max(floor);
                self.multiplier = ramp_multiplier(self.level, floor, self.next_stage_index);
            }
        }
    }

    /// Advance by one sample and return the new level.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.stage.is_timed() {
            if self.sample_index >= self.next_stage_index {
                self.enter_stage(self.stage.next());
            }
            if self.stage.is_timed() {
                self.level = (self.level * self.multiplier).clamp(f64::from(MIN_LEVEL), 1.0);
                self.sample_index += 1;
            }
        }
        self.level as f32
    }

    /// Return to Off at the floor level, marking the cycle finished.
    pub fn reset(&mut self) {
        self.enter_stage(EnvelopeStage::Off);
    }

    fn stage_samples(&self, seconds: f32) -> u64 {
        let samples = libm::round(f64::from(seconds) * f64::from(self.sample_rate));
        (samples as u64).max(1)
    }
}

/// Per-sample factor taking `start` to `end` in `samples` multiplications.
fn ramp_multiplier(start: f64, end: f64, samples: u64) -> f64 {
    exp((log(end) - log(start)) / samples as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(env: &mut EnvelopeGenerator, samples: usize) -> f32 {
        let mut level = env.level();
        for _ in 0..samples {
            level = env.advance();
        }
        level
    }

    #[test]
    fn test_defaults() {
        let env = EnvelopeGenerator::new(48000.0);
        assert_eq!(env.stage(), EnvelopeStage::Off);
        assert!(env.is_finished());
        assert_eq!(env.attack(), 0.01);
        assert_eq!(env.decay(), 0.5);
        assert_eq!(env.sustain(), 0.1);
        assert_eq!(env.release(), 1.0);
        assert_eq!(env.level(), MIN_LEVEL);
    }

    #[test]
    fn test_off_and_sustain_hold() {
        let mut env = EnvelopeGenerator::new(48000.0);
        assert_eq!(run(&mut env, 100), MIN_LEVEL);
        assert_eq!(env.stage(), EnvelopeStage::Off);

        env.set_sustain(0.6);
        env.enter_stage(EnvelopeStage::Sustain);
        assert!((run(&mut env, 48000) - 0.6).abs() < 1e-6);
        assert_eq!(env.stage(), EnvelopeStage::Sustain, "sustain never auto-advances");
    }

    #[test]
    fn test_attack_reaches_peak_on_schedule() {
        let mut env = EnvelopeGenerator::new(48000.0);
        env.set_attack(0.01);
        env.enter_stage(EnvelopeStage::Attack);
        assert_eq!(env.stage_length(), 480);
        assert!(!env.is_finished());

        let mut prev = env.level();
        for _ in 0..480 {
            let level = env.advance();
            assert!(level >= prev, "attack must rise monotonically");
            prev = level;
        }
        assert!((prev - 1.0).abs() < 1e-3, "attack target reached, got {prev}");
        assert_eq!(env.stage(), EnvelopeStage::Attack);

        env.advance();
        assert_eq!(env.stage(), EnvelopeStage::Decay);
    }

    #[test]
    fn test_decay_lands_on_sustain() {
        let mut env = EnvelopeGenerator::new(48000.0);
        env.set_attack(0.001);
        env.set_decay(0.1);
        env.set_sustain(0.25);
        env.enter_stage(EnvelopeStage::Attack);

        // 48 attack samples, 1 transition sample, 4800 decay samples
        let level = run(&mut env, 48 + 4800);
        assert_eq!(env.stage(), EnvelopeStage::Decay);
        assert!((level - 0.25).abs() < 1e-3, "decay reaches sustain, got {level}");

        env.advance();
        assert_eq!(env.stage(), EnvelopeStage::Sustain);
        assert!((env.level() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_short_attack_and_decay_settle_in_sustain() {
        let mut env = EnvelopeGenerator::new(48000.0);
        env.set_attack(0.005);
        env.set_decay(0.01);
        env.set_sustain(0.7);
        env.enter_stage(EnvelopeStage::Attack);

        let level = run(&mut env, 1000);
        assert_eq!(env.stage(), EnvelopeStage::Sustain);
        assert!((level - 0.7).abs() < 1e-6, "sustain holds, got {level}");
    }

    #[test]
    fn test_release_finishes_at_floor() {
        let mut env = EnvelopeGenerator::new(48000.0);
        env.set_release(0.05);
        env.enter_stage(EnvelopeStage::Attack);
        run(&mut env, 2000);
        env.enter_stage(EnvelopeStage::Release);
        assert!(!env.is_finished());

        let mut prev = env.level();
        for _ in 0..2400 {
            let level = env.advance();
            assert!(level <= prev && level >= MIN_LEVEL);
            prev = level;
        }
        assert!((prev - MIN_LEVEL).abs() < 1e-6);

        env.advance();
        assert_eq!(env.stage(), EnvelopeStage::Off);
        assert!(env.is_finished());
        assert_eq!(env.level(), MIN_LEVEL);
    }

    #[test]
    fn test_zero_sustain_release_stays_finite() {
        let mut env = EnvelopeGenerator::new(48000.0);
        env.set_sustain(0.0);
        env.set_attack(0.001);
        env.set_decay(0.001);
        env.enter_stage(EnvelopeStage::Attack);
        run(&mut env, 500);
        assert_eq!(env.stage(), EnvelopeStage::Sustain);
        assert_eq!(env.level(), MIN_LEVEL);

        env.enter_stage(EnvelopeStage::Release);
        let level = run(&mut env, 100_000);
        assert!(level.is_finite());
        assert!(env.is_finished());
    }

    #[test]
    fn test_retrigger_attack_from_current_level() {
        let mut env = EnvelopeGenerator::new(48000.0);
        env.set_release(1.0);
        env.enter_stage(EnvelopeStage::Attack);
        run(&mut env, 5000);
        env.enter_stage(EnvelopeStage::Release);
        let mid_release = run(&mut env, 4800);
        assert!(mid_release > MIN_LEVEL && mid_release < 1.0);

        env.enter_stage(EnvelopeStage::Attack);
        assert_eq!(env.level(), mid_release, "no jump on retrigger");
        assert!(!env.is_finished());
        let next = env.advance();
        assert!(next > mid_release);
    }

    #[test]
    fn test_zero_length_stage_advances_immediately() {
        let mut env = EnvelopeGenerator::new(48000.0);
        env.set_attack(0.0);
        env.enter_stage(EnvelopeStage::Attack);
        assert_eq!(env.stage_length(), 1);
        let level = env.advance();
        assert!((level - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sample_rate_scales_stage_length() {
        let mut env = EnvelopeGenerator::new(96000.0);
        env.set_attack(0.01);
        env.enter_stage(EnvelopeStage::Attack);
        assert_eq!(env.stage_length(), 960);

        env.set_sample_rate(44100.0);
        env.enter_stage(EnvelopeStage::Release);
        assert_eq!(env.stage_length(), 44100);
    }

    #[test]
    fn test_reset_returns_to_off() {
        let mut env = EnvelopeGenerator::new(48000.0);
        env.enter_stage(EnvelopeStage::Attack);
        run(&mut env, 100);
        env.reset();
        assert_eq!(env.stage(), EnvelopeStage::Off);
        assert!(env.is_finished());
        assert_eq!(env.level(), MIN_LEVEL);
    }

    #[test]
    fn test_parameter_clamping() {
        let mut env = EnvelopeGenerator::new(48000.0);
        env.set_sustain(1.5);
        assert_eq!(env.sustain(), 1.0);
        env.set_sustain(-0.5);
        assert_eq!(env.sustain(), 0.0);
        env.set_attack(-1.0);
        assert_eq!(env.attack(), 0.0);
    }
}
