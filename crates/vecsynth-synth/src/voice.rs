//! A single synthesizer voice.
//!
//! Four oscillators are crossfaded on two axes before the amplitude envelope
//! and the ladder filter:
//!
//! ```text
//!  custom ──┐ α                 triangle ──┐ β
//!           ├── pair A ──┐ γ               ├── pair B ──┐ 1-γ
//!  square ──┘ 1-α        │      sawtooth ──┘ 1-β        │
//!                        └──────────── + ───────────────┘
//!                                      │
//!                       × volume env × velocity/127
//!                                      │
//!            ladder filter (cutoff = filter env × base × (1 + LFO))
//! ```
//!
//! α and β blend within each pair and γ blends the pairs: the two-level
//! "vector" mix.

use alloc::sync::Arc;
use vecsynth_core::{DEFAULT_CUTOFF, LadderFilter, LadderMode};

use crate::envelope::{EnvelopeGenerator, EnvelopeStage};
use crate::oscillator::{Oscillator, Waveform};
use crate::wavetable::Wavetable;

/// Largest MIDI velocity, used to normalise note velocity.
const MAX_VELOCITY: f32 = 127.0;

/// Vector-mix weights, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveMix {
    /// Custom-wave vs square blend (1 = custom only).
    pub alpha: f32,
    /// Triangle vs sawtooth blend (1 = triangle only).
    pub beta: f32,
    /// Pair A vs pair B blend (1 = pair A only).
    pub gamma: f32,
}

impl Default for WaveMix {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            beta: 0.5,
            gamma: 0.5,
        }
    }
}

impl WaveMix {
    /// Clamp every weight into `[0, 1]`.
    pub fn clamped(self) -> Self {
        Self {
            alpha: self.alpha.clamp(0.0, 1.0),
            beta: self.beta.clamp(0.0, 1.0),
            gamma: self.gamma.clamp(0.0, 1.0),
        }
    }

    /// Blend one sample of each oscillator.
    #[inline]
    pub fn blend(&self, custom: f32, square: f32, triangle: f32, sawtooth: f32) -> f32 {
        let pair_a = custom * self.alpha + square * (1.0 - self.alpha);
        let pair_b = triangle * self.beta + sawtooth * (1.0 - self.beta);
        self.gamma * pair_a + (1.0 - self.gamma) * pair_b
    }
}

/// A single synthesizer voice.
///
/// Voices deactivate themselves once the volume envelope finishes its
/// release, returning to the free pool without help from the manager.
#[derive(Debug, Clone)]
pub struct Voice {
    custom: Oscillator,
    square: Oscillator,
    triangle: Oscillator,
    sawtooth: Oscillator,

    /// Amplitude envelope
    pub volume_env: EnvelopeGenerator,
    /// Filter envelope
    pub filter_env: EnvelopeGenerator,
    filter: LadderFilter,
    /// Private cutoff LFO for [`Voice::render_add`]
    cutoff_lfo: Option<Oscillator>,

    mix: WaveMix,
    /// Base cutoff in Hz before envelope and LFO modulation
    cutoff: f32,
    key: Option<u8>,
    velocity: u8,
    active: bool,
}

impl Default for Voice {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Voice {
    /// Create an idle voice with a built-in sine table for the custom slot.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_wavetable(sample_rate, Arc::new(Wavetable::default()))
    }

    /// Create an idle voice reading `table` in the custom slot.
    pub fn with_wavetable(sample_rate: f32, table: Arc<Wavetable>) -> Self {
        let mut custom = Oscillator::new(sample_rate).with_waveform(Waveform::Custom);
        custom.set_wavetable(table);

        let mut filter = LadderFilter::new(sample_rate);
        filter.set_cutoff(DEFAULT_CUTOFF);

        Self {
            custom,
            square: Oscillator::new(sample_rate).with_waveform(Waveform::Square),
            triangle: Oscillator::new(sample_rate).with_waveform(Waveform::Triangle),
            sawtooth: Oscillator::new(sample_rate).with_waveform(Waveform::Sawtooth),
            volume_env: EnvelopeGenerator::new(sample_rate),
            filter_env: EnvelopeGenerator::new(sample_rate),
            filter,
            cutoff_lfo: None,
            mix: WaveMix::default(),
            cutoff: DEFAULT_CUTOFF,
            key: None,
            velocity: 0,
            active: false,
        }
    }

    /// Set sample rate on every component.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for osc in self.oscillators_mut() {
            osc.set_sample_rate(sample_rate);
        }
        if let Some(lfo) = &mut self.cutoff_lfo {
            lfo.set_sample_rate(sample_rate);
        }
        self.volume_env.set_sample_rate(sample_rate);
        self.filter_env.set_sample_rate(sample_rate);
        self.filter.set_sample_rate(sample_rate);
    }

    /// Start a note: reset, tune, and enter Attack on both envelopes.
    pub fn note_on(&mut self, key: u8, velocity: u8, frequency: f32) {
        self.reset();
        self.set_frequency(frequency);
        self.key = Some(key);
        self.velocity = velocity;
        self.active = true;
        self.volume_env.enter_stage(EnvelopeStage::Attack);
        self.filter_env.enter_stage(EnvelopeStage::Attack);
    }

    /// Enter Release on both envelopes.
    pub fn note_off(&mut self) {
        self.volume_env.enter_stage(EnvelopeStage::Release);
        self.filter_env.enter_stage(EnvelopeStage::Release);
    }

    /// Clear key, velocity and oscillator phases. Envelope settings are kept.
    pub fn reset(&mut self) {
        self.key = None;
        self.velocity = 0;
        for osc in self.oscillators_mut() {
            osc.reset();
        }
    }

    /// Check if the voice is sounding.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Key held by this voice, if any.
    pub fn key(&self) -> Option<u8> {
        self.key
    }

    /// Velocity of the current note.
    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    /// Tune all four oscillators.
    pub fn set_frequency(&mut self, frequency: f32) {
        for osc in self.oscillators_mut() {
            osc.set_frequency(frequency);
        }
    }

    /// Current oscillator frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.square.frequency()
    }

    /// Set the vector-mix weights (clamped to `[0, 1]`).
    pub fn set_wave_mix(&mut self, mix: WaveMix) {
        self.mix = mix.clamped();
    }

    /// Current vector-mix weights.
    pub fn wave_mix(&self) -> WaveMix {
        self.mix
    }

    /// Set the base cutoff in Hz, also applied to the filter immediately.
    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff = cutoff;
        self.filter.set_cutoff(cutoff);
    }

    /// Base cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Set ladder resonance.
    pub fn set_resonance(&mut self, resonance: f32) {
        self.filter.set_resonance(resonance);
    }

    /// Select the ladder response.
    pub fn set_filter_mode(&mut self, mode: LadderMode) {
        self.filter.set_mode(mode);
    }

    /// The voice's ladder filter.
    pub fn filter(&self) -> &LadderFilter {
        &self.filter
    }

    /// Replace the table read by the custom oscillator.
    pub fn set_wavetable(&mut self, table: Arc<Wavetable>) {
        self.custom.set_wavetable(table);
    }

    /// Install or remove the private cutoff LFO used by [`Voice::render_add`].
    pub fn set_cutoff_lfo(&mut self, lfo: Option<Oscillator>) {
        self.cutoff_lfo = lfo;
    }

    /// The private cutoff LFO, if installed.
    pub fn cutoff_lfo_mut(&mut self) -> Option<&mut Oscillator> {
        self.cutoff_lfo.as_mut()
    }

    /// Produce one sample with the given cutoff-LFO value.
    ///
    /// An inactive voice, or one whose volume envelope has finished, forces
    /// its filter envelope Off, marks itself inactive and returns silence.
    #[inline]
    pub fn next_sample(&mut self, cutoff_lfo: f32) -> f32 {
        if !self.active || self.volume_env.is_finished() {
            if self.filter_env.stage() != EnvelopeStage::Off {
                self.filter_env.enter_stage(EnvelopeStage::Off);
            }
            self.active = false;
            return 0.0;
        }

        let volume = self.volume_env.advance();
        let filter_level = self.filter_env.advance();
        if filter_level > 0.0 {
            self.filter
                .set_cutoff(filter_level * self.cutoff * (1.0 + cutoff_lfo));
        }

        let raw = self.mix.blend(
            self.custom.advance(),
            self.square.advance(),
            self.triangle.advance(),
            self.sawtooth.advance(),
        );
        let sample = raw * volume * (f32::from(self.velocity) / MAX_VELOCITY);
        self.filter.process(sample)
    }

    /// Add this voice's output into `out`, modulating cutoff with the
    /// private LFO (or none).
    pub fn render_add(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            let lfo = self
                .cutoff_lfo
                .as_mut()
                .map_or(0.0, Oscillator::advance_naive);
            *sample += self.next_sample(lfo);
        }
    }

    fn oscillators_mut(&mut self) -> [&mut Oscillator; 4] {
        [
            &mut self.custom,
            &mut self.square,
            &mut self.triangle,
            &mut self.sawtooth,
        ]
    }
}
