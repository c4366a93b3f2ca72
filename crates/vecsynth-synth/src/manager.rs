//! Polyphonic voice pool with global modulation.
//!
//! [`VoiceManager`] owns a fixed array of [`Voice`]s, the shared tremolo and
//! cutoff LFOs, and the global wave-mix state. Control messages are mapped to
//! [`Command`]s and applied here; audio is pulled one frame or one buffer at
//! a time.
//!
//! Allocation is first-fit with no stealing: when every voice is busy a new
//! note is dropped.

use alloc::sync::Arc;
use libm::expf;
use vecsynth_core::{DEFAULT_CUTOFF, LadderMode};

use crate::control::{Command, ControlMessage, EnvelopeParam, EnvelopeTarget};
use crate::envelope::EnvelopeGenerator;
use crate::keyboard::key_to_freq;
use crate::oscillator::{Oscillator, Waveform};
use crate::voice::{Voice, WaveMix};
use crate::wavetable::Wavetable;

/// Number of voices in a [`VectorSynth`].
pub const DEFAULT_POLYPHONY: usize = 24;

/// Default engine sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: f32 = 48000.0;

/// Default amplitude of the shared cutoff LFO.
pub const DEFAULT_CUTOFF_LFO_DEPTH: f32 = 0.5;

/// Lowest cutoff reached by the cutoff knob, in Hz.
const CUTOFF_KNOB_OFFSET: f32 = 20.0;

/// The instrument at its default polyphony.
pub type VectorSynth = VoiceManager<DEFAULT_POLYPHONY>;

/// Fixed pool of `N` voices plus global modulation.
#[derive(Debug, Clone)]
pub struct VoiceManager<const N: usize> {
    voices: [Voice; N],
    mix: WaveMix,
    hold: bool,
    tremolo: Oscillator,
    cutoff_lfo: Oscillator,
    max_cutoff: f32,
    cutoff: f32,
    sample_rate: f32,
    wavetable: Arc<Wavetable>,
}

impl<const N: usize> Default for VoiceManager<N> {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl<const N: usize> VoiceManager<N> {
    /// Create a pool using the built-in sine table for the custom slot.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_wavetable(sample_rate, Arc::new(Wavetable::default()))
    }

    /// Create a pool whose voices share `table` for the custom slot.
    pub fn with_wavetable(sample_rate: f32, table: Arc<Wavetable>) -> Self {
        Self {
            voices: core::array::from_fn(|_| {
                Voice::with_wavetable(sample_rate, Arc::clone(&table))
            }),
            mix: WaveMix::default(),
            hold: false,
            tremolo: Oscillator::new(sample_rate),
            cutoff_lfo: Oscillator::new(sample_rate).with_amplitude(DEFAULT_CUTOFF_LFO_DEPTH),
            max_cutoff: DEFAULT_CUTOFF,
            cutoff: DEFAULT_CUTOFF,
            sample_rate,
            wavetable: table,
        }
    }

    /// Polyphony ceiling.
    pub const fn polyphony(&self) -> usize {
        N
    }

    /// Current sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Set sample rate on every voice and both LFOs.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        for voice in &mut self.voices {
            voice.set_sample_rate(sample_rate);
        }
        self.tremolo.set_sample_rate(sample_rate);
        self.cutoff_lfo.set_sample_rate(sample_rate);
    }

    /// Replace the custom-slot table on every voice.
    pub fn set_wavetable(&mut self, table: Arc<Wavetable>) {
        #[cfg(feature = "tracing")]
        tracing::debug!(len = table.len(), "wavetable replaced");
        for voice in &mut self.voices {
            voice.set_wavetable(Arc::clone(&table));
        }
        self.wavetable = table;
    }

    /// Table shared by the voices' custom slot.
    pub fn wavetable(&self) -> &Arc<Wavetable> {
        &self.wavetable
    }

    /// Decode and apply one control message. Unmapped messages are ignored.
    pub fn handle_message(&mut self, msg: ControlMessage) {
        if let Some(command) = Command::from_message(msg) {
            self.apply(command);
        }
    }

    /// Apply one command.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::NoteOn { key, velocity } => {
                self.note_on(key, velocity);
            }
            Command::NoteOff { key } => self.note_off(key),
            Command::WaveMixUp(v) => self.set_pair_blend(0.5 + 0.5 * v),
            Command::WaveMixDown(v) => self.set_pair_blend(1.0 - v),
            Command::WaveBlend(v) => {
                if !self.hold {
                    self.set_wave_mix(WaveMix {
                        gamma: v,
                        ..self.mix
                    });
                }
            }
            Command::Envelope {
                target,
                param,
                value,
            } => self.set_envelope_param(target, param, value),
            Command::Cutoff(v) => {
                self.set_cutoff((expf(v) - 1.0) * self.max_cutoff + CUTOFF_KNOB_OFFSET);
            }
            Command::Resonance(k) => self.set_resonance(k),
            Command::MaxCutoff(hz) => self.max_cutoff = hz,
            Command::FilterMode(mode) => self.set_filter_mode(mode),
            Command::ToggleHold => self.set_hold(!self.hold),
            Command::TremoloRate(hz) => self.tremolo.set_frequency(hz),
            Command::TremoloDepth(depth) => self.tremolo.set_amplitude(depth),
            Command::TremoloShape(shape) => self.tremolo.set_waveform(shape),
            Command::CutoffLfoRate(hz) => self.cutoff_lfo.set_frequency(hz),
            Command::CutoffLfoDepth(depth) => self.cutoff_lfo.set_amplitude(depth),
        }
    }

    /// Start a note on the first free voice.
    ///
    /// Returns `false` when the key is outside the 88-key range or every
    /// voice is busy; the note is dropped in both cases.
    pub fn note_on(&mut self, key: u8, velocity: u8) -> bool {
        let Some(frequency) = key_to_freq(key) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(key, "note dropped: key out of range");
            return false;
        };

        match self.voices.iter_mut().find(|v| !v.is_active()) {
            Some(voice) => {
                voice.note_on(key, velocity, frequency);
                true
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!(key, "note dropped: voice pool exhausted");
                false
            }
        }
    }

    /// Release every active voice holding `key`.
    pub fn note_off(&mut self, key: u8) {
        for voice in &mut self.voices {
            if voice.is_active() && voice.key() == Some(key) {
                voice.note_off();
            }
        }
    }

    /// Release every active voice.
    pub fn release_all(&mut self) {
        for voice in self.voices.iter_mut().filter(|v| v.is_active()) {
            voice.note_off();
        }
    }

    /// Number of voices currently sounding.
    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// The voice pool.
    pub fn voices(&self) -> &[Voice; N] {
        &self.voices
    }

    /// Whether wave-mix changes are frozen.
    pub fn hold(&self) -> bool {
        self.hold
    }

    /// Freeze or unfreeze wave-mix changes.
    pub fn set_hold(&mut self, hold: bool) {
        #[cfg(feature = "tracing")]
        tracing::debug!(hold, "hold toggled");
        self.hold = hold;
    }

    /// Global wave-mix weights.
    pub fn wave_mix(&self) -> WaveMix {
        self.mix
    }

    /// Set and broadcast the wave-mix weights. Ignores hold.
    pub fn set_wave_mix(&mut self, mix: WaveMix) {
        self.mix = mix.clamped();
        for voice in &mut self.voices {
            voice.set_wave_mix(self.mix);
        }
    }

    /// Current base cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Set and broadcast the base cutoff in Hz.
    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff = cutoff;
        for voice in &mut self.voices {
            voice.set_cutoff(cutoff);
        }
    }

    /// Cutoff reached by the cutoff knob at `e - 1` of its curve.
    pub fn max_cutoff(&self) -> f32 {
        self.max_cutoff
    }

    /// Set the maximum cutoff scale used by the cutoff knob.
    pub fn set_max_cutoff(&mut self, hz: f32) {
        self.max_cutoff = hz;
    }

    /// Broadcast ladder resonance.
    pub fn set_resonance(&mut self, resonance: f32) {
        for voice in &mut self.voices {
            voice.set_resonance(resonance);
        }
    }

    /// Broadcast the ladder response.
    pub fn set_filter_mode(&mut self, mode: LadderMode) {
        #[cfg(feature = "tracing")]
        tracing::debug!(mode = mode.name(), "filter mode");
        for voice in &mut self.voices {
            voice.set_filter_mode(mode);
        }
    }

    /// Broadcast one envelope parameter.
    pub fn set_envelope_param(
        &mut self,
        target: EnvelopeTarget,
        param: EnvelopeParam,
        value: f32,
    ) {
        for voice in &mut self.voices {
            let env = match target {
                EnvelopeTarget::Volume => &mut voice.volume_env,
                EnvelopeTarget::Filter => &mut voice.filter_env,
            };
            set_param(env, param, value);
        }
    }

    /// The global tremolo LFO.
    pub fn tremolo(&self) -> &Oscillator {
        &self.tremolo
    }

    /// Waveform of the tremolo LFO.
    pub fn tremolo_shape(&self) -> Waveform {
        self.tremolo.waveform()
    }

    /// Mutable access to the global tremolo LFO.
    pub fn tremolo_mut(&mut self) -> &mut Oscillator {
        &mut self.tremolo
    }

    /// The shared cutoff LFO.
    pub fn cutoff_lfo(&self) -> &Oscillator {
        &self.cutoff_lfo
    }

    /// Mutable access to the shared cutoff LFO.
    pub fn cutoff_lfo_mut(&mut self) -> &mut Oscillator {
        &mut self.cutoff_lfo
    }

    /// Produce one mono frame.
    #[inline]
    pub fn process(&mut self) -> f32 {
        let lfo = self.cutoff_lfo.advance_naive();
        let mut sum = 0.0;
        for voice in &mut self.voices {
            sum += voice.next_sample(lfo);
        }
        sum * (1.0 + self.tremolo.advance_naive())
    }

    /// Overwrite `out` with mono frames.
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.process();
        }
    }

    /// Add mono frames into `out`.
    pub fn render_add(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample += self.process();
        }
    }

    fn set_pair_blend(&mut self, value: f32) {
        if self.hold {
            return;
        }
        self.set_wave_mix(WaveMix {
            alpha: value,
            beta: value,
            ..self.mix
        });
    }
}

fn set_param(env: &mut EnvelopeGenerator, param: EnvelopeParam, value: f32) {
    match param {
        EnvelopeParam::Attack => env.set_attack(value),
        EnvelopeParam::Decay => env.set_decay(value),
        EnvelopeParam::Sustain => env.set_sustain(value),
        EnvelopeParam::Release => env.set_release(value),
    }
}
