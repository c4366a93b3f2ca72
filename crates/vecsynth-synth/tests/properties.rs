//! Property-based tests for vecsynth-synth.
//!
//! Covers oscillator phase wrapping, silence at 0 Hz, PolyBLEP overshoot,
//! envelope bounds, and voice-pool bounds under random note streams.

use proptest::prelude::*;
use std::f32::consts::TAU;
use vecsynth_synth::{
    EnvelopeGenerator, EnvelopeStage, Oscillator, VoiceManager, Waveform, envelope::MIN_LEVEL,
};

const SR: f32 = 48000.0;

const WAVEFORMS: [Waveform; 5] = [
    Waveform::Sine,
    Waveform::Square,
    Waveform::Triangle,
    Waveform::Sawtooth,
    Waveform::Custom,
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Phase stays in [0, 2π) for any positive frequency, including
    /// frequencies above Nyquist.
    #[test]
    fn phase_wraps(freq in 0.01f32..100_000.0f32, steps in 1usize..4096) {
        let mut osc = Oscillator::new(SR).with_waveform(Waveform::Sawtooth);
        osc.set_frequency(freq);
        for _ in 0..steps {
            osc.advance();
            let phase = osc.phase();
            prop_assert!((0.0..TAU).contains(&phase), "phase {} at {} Hz", phase, freq);
        }
    }

    /// A 0 Hz oscillator is exactly silent whatever its waveform or phase.
    #[test]
    fn zero_frequency_is_silent(index in 0usize..5, phase in -10.0f32..10.0f32) {
        let mut osc = Oscillator::new(SR).with_waveform(WAVEFORMS[index]);
        osc.set_phase(phase);
        osc.set_frequency(0.0);
        for _ in 0..256 {
            prop_assert_eq!(osc.advance(), 0.0);
        }
    }

    /// PolyBLEP output never exceeds the amplitude by more than the
    /// correction bound (one full step on each side).
    #[test]
    fn blep_overshoot_bounded(
        freq in 20.0f32..12_000.0f32,
        amplitude in 0.1f32..2.0f32,
        square in any::<bool>(),
    ) {
        let waveform = if square { Waveform::Square } else { Waveform::Sawtooth };
        let mut osc = Oscillator::new(SR)
            .with_waveform(waveform)
            .with_amplitude(amplitude);
        osc.set_frequency(freq);
        for _ in 0..2048 {
            let y = osc.advance();
            prop_assert!(y.abs() <= amplitude * 2.0 + 1e-4, "{:?} produced {}", waveform, y);
        }
    }

    /// Attack reaches the peak in its configured time.
    #[test]
    fn attack_reaches_peak(attack in 0.001f32..0.2f32) {
        let mut env = EnvelopeGenerator::new(SR);
        env.set_attack(attack);
        env.enter_stage(EnvelopeStage::Attack);
        let len = env.stage_length();
        let mut level = env.level();
        for _ in 0..len {
            level = env.advance();
        }
        prop_assert!((level - 1.0).abs() < 1e-3, "attack {} ended at {}", attack, level);
    }

    /// Release from any point finishes and never drops below the floor.
    #[test]
    fn release_finishes_at_floor(
        held in 0usize..30_000,
        release in 0.0f32..0.5f32,
        sustain in 0.0f32..=1.0f32,
    ) {
        let mut env = EnvelopeGenerator::new(SR);
        env.set_sustain(sustain);
        env.set_release(release);
        env.enter_stage(EnvelopeStage::Attack);
        for _ in 0..held {
            env.advance();
        }
        env.enter_stage(EnvelopeStage::Release);
        let len = env.stage_length() as usize;
        for _ in 0..=len {
            let level = env.advance();
            prop_assert!(level >= MIN_LEVEL, "level {} below floor", level);
        }
        prop_assert!(env.is_finished());
        prop_assert_eq!(env.stage(), EnvelopeStage::Off);
        prop_assert_eq!(env.level(), MIN_LEVEL);
    }

    /// Random note streams never exceed the pool and keep the output finite.
    #[test]
    fn pool_stays_bounded(
        events in prop::collection::vec((any::<bool>(), 0u8..128, 1u8..128), 1..64),
    ) {
        let mut mgr: VoiceManager<6> = VoiceManager::new(SR);
        let mut buffer = [0.0f32; 32];
        for (on, key, velocity) in events {
            if on {
                mgr.note_on(key, velocity);
            } else {
                mgr.note_off(key);
            }
            prop_assert!(mgr.active_voice_count() <= 6);
            mgr.render(&mut buffer);
            prop_assert!(buffer.iter().all(|s| s.is_finite()));
        }
    }
}
