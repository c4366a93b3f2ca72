//! Property-based tests for vecsynth-core filter primitives.
//!
//! Tests ladder stability, DC convergence, and the cutoff/resonance
//! coefficient split using proptest for randomized input generation.

use proptest::prelude::*;
use vecsynth_core::{LadderFilter, LadderMode, MAX_RESONANCE};

fn mode_from_index(index: usize) -> LadderMode {
    LadderMode::ALL[index % LadderMode::ALL.len()]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// For any cutoff, resonance up to self-oscillation, and mode, the ladder
    /// produces finite bounded output for random finite input.
    #[test]
    fn ladder_stability(
        cutoff in 20.0f32..20000.0f32,
        resonance in 0.0f32..=MAX_RESONANCE,
        mode in 0usize..6,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut filter = LadderFilter::new(48000.0);
        filter.set_cutoff(cutoff);
        filter.set_resonance(resonance);
        filter.set_mode(mode_from_index(mode));

        for _ in 0..32 {
            for &sample in &input {
                let out = filter.process(sample);
                prop_assert!(
                    out.is_finite() && out.abs() < 64.0,
                    "mode {:?} (fc={}, k={}) produced {} for input {}",
                    filter.mode(), cutoff, resonance, out, sample
                );
            }
        }
    }

    /// With K = 0 a DC input settles on the LP4 tap, which equals the
    /// saturated input `tanh(x)`.
    #[test]
    fn ladder_dc_convergence(
        x in -0.5f32..0.5f32,
        cutoff in 200.0f32..10000.0f32,
    ) {
        let mut filter = LadderFilter::new(48000.0);
        filter.set_resonance(0.0);
        filter.set_cutoff(cutoff);

        let mut out = 0.0;
        for _ in 0..24000 {
            out = filter.process(x);
        }
        let expected = x.tanh();
        prop_assert!(
            (out - expected).abs() < 1e-3,
            "fc={} x={} expected {} got {}", cutoff, x, expected, out
        );
    }

    /// Changing resonance never touches the stage coefficients.
    #[test]
    fn resonance_keeps_stage_coefficients(
        cutoff in 20.0f32..20000.0f32,
        k1 in 0.0f32..=MAX_RESONANCE,
        k2 in 0.0f32..=MAX_RESONANCE,
    ) {
        let mut filter = LadderFilter::new(48000.0);
        filter.set_cutoff(cutoff);
        filter.set_resonance(k1);
        let before: Vec<(f32, f32)> =
            filter.stages().iter().map(|s| (s.alpha(), s.beta())).collect();

        filter.set_resonance(k2);
        let after: Vec<(f32, f32)> =
            filter.stages().iter().map(|s| (s.alpha(), s.beta())).collect();

        prop_assert_eq!(before, after);
        let expected = 1.0 / (1.0 + k2 * filter.loop_gain());
        prop_assert!((filter.input_gain() - expected).abs() < 1e-6);
    }

    /// Stage feed-forward coefficients stay in (0, 1) across the legal
    /// cutoff range, keeping every integrator stable.
    #[test]
    fn stage_alpha_in_unit_interval(
        cutoff in -100.0f32..100000.0f32,
        sample_rate in 22050.0f32..192000.0f32,
    ) {
        let mut filter = LadderFilter::new(sample_rate);
        filter.set_cutoff(cutoff);
        for stage in filter.stages() {
            prop_assert!(stage.alpha() > 0.0 && stage.alpha() < 1.0,
                "alpha {} at fc={} fs={}", stage.alpha(), cutoff, sample_rate);
        }
    }
}
