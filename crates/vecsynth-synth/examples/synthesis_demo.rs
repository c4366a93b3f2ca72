//! Synthesis demo: a chord through the voice pool, then the envelope tail.
//!
//! Run with: cargo run -p vecsynth-synth --example synthesis_demo

use vecsynth_synth::{ControlMessage, VectorSynth};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK: usize = 4800;

fn rms(block: &[f32]) -> f32 {
    (block.iter().map(|s| s * s).sum::<f32>() / block.len() as f32).sqrt()
}

fn main() {
    let mut synth = VectorSynth::new(SAMPLE_RATE);

    // Short release, slow tremolo, darker filter
    synth.handle_message(ControlMessage::control_change(71, 4));
    synth.handle_message(ControlMessage::new(0xB1, 10, 20));
    synth.handle_message(ControlMessage::new(0xB1, 91, 3));
    synth.handle_message(ControlMessage::control_change(76, 60));

    println!("=== C minor triad, 0.5 s held then released ===\n");
    println!("{:>6} | {:>6} | {:>8}", "time", "voices", "rms");

    for key in [48u8, 51, 55] {
        synth.handle_message(ControlMessage::note_on(key, 100));
    }

    let mut block = vec![0.0f32; BLOCK];
    for step in 0..12 {
        if step == 5 {
            for key in [48u8, 51, 55] {
                synth.handle_message(ControlMessage::note_off(key));
            }
        }
        synth.render(&mut block);
        println!(
            "{:>5.1}s | {:>6} | {:>8.5}",
            step as f32 * BLOCK as f32 / SAMPLE_RATE,
            synth.active_voice_count(),
            rms(&block)
        );
    }

    println!("\n=== Vector mix sweep on A3 ===\n");
    for value in [0u8, 32, 64, 96, 127] {
        let mut synth = VectorSynth::new(SAMPLE_RATE);
        synth.handle_message(ControlMessage::control_change(1, value));
        synth.handle_message(ControlMessage::note_on(57, 100));
        synth.render(&mut block);
        let mix = synth.wave_mix();
        println!(
            "cc1={value:>3}  alpha={:.2} beta={:.2}  rms={:.5}",
            mix.alpha,
            mix.beta,
            rms(&block)
        );
    }
}
