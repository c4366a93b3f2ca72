//! Ladder filter demo: steady-state gain of each response type.
//!
//! Run with: cargo run -p vecsynth-core --example ladder_response

use vecsynth_core::{LadderFilter, LadderMode};

const SAMPLE_RATE: f32 = 48000.0;
const PROBES: [f32; 6] = [100.0, 300.0, 1000.0, 3000.0, 10000.0, 18000.0];

/// Peak output of a unit sine after the filter has settled.
fn gain_at(filter: &mut LadderFilter, freq: f32) -> f32 {
    filter.reset();
    let step = 2.0 * std::f32::consts::PI * freq / SAMPLE_RATE;
    let settle = SAMPLE_RATE as usize / 4;
    let mut peak = 0.0f32;
    for i in 0..settle * 2 {
        let y = filter.process((step * i as f32).sin());
        if i >= settle {
            peak = peak.max(y.abs());
        }
    }
    peak
}

fn main() {
    for resonance in [0.0, 3.0] {
        println!("=== Cutoff 1 kHz, resonance {resonance} ===\n");
        print!("{:<6}", "Mode");
        for freq in PROBES {
            print!("{:>9}", format!("{freq} Hz"));
        }
        println!();

        for mode in LadderMode::ALL {
            let mut filter = LadderFilter::new(SAMPLE_RATE);
            filter.set_mode(mode);
            filter.set_cutoff(1000.0);
            filter.set_resonance(resonance);

            print!("{:<6}", mode.name());
            for freq in PROBES {
                let db = 20.0 * gain_at(&mut filter, freq).max(1e-6).log10();
                print!("{db:>9.1}");
            }
            println!();
        }
        println!();
    }
}
