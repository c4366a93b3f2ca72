//! Controller map listing.

/// A printed row: status byte, data1 (`None` for any), action.
type Row = (u8, Option<u8>, &'static str);

const CONTROLS: &[Row] = &[
    (0x90, None, "Note on (velocity 0 = note off), keys 21-108"),
    (0x80, None, "Note off"),
    (0xE0, None, "Pitch wheel: wave mix gamma (pair crossfade)"),
    (0xB0, Some(1), "Mod wheel: wave mix alpha/beta (0.5-1)"),
    (0xB0, Some(74), "Wave mix alpha/beta (1-0)"),
    (0xB0, Some(73), "Volume attack (0-1 s)"),
    (0xB0, Some(75), "Volume decay (0-1 s)"),
    (0xB0, Some(72), "Volume sustain (0-1)"),
    (0xB0, Some(71), "Volume release (0-6.35 s)"),
    (0xB0, Some(76), "Filter cutoff"),
    (0xB0, Some(77), "Filter resonance (0-4)"),
    (0xB0, Some(78), "Filter max cutoff (0-10 kHz)"),
    (0xB1, Some(7), "Filter env attack"),
    (0xB1, Some(1), "Filter env decay"),
    (0xB1, Some(71), "Filter env sustain"),
    (0xB1, Some(74), "Filter env release"),
    (0xB1, Some(10), "Tremolo rate (0-20 Hz)"),
    (0xB1, Some(91), "Tremolo depth"),
    (0xB1, Some(12), "Cutoff LFO rate (0-20 Hz)"),
    (0xB1, Some(93), "Cutoff LFO depth"),
    (0x99, Some(36), "Filter mode: 4-pole lowpass"),
    (0x99, Some(40), "Filter mode: 2-pole lowpass"),
    (0x99, Some(43), "Filter mode: 4-pole highpass"),
    (0x99, Some(45), "Filter mode: 2-pole highpass"),
    (0x99, Some(42), "Filter mode: 4-pole bandpass"),
    (0x99, Some(46), "Filter mode: 2-pole bandpass"),
    (0x99, Some(48), "Toggle mix hold"),
    (0x91, Some(49), "Tremolo shape: sine"),
    (0x91, Some(50), "Tremolo shape: triangle"),
    (0x91, Some(56), "Tremolo shape: sawtooth"),
];

pub fn run() -> anyhow::Result<()> {
    println!("Controller Map");
    println!("==============\n");
    println!("  {:<6} {:<5} Action", "Status", "Data1");
    for (status, data1, action) in CONTROLS {
        let data1 = data1.map_or_else(|| "-".to_string(), |d| d.to_string());
        println!("  0x{status:02X}   {data1:<5} {action}");
    }
    println!();
    println!("Pad releases (0x99/0x91 with velocity 0) and all other messages are ignored.");
    Ok(())
}
