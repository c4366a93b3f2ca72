//! Fixed 88-key frequency table.
//!
//! Maps the piano range, MIDI notes 21 (A0) to 108 (C8), to equal-tempered
//! frequencies with A4 = 440 Hz. The constants are a published table, not
//! computed, so every key sounds at exactly the same frequency on every
//! platform.

/// Lowest MIDI note on the keyboard (A0).
pub const LOWEST_KEY: u8 = 21;

/// Highest MIDI note on the keyboard (C8).
pub const HIGHEST_KEY: u8 = 108;

/// Number of keys in the table.
pub const KEY_COUNT: usize = 88;

/// Frequency in Hz of each key, A0 first.
#[rustfmt::skip]
pub const KEY_FREQUENCIES: [f32; KEY_COUNT] = [
    27.5, 29.1353, 30.8677,
    32.7032, 34.6479, 36.7081, 38.8909, 41.2035, 43.6536,
    46.2493, 48.9995, 51.9130, 55.0, 58.2705, 61.7354,
    65.4064, 69.2957, 73.4162, 77.7817, 82.4069, 87.3071,
    92.4986, 97.9989, 103.826, 110.0, 116.541, 123.471,
    130.813, 138.591, 146.832, 155.563, 164.814, 174.614,
    184.997, 195.998, 207.652, 220.0, 233.082, 246.942,
    261.626, 277.183, 293.665, 311.127, 329.628, 349.228,
    369.994, 391.995, 415.305, 440.0, 466.164, 493.883,
    523.251, 554.365, 587.330, 622.254, 659.255, 698.456,
    739.989, 783.991, 830.609, 880.0, 932.328, 987.767,
    1046.50, 1108.73, 1174.66, 1244.51, 1318.51, 1396.91,
    1479.98, 1567.98, 1661.22, 1760.0, 1864.66, 1975.53,
    2093.0, 2217.46, 2349.32, 2489.02, 2637.02, 2793.83,
    2959.96, 3135.96, 3322.44, 3520.0, 3729.31, 3951.07,
    4186.01,
];

/// Frequency of a MIDI note, or `None` outside the 88-key range.
#[inline]
pub fn key_to_freq(key: u8) -> Option<f32> {
    let index = usize::from(key.checked_sub(LOWEST_KEY)?);
    KEY_FREQUENCIES.get(index).copied()
}
