//! Control-message decoding and the hardware controller map.
//!
//! Incoming MIDI arrives as 3-byte [`ControlMessage`]s. [`Command::from_message`]
//! looks each one up in a fixed table and produces a typed [`Command`] with
//! its value already rescaled into engine units. The table is part of the
//! external protocol: the controller numbers and scalings below match the
//! keyboard and pad controller the instrument was voiced on.
//!
//! | Status | data1 | Command |
//! |--------|-------|---------|
//! | `0xB0` | 1 | [`Command::WaveMixUp`] |
//! | `0xB0` | 74 | [`Command::WaveMixDown`] |
//! | `0xB0` | 71/73/75/72 | volume release/attack/decay/sustain |
//! | `0xB0` | 76/77/78 | cutoff / resonance / max cutoff |
//! | `0xE0` | - | [`Command::WaveBlend`] (pitch wheel) |
//! | `0x90` / `0x80` | key | note on / note off |
//! | `0x99` | 36/40/43/42/46/45 | filter mode LP4/LP2/HP4/BP4/BP2/HP2 |
//! | `0x99` | 48 | [`Command::ToggleHold`] |
//! | `0xB1` | 10/91 | tremolo rate / depth |
//! | `0xB1` | 12/93 | cutoff LFO rate / depth |
//! | `0xB1` | 7/1/71/74 | filter attack/decay/sustain/release |
//! | `0x91` | 49/56/50 | tremolo shape sine/sawtooth/triangle |

use crate::oscillator::Waveform;
use vecsynth_core::LadderMode;

/// Note-off, channel 1.
pub const NOTE_OFF: u8 = 0x80;
/// Note-on, channel 1.
pub const NOTE_ON: u8 = 0x90;
/// Note-on, channel 2 (pad bank B).
pub const PAD_NOTE_ON_2: u8 = 0x91;
/// Note-on, channel 10 (pad bank A).
pub const PAD_NOTE_ON_10: u8 = 0x99;
/// Control change, channel 1 (keyboard knobs and wheels).
pub const CONTROL_CHANGE: u8 = 0xB0;
/// Control change, channel 2 (pad controller knobs).
pub const CONTROL_CHANGE_2: u8 = 0xB1;
/// Pitch bend, channel 1.
pub const PITCH_BEND: u8 = 0xE0;

/// Largest 7-bit data value.
pub const MAX_DATA: f32 = 127.0;

/// A decoded 3-byte channel message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ControlMessage {
    /// Status byte (message kind and channel).
    pub status: u8,
    /// First data byte (key or controller number).
    pub data1: u8,
    /// Second data byte (velocity or controller value).
    pub data2: u8,
}

impl ControlMessage {
    /// Build a message from its three bytes.
    pub const fn new(status: u8, data1: u8, data2: u8) -> Self {
        Self {
            status,
            data1,
            data2,
        }
    }

    /// Decode a raw message. Anything other than exactly three bytes is
    /// rejected.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match *bytes {
            [status, data1, data2] => Some(Self::new(status, data1, data2)),
            _ => None,
        }
    }

    /// Note-on, channel 1.
    pub const fn note_on(key: u8, velocity: u8) -> Self {
        Self::new(NOTE_ON, key, velocity)
    }

    /// Note-off, channel 1.
    pub const fn note_off(key: u8) -> Self {
        Self::new(NOTE_OFF, key, 0)
    }

    /// Control change on channel 1.
    pub const fn control_change(controller: u8, value: u8) -> Self {
        Self::new(CONTROL_CHANGE, controller, value)
    }
}

/// Which envelope a parameter change targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnvelopeTarget {
    /// The amplitude envelope.
    Volume,
    /// The filter-cutoff envelope.
    Filter,
}

/// Which envelope parameter a change targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnvelopeParam {
    /// Attack time in seconds.
    Attack,
    /// Decay time in seconds.
    Decay,
    /// Sustain level.
    Sustain,
    /// Release time in seconds.
    Release,
}

/// A synthesis command, values in engine units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Start a note.
    NoteOn {
        /// MIDI key number.
        key: u8,
        /// Velocity, 1..=127.
        velocity: u8,
    },
    /// Release every voice holding `key`.
    NoteOff {
        /// MIDI key number.
        key: u8,
    },
    /// Set both pair blends to `0.5 + 0.5·v`, leaning toward sine/triangle.
    WaveMixUp(f32),
    /// Set both pair blends to `1 - v`, leaning toward square/sawtooth.
    WaveMixDown(f32),
    /// Set the blend between the two waveform pairs.
    WaveBlend(f32),
    /// Change one envelope parameter on every voice.
    Envelope {
        /// Volume or filter envelope.
        target: EnvelopeTarget,
        /// Parameter to change.
        param: EnvelopeParam,
        /// Seconds for times, level for sustain.
        value: f32,
    },
    /// Cutoff knob position in `[0, 1]`, mapped exponentially against the
    /// current maximum cutoff.
    Cutoff(f32),
    /// Ladder resonance K.
    Resonance(f32),
    /// Maximum cutoff in Hz reached by the cutoff knob.
    MaxCutoff(f32),
    /// Ladder response type.
    FilterMode(LadderMode),
    /// Freeze or unfreeze the wave-mix parameters.
    ToggleHold,
    /// Tremolo LFO rate in Hz.
    TremoloRate(f32),
    /// Tremolo LFO depth.
    TremoloDepth(f32),
    /// Tremolo LFO waveform.
    TremoloShape(Waveform),
    /// Cutoff LFO rate in Hz.
    CutoffLfoRate(f32),
    /// Cutoff LFO depth.
    CutoffLfoDepth(f32),
}

impl Command {
    /// Look a message up in the controller map.
    ///
    /// Returns `None` for messages the instrument does not respond to. A
    /// note-on with velocity 0 is a note-off. Pad messages with velocity 0
    /// are pad releases and are ignored.
    pub fn from_message(msg: ControlMessage) -> Option<Command> {
        let v = f32::from(msg.data2);
        let unit = v / MAX_DATA;

        let command = match (msg.status, msg.data1) {
            (NOTE_ON, key) if msg.data2 > 0 => Command::NoteOn {
                key,
                velocity: msg.data2,
            },
            (NOTE_ON | NOTE_OFF, key) => Command::NoteOff { key },

            (CONTROL_CHANGE, 1) => Command::WaveMixUp(unit),
            (CONTROL_CHANGE, 74) => Command::WaveMixDown(unit),
            (CONTROL_CHANGE, 71) => volume(EnvelopeParam::Release, v * 0.05),
            (CONTROL_CHANGE, 73) => volume(EnvelopeParam::Attack, unit),
            (CONTROL_CHANGE, 75) => volume(EnvelopeParam::Decay, unit),
            (CONTROL_CHANGE, 72) => volume(EnvelopeParam::Sustain, unit),
            (CONTROL_CHANGE, 76) => Command::Cutoff(unit),
            (CONTROL_CHANGE, 77) => Command::Resonance(v * 0.0315),
            (CONTROL_CHANGE, 78) => Command::MaxCutoff(v * 78.7),

            (PITCH_BEND, _) => Command::WaveBlend(unit),

            (PAD_NOTE_ON_10 | PAD_NOTE_ON_2, _) if msg.data2 == 0 => return None,
            (PAD_NOTE_ON_10, 36) => Command::FilterMode(LadderMode::Lp4),
            (PAD_NOTE_ON_10, 40) => Command::FilterMode(LadderMode::Lp2),
            (PAD_NOTE_ON_10, 43) => Command::FilterMode(LadderMode::Hp4),
            (PAD_NOTE_ON_10, 42) => Command::FilterMode(LadderMode::Bp4),
            (PAD_NOTE_ON_10, 46) => Command::FilterMode(LadderMode::Bp2),
            (PAD_NOTE_ON_10, 45) => Command::FilterMode(LadderMode::Hp2),
            (PAD_NOTE_ON_10, 48) => Command::ToggleHold,

            (CONTROL_CHANGE_2, 10) => Command::TremoloRate(v * 0.1575),
            (CONTROL_CHANGE_2, 91) => Command::TremoloDepth(v * 0.0787),
            (CONTROL_CHANGE_2, 12) => Command::CutoffLfoRate(v * 0.1575),
            (CONTROL_CHANGE_2, 93) => Command::CutoffLfoDepth(v * 0.004),
            (CONTROL_CHANGE_2, 7) => filter(EnvelopeParam::Attack, unit),
            (CONTROL_CHANGE_2, 1) => filter(EnvelopeParam::Decay, unit + 0.008),
            (CONTROL_CHANGE_2, 71) => filter(EnvelopeParam::Sustain, unit + 0.008),
            (CONTROL_CHANGE_2, 74) => filter(EnvelopeParam::Release, v * 0.0315 + 0.008),

            (PAD_NOTE_ON_2, 49) => Command::TremoloShape(Waveform::Sine),
            (PAD_NOTE_ON_2, 56) => Command::TremoloShape(Waveform::Sawtooth),
            (PAD_NOTE_ON_2, 50) => Command::TremoloShape(Waveform::Triangle),

            _ => return None,
        };
        Some(command)
    }
}

fn volume(param: EnvelopeParam, value: f32) -> Command {
    Command::Envelope {
        target: EnvelopeTarget::Volume,
        param,
        value,
    }
}

fn filter(param: EnvelopeParam, value: f32) -> Command {
    Command::Envelope {
        target: EnvelopeTarget::Filter,
        param,
        value,
    }
}
