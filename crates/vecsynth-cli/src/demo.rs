//! Scripted performance for `play --demo`.
//!
//! The script is plain controller traffic sent through the same channel a
//! MIDI device would use, so it exercises the full control path.

use crossbeam_channel::Sender;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;
use vecsynth_synth::ControlMessage;

/// One scripted message and the pause that follows it.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    /// Message to send.
    pub msg: ControlMessage,
    /// Milliseconds to wait after sending.
    pub wait_ms: u64,
}

const fn step(status: u8, data1: u8, data2: u8, wait_ms: u64) -> Step {
    Step {
        msg: ControlMessage::new(status, data1, data2),
        wait_ms,
    }
}

/// One pass of the demo. Every note-on is matched by a note-off.
pub const SCRIPT: &[Step] = &[
    // Soft envelope, slow cutoff wobble
    step(0xB0, 73, 6, 0),
    step(0xB0, 71, 40, 0),
    step(0xB0, 72, 90, 0),
    step(0xB1, 12, 8, 0),
    step(0xB1, 93, 60, 0),
    // C minor chord, mix swept toward the triangle/saw pair
    step(0x90, 48, 90, 0),
    step(0x90, 51, 90, 0),
    step(0x90, 55, 90, 400),
    step(0xE0, 0, 32, 400),
    step(0xE0, 0, 96, 400),
    step(0xE0, 0, 127, 800),
    step(0x80, 48, 0, 0),
    step(0x80, 51, 0, 0),
    step(0x80, 55, 0, 600),
    // Resonant two-pole arpeggio with sine tremolo
    step(0x99, 40, 100, 0),
    step(0xB0, 77, 70, 0),
    step(0xB1, 10, 30, 0),
    step(0xB1, 91, 6, 0),
    step(0x91, 49, 100, 0),
    step(0x90, 60, 100, 180),
    step(0x80, 60, 0, 20),
    step(0x90, 63, 100, 180),
    step(0x80, 63, 0, 20),
    step(0x90, 67, 100, 180),
    step(0x80, 67, 0, 20),
    step(0x90, 72, 100, 180),
    step(0x80, 72, 0, 20),
    step(0x90, 67, 100, 180),
    step(0x80, 67, 0, 20),
    step(0x90, 63, 100, 180),
    step(0x80, 63, 0, 600),
    // Back to defaults for the next pass
    step(0x99, 36, 100, 0),
    step(0xB1, 91, 0, 0),
    step(0xE0, 0, 0, 400),
];

/// Play [`SCRIPT`] in a loop on a background thread until `playing` is
/// cleared or the receiver goes away.
pub fn spawn(
    sender: Sender<ControlMessage>,
    playing: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("vecsynth-demo".to_string())
        .spawn(move || {
            tracing::info!(steps = SCRIPT.len(), "demo sequence started");
            'outer: while playing.load(Ordering::SeqCst) {
                for step in SCRIPT {
                    if !playing.load(Ordering::SeqCst) || sender.send(step.msg).is_err() {
                        break 'outer;
                    }
                    if step.wait_ms > 0 {
                        std::thread::sleep(Duration::from_millis(step.wait_ms));
                    }
                }
            }
            tracing::info!("demo sequence stopped");
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecsynth_synth::{Command, VoiceManager};

    #[test]
    fn test_every_step_is_mapped() {
        for step in SCRIPT {
            assert!(
                Command::from_message(step.msg).is_some(),
                "unmapped demo message {:?}",
                step.msg
            );
        }
    }

    #[test]
    fn test_script_leaves_no_held_notes() {
        let mut synth = VoiceManager::<24>::new(48000.0);
        for step in SCRIPT {
            synth.handle_message(step.msg);
        }
        assert!(
            synth
                .voices()
                .iter()
                .filter(|v| v.is_active())
                .all(|v| v.volume_env.stage() == vecsynth_synth::EnvelopeStage::Release),
            "every demo note should be released"
        );
    }

    #[test]
    fn test_spawn_stops_when_receiver_dropped() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let playing = Arc::new(AtomicBool::new(true));
        drop(rx);
        let handle = spawn(tx, playing).unwrap();
        assert!(handle.join().is_ok());
    }

    #[test]
    fn test_spawn_stops_when_flag_cleared() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let playing = Arc::new(AtomicBool::new(false));
        let handle = spawn(tx, Arc::clone(&playing)).unwrap();
        assert!(handle.join().is_ok());
        assert!(rx.try_recv().is_err());
    }
}
