//! The audio-thread side of the player.
//!
//! [`SynthEngine`] owns the voice pool. Control messages from the MIDI
//! thread arrive over a channel and are applied at the start of each buffer,
//! so no voice state is ever touched mid-buffer from another thread.

use crossbeam_channel::Receiver;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use vecsynth_synth::{ControlMessage, VoiceManager};

/// Shared flags for steering a running [`SynthEngine`] from other threads.
#[derive(Debug, Clone, Default)]
pub struct EngineHandle {
    release_all: Arc<AtomicBool>,
    active_voices: Arc<AtomicUsize>,
}

impl EngineHandle {
    /// Ask the engine to release every sounding voice at its next buffer.
    pub fn release_all(&self) {
        self.release_all.store(true, Ordering::SeqCst);
    }

    /// Voices sounding at the end of the last rendered buffer.
    pub fn active_voices(&self) -> usize {
        self.active_voices.load(Ordering::Relaxed)
    }
}

/// Voice pool plus the receiving end of the control channel.
pub struct SynthEngine<const N: usize> {
    synth: VoiceManager<N>,
    controls: Receiver<ControlMessage>,
    handle: EngineHandle,
}

impl<const N: usize> SynthEngine<N> {
    /// Create an engine at `sample_rate` reading messages from `controls`.
    pub fn new(sample_rate: f32, controls: Receiver<ControlMessage>) -> Self {
        Self::with_synth(VoiceManager::new(sample_rate), controls)
    }

    /// Wrap an already configured voice pool.
    pub fn with_synth(synth: VoiceManager<N>, controls: Receiver<ControlMessage>) -> Self {
        Self {
            synth,
            controls,
            handle: EngineHandle::default(),
        }
    }

    /// A handle for other threads.
    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    /// The voice pool.
    pub fn synth(&self) -> &VoiceManager<N> {
        &self.synth
    }

    /// Mutable access to the voice pool.
    pub fn synth_mut(&mut self) -> &mut VoiceManager<N> {
        &mut self.synth
    }

    /// Apply every queued control message without blocking.
    ///
    /// Returns the number of messages applied.
    pub fn drain_controls(&mut self) -> usize {
        let mut applied = 0;
        for msg in self.controls.try_iter() {
            self.synth.handle_message(msg);
            applied += 1;
        }
        if self.handle.release_all.swap(false, Ordering::SeqCst) {
            self.synth.release_all();
        }
        applied
    }

    /// Fill an interleaved buffer of `channels` channels.
    ///
    /// Queued messages are applied first; the mono voice mix is then copied
    /// to every channel of each frame. Returns the number of messages
    /// applied.
    pub fn render(&mut self, out: &mut [f32], channels: usize) -> usize {
        let applied = self.drain_controls();
        let channels = channels.max(1);

        for frame in out.chunks_mut(channels) {
            frame.fill(self.synth.process());
        }

        self.handle
            .active_voices
            .store(self.synth.active_voice_count(), Ordering::Relaxed);
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_render_applies_queued_messages_first() {
        let (tx, rx) = unbounded();
        let mut engine = SynthEngine::<4>::new(48000.0, rx);

        tx.send(ControlMessage::note_on(60, 100)).unwrap();
        tx.send(ControlMessage::note_on(64, 100)).unwrap();

        let mut out = vec![0.0f32; 512];
        assert_eq!(engine.render(&mut out, 2), 2);
        assert_eq!(engine.synth().active_voice_count(), 2);
        assert_eq!(engine.handle().active_voices(), 2);
        assert!(out.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn test_channels_carry_same_frame() {
        let (tx, rx) = unbounded();
        let mut engine = SynthEngine::<2>::new(48000.0, rx);
        tx.send(ControlMessage::note_on(69, 127)).unwrap();

        let mut out = vec![0.0f32; 300];
        engine.render(&mut out, 3);
        for frame in out.chunks(3) {
            assert_eq!(frame[0], frame[1]);
            assert_eq!(frame[0], frame[2]);
        }
    }

    #[test]
    fn test_zero_channels_treated_as_mono() {
        let (_tx, rx) = unbounded();
        let mut engine = SynthEngine::<2>::new(48000.0, rx);
        let mut out = vec![1.0f32; 16];
        engine.render(&mut out, 0);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_release_all_through_handle() {
        let (tx, rx) = unbounded();
        let mut engine = SynthEngine::<4>::new(48000.0, rx);
        tx.send(ControlMessage::note_on(60, 100)).unwrap();
        let mut out = vec![0.0f32; 64];
        engine.render(&mut out, 1);

        engine.handle().release_all();
        engine.render(&mut out, 1);
        assert!(
            engine
                .synth()
                .voices()
                .iter()
                .filter(|v| v.is_active())
                .all(|v| v.volume_env.stage() == vecsynth_synth::EnvelopeStage::Release)
        );
    }

    #[test]
    fn test_disconnected_sender_is_harmless() {
        let (tx, rx) = unbounded();
        let mut engine = SynthEngine::<2>::new(48000.0, rx);
        drop(tx);
        let mut out = vec![0.0f32; 64];
        assert_eq!(engine.render(&mut out, 2), 0);
    }
}
