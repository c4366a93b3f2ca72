//! Raw MIDI input.
//!
//! A MIDI device node (`/dev/snd/midiC1D0` on Linux) yields a plain byte
//! stream. [`MidiDecoder`] reassembles it into three-byte channel messages,
//! following running status and stepping over real-time, system-common and
//! SysEx traffic. [`MidiInput`] runs the decoder on a dedicated thread and
//! forwards each message into a channel for the audio thread to drain.

use crate::{Error, Result};
use crossbeam_channel::Sender;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use vecsynth_synth::ControlMessage;

/// Bytes read from the device per call.
const READ_CHUNK: usize = 64;

/// Directories scanned for MIDI device nodes.
const MIDI_DEVICE_DIRS: [&str; 2] = ["/dev/snd", "/dev"];

/// Incremental MIDI byte-stream decoder.
#[derive(Debug, Clone, Default)]
pub struct MidiDecoder {
    status: Option<u8>,
    data: [u8; 2],
    len: usize,
    in_sysex: bool,
    dropped: u64,
}

impl MidiDecoder {
    /// Create a decoder with no running status.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte. Returns a message when one is complete.
    ///
    /// Program change and channel pressure carry a single data byte and are
    /// consumed without producing a message.
    pub fn push(&mut self, byte: u8) -> Option<ControlMessage> {
        match byte {
            // Real-time bytes may appear anywhere, even mid-message
            0xF8..=0xFF => None,
            0xF0 => {
                self.in_sysex = true;
                self.status = None;
                None
            }
            0xF7 => {
                self.in_sysex = false;
                None
            }
            // System common cancels running status
            0xF1..=0xF6 => {
                self.in_sysex = false;
                self.status = None;
                self.len = 0;
                None
            }
            0x80..=0xEF => {
                self.in_sysex = false;
                self.status = Some(byte);
                self.len = 0;
                None
            }
            _ => self.push_data(byte),
        }
    }

    /// Feed a slice of bytes, yielding every completed message.
    pub fn feed<'a>(&'a mut self, bytes: &'a [u8]) -> impl Iterator<Item = ControlMessage> + 'a {
        bytes.iter().filter_map(move |&b| self.push(b))
    }

    /// Data bytes discarded so far (SysEx payloads, system-common data,
    /// bytes with no status).
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Forget running status and any partial message.
    pub fn reset(&mut self) {
        self.status = None;
        self.len = 0;
        self.in_sysex = false;
    }

    fn push_data(&mut self, byte: u8) -> Option<ControlMessage> {
        let status = match self.status {
            Some(status) if !self.in_sysex => status,
            _ => {
                self.dropped += 1;
                return None;
            }
        };

        self.data[self.len] = byte;
        self.len += 1;
        if self.len < data_len(status) {
            return None;
        }
        self.len = 0;

        match data_len(status) {
            2 => Some(ControlMessage::new(status, self.data[0], self.data[1])),
            _ => None,
        }
    }
}

/// Number of data bytes following a channel status byte.
fn data_len(status: u8) -> usize {
    match status & 0xF0 {
        0xC0 | 0xD0 => 1,
        _ => 2,
    }
}

/// A MIDI source read on a background thread.
pub struct MidiInput {
    name: String,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl MidiInput {
    /// Open a raw MIDI device node and start reading it.
    pub fn open(path: impl AsRef<Path>, sender: Sender<ControlMessage>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::MidiDevice {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(device = %path.display(), "MIDI input opened");
        Self::from_reader(file, path.display().to_string(), sender)
    }

    /// Read MIDI bytes from any reader on a background thread.
    pub fn from_reader<R>(
        reader: R,
        name: impl Into<String>,
        sender: Sender<ControlMessage>,
    ) -> Result<Self>
    where
        R: Read + Send + 'static,
    {
        let name = name.into();
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);
        let thread_name = name.clone();

        let handle = std::thread::Builder::new()
            .name("vecsynth-midi".to_string())
            .spawn(move || read_loop(reader, &thread_name, &sender, &thread_running))?;

        Ok(Self {
            name,
            running,
            handle: Some(handle),
        })
    }

    /// Device name or path.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True once the reader thread has exited (end of stream or error).
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Ask the reader thread to stop after its current read.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Wait for the reader thread to exit.
    ///
    /// Only returns once the underlying reader reaches end of stream or
    /// fails; a live device blocks in `read` until the next byte arrives.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!(device = %self.name, "MIDI reader thread panicked");
        }
    }
}

impl Drop for MidiInput {
    fn drop(&mut self) {
        self.stop();
    }
}

fn read_loop<R: Read>(
    mut reader: R,
    name: &str,
    sender: &Sender<ControlMessage>,
    running: &AtomicBool,
) {
    let mut decoder = MidiDecoder::new();
    let mut buf = [0u8; READ_CHUNK];

    while running.load(Ordering::SeqCst) {
        let n = match reader.read(&mut buf) {
            Ok(0) => {
                tracing::info!(device = name, "MIDI input closed");
                break;
            }
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!(device = name, error = %e, "MIDI read failed");
                break;
            }
        };

        let dropped_before = decoder.dropped();
        for msg in decoder.feed(&buf[..n]) {
            tracing::debug!(
                status = msg.status,
                data1 = msg.data1,
                data2 = msg.data2,
                "MIDI message"
            );
            if sender.send(msg).is_err() {
                tracing::debug!(device = name, "engine gone, MIDI reader exiting");
                return;
            }
        }
        let dropped = decoder.dropped() - dropped_before;
        if dropped > 0 {
            tracing::warn!(device = name, dropped, "discarded MIDI bytes");
        }
    }
}

/// MIDI device nodes on this system, e.g. `/dev/snd/midiC1D0`.
pub fn list_midi_devices() -> Vec<PathBuf> {
    MIDI_DEVICE_DIRS
        .iter()
        .flat_map(|dir| midi_devices_in(Path::new(dir)))
        .collect()
}

/// Entries of `dir` whose names start with `midi`, sorted.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn midi_devices_in(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut devices: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("midi"))
        .map(|entry| entry.path())
        .collect();
    devices.sort();
    devices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Vec<ControlMessage> {
        MidiDecoder::new().feed(bytes).collect()
    }

    #[test]
    fn test_decodes_complete_messages() {
        let msgs = decode(&[0x90, 60, 100, 0xB0, 74, 10]);
        assert_eq!(
            msgs,
            vec![
                ControlMessage::new(0x90, 60, 100),
                ControlMessage::new(0xB0, 74, 10)
            ]
        );
    }

    #[test]
    fn test_running_status() {
        let msgs = decode(&[0x90, 60, 100, 64, 100, 60, 0]);
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[1], ControlMessage::new(0x90, 64, 100));
        assert_eq!(msgs[2], ControlMessage::new(0x90, 60, 0));
    }

    #[test]
    fn test_realtime_bytes_ignored_mid_message() {
        let msgs = decode(&[0xB0, 0xF8, 76, 0xFE, 90]);
        assert_eq!(msgs, vec![ControlMessage::new(0xB0, 76, 90)]);
    }

    #[test]
    fn test_sysex_discarded() {
        let mut decoder = MidiDecoder::new();
        let msgs: Vec<_> = decoder
            .feed(&[0x90, 60, 100, 0xF0, 0x7E, 0x7F, 0x06, 0x01, 0xF7, 62, 100])
            .collect();
        assert_eq!(msgs, vec![ControlMessage::new(0x90, 60, 100)]);
        // SysEx payload plus the orphaned data after it
        assert_eq!(decoder.dropped(), 6);
    }

    #[test]
    fn test_two_byte_messages_dropped() {
        let msgs = decode(&[0xC0, 5, 0xD0, 64, 0x80, 60, 0]);
        assert_eq!(msgs, vec![ControlMessage::new(0x80, 60, 0)]);
    }

    #[test]
    fn test_program_change_running_status() {
        // Each data byte is its own program change
        let msgs = decode(&[0xC0, 1, 2, 3, 0xE0, 0, 64]);
        assert_eq!(msgs, vec![ControlMessage::new(0xE0, 0, 64)]);
    }

    #[test]
    fn test_system_common_cancels_running_status() {
        let mut decoder = MidiDecoder::new();
        let msgs: Vec<_> = decoder.feed(&[0x90, 60, 100, 0xF3, 5, 62, 100]).collect();
        assert_eq!(msgs.len(), 1);
        assert_eq!(decoder.dropped(), 3);
    }

    #[test]
    fn test_split_across_reads() {
        let mut decoder = MidiDecoder::new();
        assert_eq!(decoder.feed(&[0xB1, 10]).count(), 0);
        let msgs: Vec<_> = decoder.feed(&[127]).collect();
        assert_eq!(msgs, vec![ControlMessage::new(0xB1, 10, 127)]);
    }

    #[test]
    fn test_new_status_discards_partial_message() {
        let msgs = decode(&[0x90, 60, 0xB0, 1, 64]);
        assert_eq!(msgs, vec![ControlMessage::new(0xB0, 1, 64)]);
    }

    #[test]
    fn test_reset() {
        let mut decoder = MidiDecoder::new();
        assert_eq!(decoder.feed(&[0x90, 60]).count(), 0);
        decoder.reset();
        assert_eq!(decoder.feed(&[100, 60, 100]).count(), 0);
    }

    #[test]
    fn test_reader_thread_forwards_messages() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let bytes = std::io::Cursor::new(vec![0x90, 48, 100, 0xF8, 48, 0]);
        let input = MidiInput::from_reader(bytes, "cursor", tx).unwrap();
        assert_eq!(input.name(), "cursor");
        input.join();

        let msgs: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            msgs,
            vec![
                ControlMessage::new(0x90, 48, 100),
                ControlMessage::new(0x90, 48, 0)
            ]
        );
    }

    #[test]
    fn test_open_missing_device() {
        let (tx, _rx) = crossbeam_channel::unbounded();
        let err = MidiInput::open("/nonexistent/midiC9D9", tx)
            .err()
            .expect("missing device must fail");
        assert!(matches!(err, Error::MidiDevice { .. }));
        assert!(err.to_string().contains("/nonexistent/midiC9D9"));
    }

    #[test]
    fn test_midi_devices_in() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("midiC1D0"), "").unwrap();
        std::fs::write(dir.path().join("midiC0D0"), "").unwrap();
        std::fs::write(dir.path().join("pcmC0D0p"), "").unwrap();

        let devices = midi_devices_in(dir.path());
        let names: Vec<_> = devices
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["midiC0D0", "midiC1D0"]);
    }

    #[test]
    fn test_midi_devices_in_missing_dir() {
        assert!(midi_devices_in(Path::new("/nonexistent/path/12345")).is_empty());
    }
}
