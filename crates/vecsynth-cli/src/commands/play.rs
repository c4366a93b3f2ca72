//! Real-time synthesis command.

use crate::demo;
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use vecsynth_config::{Overrides, Settings, settings_path};
use vecsynth_io::{MidiInput, OutputStream, StreamConfig, SynthEngine};
use vecsynth_synth::DEFAULT_POLYPHONY;

/// Longest wait for release tails after Ctrl+C.
const RELEASE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Args)]
pub struct PlayArgs {
    /// Raw MIDI device node (e.g. /dev/snd/midiC1D0)
    #[arg(short, long)]
    midi: Option<PathBuf>,

    /// Play a scripted chord and arpeggio sequence instead of live MIDI
    #[arg(long)]
    demo: bool,

    /// Output device (index, exact name, or partial name)
    #[arg(short, long)]
    output_device: Option<String>,

    /// Sample rate in Hz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Buffer size in frames
    #[arg(long)]
    buffer_size: Option<u32>,

    /// Settings file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Settings from `path` (or the user settings file) with flags applied.
fn resolve_settings(path: Option<&Path>, overrides: Overrides) -> anyhow::Result<Settings> {
    let mut settings = match path {
        Some(path) => Settings::load(path)?,
        None => Settings::load_or_default(settings_path())?,
    };
    settings.apply(overrides)?;
    Ok(settings)
}

pub fn run(args: PlayArgs) -> anyhow::Result<()> {
    let settings = resolve_settings(
        args.config.as_deref(),
        Overrides {
            sample_rate: args.sample_rate,
            buffer_size: args.buffer_size,
            output_device: args.output_device,
            midi_device: args.midi,
        },
    )?;

    if settings.midi.device.is_none() && !args.demo {
        anyhow::bail!(
            "no input: pass --midi <PATH>, set [midi] device in the settings file, or use --demo"
        );
    }

    let (tx, rx) = crossbeam_channel::unbounded();

    let mut stream = OutputStream::new(StreamConfig {
        sample_rate: settings.audio.sample_rate,
        buffer_size: settings.audio.buffer_size,
        output_device: settings.audio.output_device.clone(),
    })?;
    let channels = usize::from(stream.output_channels());

    let mut engine = SynthEngine::<DEFAULT_POLYPHONY>::new(stream.sample_rate() as f32, rx);
    let handle = engine.handle();

    let midi = settings
        .midi
        .device
        .as_ref()
        .map(|path| MidiInput::open(path, tx.clone()))
        .transpose()?;

    let playing = Arc::new(AtomicBool::new(true));
    let demo_thread = if args.demo {
        Some(demo::spawn(tx.clone(), Arc::clone(&playing))?)
    } else {
        None
    };
    drop(tx);

    let running = stream.running_handle();
    let release_handle = handle.clone();
    let release_playing = Arc::clone(&playing);
    ctrlc::set_handler(move || {
        println!("\nStopping...");
        release_playing.store(false, Ordering::SeqCst);
        release_handle.release_all();

        let start = Instant::now();
        while release_handle.active_voices() > 0 && start.elapsed() < RELEASE_TIMEOUT {
            std::thread::sleep(Duration::from_millis(10));
        }
        running.store(false, Ordering::SeqCst);
    })?;

    println!(
        "Playing at {} Hz, {} frames, {} voice(s). Press Ctrl+C to stop.",
        settings.audio.sample_rate, settings.audio.buffer_size, DEFAULT_POLYPHONY
    );
    if let Some(input) = &midi {
        println!("MIDI input: {}", input.name());
    }

    stream.run(move |data: &mut [f32]| {
        engine.render(data, channels);
    })?;

    playing.store(false, Ordering::SeqCst);
    if let Some(thread) = demo_thread
        && thread.join().is_err()
    {
        tracing::warn!("demo thread panicked");
    }
    if let Some(input) = midi {
        input.stop();
        tracing::debug!(device = %input.name(), "MIDI input released");
    }

    tracing::info!(active_voices = handle.active_voices(), "playback finished");
    Ok(())
}
