//! Real-time audio output via cpal.

use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// How often the blocking [`OutputStream::run`] checks its running flag.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Extract device name via `description()` (cpal 0.17+).
pub(crate) fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Output device information.
#[derive(Debug, Clone)]
pub struct AudioDevice {
    /// Position in the host's output device list.
    pub index: usize,
    /// Human-readable device name.
    pub name: String,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
    /// Default channel count.
    pub channels: u16,
    /// Whether this is the host's default output.
    pub is_default: bool,
}

/// Output stream configuration.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Buffer size in frames.
    pub buffer_size: u32,
    /// Output device index or name (uses default if `None`).
    pub output_device: Option<String>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            buffer_size: 256,
            output_device: None,
        }
    }
}

/// List all output devices.
pub fn list_devices() -> Result<Vec<AudioDevice>> {
    let host = cpal::default_host();
    let default_name = host
        .default_output_device()
        .and_then(|d| device_name(&d).ok());

    let outputs = host
        .output_devices()
        .map_err(|e| Error::Stream(e.to_string()))?;

    let devices = outputs
        .enumerate()
        .filter_map(|(index, device)| {
            let name = device_name(&device).ok()?;
            let (default_sample_rate, channels) = device
                .default_output_config()
                .map(|c| (c.sample_rate(), c.channels()))
                .unwrap_or((48000, 2));
            Some(AudioDevice {
                index,
                is_default: default_name.as_deref() == Some(name.as_str()),
                name,
                default_sample_rate,
                channels,
            })
        })
        .collect();

    Ok(devices)
}

/// Get the default output device info.
pub fn default_output_device() -> Option<AudioDevice> {
    let device = cpal::default_host().default_output_device()?;
    let name = device_name(&device).ok()?;
    let (default_sample_rate, channels) = device
        .default_output_config()
        .map(|c| (c.sample_rate(), c.channels()))
        .unwrap_or((48000, 2));
    Some(AudioDevice {
        index: 0,
        name,
        default_sample_rate,
        channels,
        is_default: true,
    })
}

/// Real-time output stream.
pub struct OutputStream {
    device: Device,
    config: StreamConfig,
    running: Arc<AtomicBool>,
    _stream: Option<Stream>,
}

impl OutputStream {
    /// Open the configured output device.
    pub fn new(config: StreamConfig) -> Result<Self> {
        let host = cpal::default_host();

        let device = match &config.output_device {
            Some(name) => {
                let devices: Vec<_> = host
                    .output_devices()
                    .map_err(|e| Error::Stream(e.to_string()))?
                    .collect();
                find_device_from_list(&devices, name)?
            }
            None => host.default_output_device().ok_or(Error::NoDevice)?,
        };

        let name = device_name(&device).unwrap_or_default();
        tracing::info!(
            device = %name,
            sample_rate = config.sample_rate,
            buffer_size = config.buffer_size,
            "output device selected"
        );

        Ok(Self {
            device,
            config,
            running: Arc::new(AtomicBool::new(true)),
            _stream: None,
        })
    }

    /// Get the configured sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// Get the output device channel count.
    pub fn output_channels(&self) -> u16 {
        self.device
            .default_output_config()
            .map(|c| c.channels())
            .unwrap_or(2)
    }

    /// The flag [`OutputStream::run`] polls. It is set from construction, so
    /// clearing it from any thread before or during `run` makes `run` return.
    pub fn running_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Run the stream with a callback filling interleaved output buffers.
    ///
    /// Blocks until the stream is stopped. Returns at once if it was
    /// stopped before `run` was called.
    pub fn run<F>(&mut self, mut generate: F) -> Result<()>
    where
        F: FnMut(&mut [f32]) + Send + 'static,
    {
        if !self.is_running() {
            tracing::info!("stop requested before output stream start");
            return Ok(());
        }

        let stream_config = cpal::StreamConfig {
            channels: self.output_channels(),
            sample_rate: self.config.sample_rate,
            buffer_size: cpal::BufferSize::Fixed(self.config.buffer_size),
        };

        let output_running = Arc::clone(&self.running);
        let stream = self
            .device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if output_running.load(Ordering::Relaxed) {
                        generate(data);
                    } else {
                        data.fill(0.0);
                    }
                },
                |err| tracing::warn!(error = %err, "output stream error"),
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        tracing::info!(channels = stream_config.channels, "output stream started");
        self._stream = Some(stream);

        wait_until_stopped(&self.running);

        self._stream = None;
        tracing::info!("output stream stopped");
        Ok(())
    }

    /// Stop the stream.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// False once [`OutputStream::stop`] was called or the running flag was
    /// cleared.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Block until `running` is cleared.
fn wait_until_stopped(running: &AtomicBool) {
    while running.load(Ordering::SeqCst) {
        std::thread::sleep(POLL_INTERVAL);
    }
}

/// Find a device from a list by index, exact name, or fuzzy match.
///
/// The `name_or_index` can be:
/// - A numeric index (e.g., "0", "1")
/// - An exact device name
/// - A partial device name (case-insensitive)
fn find_device_from_list(devices: &[Device], name_or_index: &str) -> Result<Device> {
    let names: Vec<Option<String>> = devices.iter().map(|d| device_name(d).ok()).collect();
    let index = select_device(&names, name_or_index)?;
    devices
        .get(index)
        .cloned()
        .ok_or_else(|| Error::DeviceNotFound(name_or_index.to_string()))
}

/// Pick a device position from its names. Unnamed devices only match by
/// index.
fn select_device(names: &[Option<String>], name_or_index: &str) -> Result<usize> {
    if let Ok(index) = name_or_index.parse::<usize>() {
        return if index < names.len() {
            Ok(index)
        } else {
            Err(Error::DeviceNotFound(format!(
                "output device index {} (only {} devices available)",
                index,
                names.len()
            )))
        };
    }

    if let Some(index) = names
        .iter()
        .position(|n| n.as_deref() == Some(name_or_index))
    {
        return Ok(index);
    }

    let search_lower = name_or_index.to_lowercase();
    let matches: Vec<(usize, &str)> = names
        .iter()
        .enumerate()
        .filter_map(|(i, n)| {
            n.as_deref()
                .filter(|name| name.to_lowercase().contains(&search_lower))
                .map(|name| (i, name))
        })
        .collect();

    match matches.as_slice() {
        [] => Err(Error::DeviceNotFound(format!(
            "no output device matching '{}'",
            name_or_index
        ))),
        [(index, _)] => Ok(*index),
        [(index, first), ..] => {
            let all: Vec<_> = matches.iter().map(|(_, n)| *n).collect();
            tracing::warn!(
                search = name_or_index,
                matches = ?all,
                "multiple output devices match, using {first}"
            );
            Ok(*index)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<Option<String>> {
        list.iter().map(|n| Some(n.to_string())).collect()
    }

    #[test]
    fn test_select_by_index() {
        let devices = names(&["Speakers", "USB Audio"]);
        assert_eq!(select_device(&devices, "1").unwrap(), 1);
        assert!(matches!(
            select_device(&devices, "2"),
            Err(Error::DeviceNotFound(_))
        ));
    }

    #[test]
    fn test_select_exact_before_partial() {
        let devices = names(&["USB Audio Pro", "USB Audio"]);
        assert_eq!(select_device(&devices, "USB Audio").unwrap(), 1);
    }

    #[test]
    fn test_select_partial_case_insensitive() {
        let devices = names(&["Built-in Speakers", "Focusrite USB"]);
        assert_eq!(select_device(&devices, "focusrite").unwrap(), 1);
    }

    #[test]
    fn test_select_ambiguous_uses_first() {
        let devices = names(&["HDMI 1", "HDMI 2"]);
        assert_eq!(select_device(&devices, "hdmi").unwrap(), 0);
    }

    #[test]
    fn test_select_skips_unnamed() {
        let devices = vec![None, Some("Speakers".to_string())];
        assert_eq!(select_device(&devices, "speak").unwrap(), 1);
        assert!(select_device(&devices, "nothing").is_err());
    }

    #[test]
    fn test_list_devices_does_not_panic() {
        // Device availability depends on the system
        let _ = list_devices();
        let _ = default_output_device();
    }

    #[test]
    fn test_wait_returns_when_cleared_before_start() {
        let running = AtomicBool::new(true);
        running.store(false, Ordering::SeqCst);
        wait_until_stopped(&running);
        assert!(!running.load(Ordering::SeqCst));
    }

    #[test]
    fn test_wait_returns_when_cleared_from_other_thread() {
        let running = Arc::new(AtomicBool::new(true));
        let remote = Arc::clone(&running);
        let stopper = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            remote.store(false, Ordering::SeqCst);
        });
        wait_until_stopped(&running);
        stopper.join().unwrap();
        assert!(!running.load(Ordering::SeqCst));
    }

    #[test]
    fn test_default_stream_config() {
        let config = StreamConfig::default();
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.buffer_size, 256);
        assert!(config.output_device.is_none());
    }
}
