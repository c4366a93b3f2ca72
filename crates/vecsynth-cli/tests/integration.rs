//! Integration tests for the `vecsynth` binary.
//!
//! Only paths that fail or finish before an audio device is opened are
//! exercised here; real-time playback depends on the host.

use std::process::Command;
use tempfile::TempDir;

/// Helper to get the path to the `vecsynth` binary built by cargo.
fn vecsynth_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_vecsynth"))
}

// ---------------------------------------------------------------------------
// Help and version
// ---------------------------------------------------------------------------

#[test]
fn cli_help_lists_commands() {
    let output = vecsynth_bin()
        .arg("--help")
        .output()
        .expect("failed to run vecsynth --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for cmd in ["play", "devices", "controls"] {
        assert!(stdout.contains(cmd), "help should mention '{cmd}'");
    }
}

#[test]
fn cli_version_works() {
    let output = vecsynth_bin()
        .arg("--version")
        .output()
        .expect("failed to run vecsynth --version");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("vecsynth"));
}

// ---------------------------------------------------------------------------
// `vecsynth controls`
// ---------------------------------------------------------------------------

#[test]
fn cli_controls_prints_map() {
    let output = vecsynth_bin()
        .arg("controls")
        .output()
        .expect("failed to run vecsynth controls");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Controller Map"));
    assert!(stdout.contains("0xB1"));
    assert!(stdout.contains("Toggle mix hold"));
    assert!(stdout.contains("Pitch wheel"));
}

// ---------------------------------------------------------------------------
// `vecsynth play` argument and settings errors
// ---------------------------------------------------------------------------

#[test]
fn cli_play_without_input_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("settings.toml");
    std::fs::write(&config, "[audio]\nsample_rate = 48000\n").unwrap();

    let output = vecsynth_bin()
        .args(["play", "--config"])
        .arg(&config)
        .output()
        .expect("failed to run vecsynth play");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no input"), "stderr: {stderr}");
}

#[test]
fn cli_play_rejects_bad_sample_rate() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("settings.toml");
    std::fs::write(&config, "").unwrap();

    let output = vecsynth_bin()
        .args(["play", "--demo", "--sample-rate", "100", "--config"])
        .arg(&config)
        .output()
        .expect("failed to run vecsynth play");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("sample_rate"), "stderr: {stderr}");
}

#[test]
fn cli_play_rejects_malformed_settings() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("settings.toml");
    std::fs::write(&config, "[audio\nsample_rate = ").unwrap();

    let output = vecsynth_bin()
        .args(["play", "--demo", "--config"])
        .arg(&config)
        .output()
        .expect("failed to run vecsynth play");

    assert!(!output.status.success());
}

#[test]
fn cli_play_missing_midi_device_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("settings.toml");
    std::fs::write(&config, "").unwrap();
    let missing = dir.path().join("midiC9D9");

    let output = vecsynth_bin()
        .args(["play", "--config"])
        .arg(&config)
        .arg("--midi")
        .arg(&missing)
        .output()
        .expect("failed to run vecsynth play");

    // Fails either opening the output device or the MIDI node
    assert!(!output.status.success());
}
