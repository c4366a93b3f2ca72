//! vecsynth CLI - real-time player for the vector synthesizer.

mod commands;
mod demo;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vecsynth")]
#[command(author, version, about = "Polyphonic vector synthesizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the synthesizer from a MIDI device or the built-in demo
    Play(commands::play::PlayArgs),

    /// List audio output and MIDI input devices
    Devices(commands::devices::DevicesArgs),

    /// Print the controller map
    Controls,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => commands::play::run(args),
        Commands::Devices(args) => commands::devices::run(args),
        Commands::Controls => commands::controls::run(),
    }
}
