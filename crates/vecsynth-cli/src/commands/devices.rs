//! Audio and MIDI device listing command.

use clap::{Args, Subcommand};
use vecsynth_io::{default_output_device, list_devices, list_midi_devices};

#[derive(Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    command: Option<DevicesCommand>,
}

#[derive(Subcommand)]
enum DevicesCommand {
    /// List audio outputs and raw MIDI device nodes
    List,

    /// Show the default output device
    Info,
}

pub fn run(args: DevicesArgs) -> anyhow::Result<()> {
    match args.command.unwrap_or(DevicesCommand::List) {
        DevicesCommand::List => {
            let outputs = list_devices()?;

            println!("Output Devices");
            println!("==============\n");
            if outputs.is_empty() {
                println!("  (none found)");
            }
            for device in &outputs {
                let default = if device.is_default { " (default)" } else { "" };
                println!(
                    "  [{}] {} ({} Hz, {} ch){}",
                    device.index, device.name, device.default_sample_rate, device.channels, default
                );
            }
            println!();

            let midi = list_midi_devices();
            println!("MIDI Inputs");
            println!("===========\n");
            if midi.is_empty() {
                println!("  (none found)");
            }
            for path in &midi {
                println!("  {}", path.display());
            }
            println!();

            println!("Tip: pass a device index or partial name to --output-device,");
            println!("and a MIDI node path to --midi:");
            println!("  vecsynth play --output-device 0 --midi /dev/snd/midiC1D0");
        }

        DevicesCommand::Info => match default_output_device() {
            Some(device) => {
                println!("Default Output:");
                println!("  Name: {}", device.name);
                println!("  Sample Rate: {} Hz", device.default_sample_rate);
                println!("  Channels: {}", device.channels);
            }
            None => println!("Default Output: None"),
        },
    }

    Ok(())
}
