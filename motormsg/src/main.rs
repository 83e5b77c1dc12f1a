/*!
# Motor Message Generator

Builds the broadcast motor message from a TOML motor table and either prints
it as a hex token stream (for pasting into a terminal tool) or writes it
straight to the access point's serial port.

## Usage

### Print the hex token stream
```bash
motormsg hex
```

### Send over serial and wait for the echo
```bash
motormsg send --port /dev/ttyACM0
```

### Time synchronisation message
```bash
motormsg time 12.5 --send
```

### Inspect a captured hex stream
```bash
motormsg decode --address 00:01 '$FF $FF $00 $01 $F4 $01 $FA $00 $00 $00'
```

### Generate a configuration file
```bash
motormsg config --output motormsg.toml
```
*/

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use motor_frame::protocol::TIME_MSG;
use motor_frame::{
    encode, hex_render, time_sync, transport, DeviceAddress, Frame, SerialTransport, Transport,
};
use tracing::{info, Level};

mod config;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "motormsg")]
#[command(about = "Generate broadcast motor messages for the access point")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "motormsg.toml")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the frame as a hex token stream
    Hex,

    /// Send the frame to the access point over serial
    Send {
        /// Serial port, overriding the configuration
        #[arg(short, long)]
        port: Option<String>,

        /// Baud rate, overriding the configuration
        #[arg(short, long)]
        baud: Option<u32>,

        /// Do not wait for the access point to echo the frame
        #[arg(long)]
        no_reply: bool,
    },

    /// Print (or send) a time synchronisation message
    Time {
        /// Access point clock in seconds
        seconds: f32,

        /// Write the message to the serial port instead of printing it
        #[arg(long)]
        send: bool,
    },

    /// Parse a hex token stream back into motor blocks or a time message
    Decode {
        /// Only show the parameters for this device address (e.g. 00:01)
        #[arg(short, long)]
        address: Option<String>,

        /// Print the whole frame as JSON
        #[arg(long)]
        json: bool,

        /// Hex tokens; read from stdin when omitted
        text: Option<String>,
    },

    /// Generate configuration file
    Config {
        /// Output path for configuration file
        #[arg(short, long, default_value = "motormsg.toml")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the hex stream
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    match cli.command {
        Commands::Hex => {
            let config = AppConfig::load_from_file(&cli.config)?;
            let frame = build_frame(&config)?;
            println!("{}", hex_render::render(frame.as_bytes(), &config.hex));
            Ok(())
        }

        Commands::Send { port, baud, no_reply } => {
            let mut config = AppConfig::load_from_file(&cli.config)?;
            if let Some(port) = port {
                config.serial.port = port;
            }
            if let Some(baud) = baud {
                config.serial.baud_rate = baud;
            }
            send_frame(&config, !no_reply)
        }

        Commands::Time { seconds, send } => {
            let config = AppConfig::load_or_default(&cli.config)?;
            if send {
                send_time(&config, seconds)
            } else {
                println!("{}", render_time(&config, seconds));
                Ok(())
            }
        }

        Commands::Decode { address, json, text } => {
            let config = AppConfig::load_or_default(&cli.config)?;
            let text = match text {
                Some(text) => text,
                None => std::io::read_to_string(std::io::stdin())
                    .context("Failed to read hex tokens from stdin")?,
            };
            let address = address.as_deref().map(parse_address).transpose()?;
            print!("{}", decode_frame(&text, &config, address, json)?);
            Ok(())
        }

        Commands::Config { output } => generate_config_file(output),
    }
}

/// Encode the configured motor table
fn build_frame(config: &AppConfig) -> Result<Frame> {
    let message_type = config.message_type()?;
    let motors = config.motor_records()?;
    let frame = encode(message_type, &motors)?;

    info!("Built {} byte frame for {} motor(s)", frame.len(), frame.motor_count());
    Ok(frame)
}

/// Encode, send and optionally wait for the echo
fn send_frame(config: &AppConfig, await_reply: bool) -> Result<()> {
    let frame = build_frame(config)?;
    let mut link = SerialTransport::open(&config.serial)?;

    info!(
        "Writing {} to {}",
        hex_render::render(frame.as_bytes(), &config.hex).trim_end(),
        link.name()
    );

    let reply_timeout = if await_reply {
        Some(config.serial.timeout()?)
    } else {
        None
    };
    let reply = transport::exchange(&mut link, &frame, reply_timeout)?;

    if let Some(reply) = reply {
        println!("{}", hex_render::render(&reply, &config.hex));
    }

    info!("Finished, closing {}", link.name());
    Ok(())
}

fn render_time(config: &AppConfig, seconds: f32) -> String {
    hex_render::render(&time_sync::encode_time(seconds), &config.hex)
}

/// Time messages get no echo worth waiting for
fn send_time(config: &AppConfig, seconds: f32) -> Result<()> {
    let mut link = SerialTransport::open(&config.serial)?;
    link.send(&time_sync::encode_time(seconds))?;

    info!("Sent time {} s to {}", seconds, link.name());
    Ok(())
}

/// Render a decoded hex stream for the terminal
fn decode_frame(
    text: &str,
    config: &AppConfig,
    address: Option<DeviceAddress>,
    json: bool,
) -> Result<String> {
    let bytes = hex_render::parse(text, &config.hex)?;
    if bytes.starts_with(&TIME_MSG) {
        let seconds = time_sync::decode_time(&bytes)?;
        return Ok(format!("time {}\n", seconds));
    }

    let frame = Frame::parse(&bytes)?;

    if json {
        return Ok(format!("{}\n", frame.to_json()?));
    }

    if let Some(address) = address {
        return match frame.find(address) {
            Some(params) => Ok(format!(
                "{}: amplitude={} frequency={} phase_shift={}\n",
                address, params.amplitude, params.frequency, params.phase_shift
            )),
            None => bail!("No block for device {} in frame", address),
        };
    }

    let mut out = format!("type {} with {} motor(s)\n", frame.message_type(), frame.motor_count());
    for block in frame.blocks() {
        let params = block.params();
        out.push_str(&format!(
            "{}: amplitude={} frequency={} phase_shift={}\n",
            block.address, params.amplitude, params.frequency, params.phase_shift
        ));
    }
    Ok(out)
}

/// Parse `AA:BB` or `AABB` into a device address
fn parse_address(text: &str) -> Result<DeviceAddress> {
    let digits: String = text.chars().filter(|c| *c != ':').collect();
    let bytes = hex::decode(&digits).with_context(|| format!("Invalid device address: {}", text))?;
    Ok(DeviceAddress::try_from(bytes.as_slice())?)
}

/// Generate a default configuration file
fn generate_config_file(output_path: PathBuf) -> Result<()> {
    let config = AppConfig::new();
    config.save_to_file(&output_path)?;

    eprintln!("✅ Generated configuration file: {}", output_path.display());
    eprintln!("📝 Edit the motor table, then run:");
    eprintln!("   motormsg --config {} hex", output_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use motor_frame::EncodingError;

    const REFERENCE: &str = "$FF $FF $00 $01 $F4 $01 $FA $00 $00 $00 ";

    fn single_motor_config() -> AppConfig {
        let mut config = AppConfig::new();
        config.motors.truncate(1);
        config
    }

    #[test]
    fn test_build_frame_from_defaults() {
        let frame = build_frame(&AppConfig::new()).unwrap();
        assert_eq!(frame.len(), 2 + 8 * 3);
        assert_eq!(
            hex_render::render(&frame.as_bytes()[..10], &AppConfig::new().hex),
            REFERENCE
        );
    }

    #[test]
    fn test_build_frame_rejects_seven_motors() {
        let mut config = AppConfig::new();
        while config.motors.len() < 7 {
            let n = config.motors.len() as u8 + 1;
            config.motors.push(config::MotorConfig::new("x", [0x00, n], 0.0, 0.0, 0.0));
        }

        let err = build_frame(&config).unwrap_err();
        assert_eq!(
            err.downcast_ref::<EncodingError>(),
            Some(&EncodingError::TooManyMotors { count: 7, max: 6 })
        );
    }

    #[test]
    fn test_decode_lists_blocks() {
        let out = decode_frame(REFERENCE, &single_motor_config(), None, false).unwrap();
        assert_eq!(
            out,
            "type FFFF with 1 motor(s)\n00:01: amplitude=1 frequency=0.5 phase_shift=0\n"
        );
    }

    #[test]
    fn test_decode_by_address() {
        let config = single_motor_config();
        let out = decode_frame(REFERENCE, &config, Some(DeviceAddress::new(0, 1)), false).unwrap();
        assert_eq!(out, "00:01: amplitude=1 frequency=0.5 phase_shift=0\n");

        assert!(decode_frame(REFERENCE, &config, Some(DeviceAddress::new(0, 2)), false).is_err());
    }

    #[test]
    fn test_decode_rejects_truncated_stream() {
        assert!(decode_frame("$FF $FF $00", &AppConfig::new(), None, false).is_err());
    }

    #[test]
    fn test_time_message_rendering() {
        let config = AppConfig::new();
        assert_eq!(render_time(&config, 1.0), "$FE $FF $00 $00 $80 $3F ");
    }

    #[test]
    fn test_decode_time_message() {
        let config = AppConfig::new();
        let text = render_time(&config, 12.5);
        assert_eq!(decode_frame(&text, &config, None, false).unwrap(), "time 12.5\n");

        assert!(decode_frame("$FE $FF $00", &config, None, false).is_err());
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("00:01").unwrap(), DeviceAddress::new(0x00, 0x01));
        assert_eq!(parse_address("0A0B").unwrap(), DeviceAddress::new(0x0A, 0x0B));
        assert!(parse_address("00:01:02").is_err());
        assert!(parse_address("zz").is_err());
    }
}
