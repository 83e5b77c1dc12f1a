/*!
Configuration management for the motor message generator.
*/

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use motor_frame::{
    DeviceAddress, EncodingError, HexStyle, MessageType, MotorRecord, ParameterSet, SerialSettings,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub frame: FrameConfig,
    pub serial: SerialSettings,
    pub hex: HexStyle,
    /// Motor table, encoded in file order
    pub motors: Vec<MotorConfig>,
}

impl AppConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            frame: FrameConfig::default(),
            serial: SerialSettings::default(),
            hex: HexStyle::default(),
            motors: vec![
                MotorConfig::new("a", [0x00, 0x01], 1.0, 0.5, 0.0),
                MotorConfig::new("b", [0x00, 0x02], 0.0, 0.0, 0.0),
                MotorConfig::new("c", [0x00, 0x03], 0.0, 0.0, 0.0),
            ],
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        Ok(config)
    }

    /// Load the file if there is one, defaults otherwise. A file that exists
    /// but does not parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            info!("No config at {}, using defaults", path.as_ref().display());
            return Ok(Self::new());
        }
        Self::load_from_file(path)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    pub fn message_type(&self) -> Result<MessageType, EncodingError> {
        MessageType::try_from(self.frame.message_type.as_slice())
    }

    /// Typed motor records in file order.
    ///
    /// Duplicate addresses are only warned about: two blocks with the same
    /// address are legal on the wire, the end device just takes the first.
    pub fn motor_records(&self) -> Result<Vec<MotorRecord>, EncodingError> {
        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(self.motors.len());

        for motor in &self.motors {
            let record = motor.to_record()?;
            if !seen.insert(record.address) {
                warn!(
                    "Motor '{}' reuses device address {}; only the first block will be used",
                    record.id, record.address
                );
            }
            records.push(record);
        }

        Ok(records)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame specific configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Message type discriminator. Must match the end devices' network config.
    pub message_type: Vec<u8>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            message_type: MessageType::MOTOR.as_bytes().to_vec(),
        }
    }
}

/// One motor entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorConfig {
    pub id: String,

    /// Last two bytes of the end device's link address
    pub address: Vec<u8>,

    pub amplitude: f64,
    pub frequency: f64,
    pub phase_shift: f64,
}

impl MotorConfig {
    pub fn new(id: &str, address: [u8; 2], amplitude: f64, frequency: f64, phase_shift: f64) -> Self {
        Self {
            id: id.to_string(),
            address: address.to_vec(),
            amplitude,
            frequency,
            phase_shift,
        }
    }

    pub fn to_record(&self) -> Result<MotorRecord, EncodingError> {
        let address = DeviceAddress::try_from(self.address.as_slice())?;
        Ok(MotorRecord::new(
            self.id.as_str(),
            address,
            ParameterSet::new(self.amplitude, self.frequency, self.phase_shift),
        ))
    }
}
