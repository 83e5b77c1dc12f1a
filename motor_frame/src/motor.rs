/*!
Motor data model: identifiers, device addresses, message types and parameters.
*/

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EncodingError;
use crate::protocol::{ADDRESS_LEN, HEADER_LEN, MOTOR_MSG, TIME_MSG};

/// Two-byte discriminator at the head of every message on the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageType(pub [u8; 2]);

impl MessageType {
    pub const MOTOR: Self = Self(MOTOR_MSG);
    pub const TIME: Self = Self(TIME_MSG);

    pub fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }
}

impl TryFrom<&[u8]> for MessageType {
    type Error = EncodingError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; HEADER_LEN] = bytes
            .try_into()
            .map_err(|_| EncodingError::InvalidMessageTypeLength(bytes.len()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}", self.0[0], self.0[1])
    }
}

/// Address of an end device: the last two bytes of its link address.
///
/// Must match the address the end device was provisioned with. The encoder
/// has no way to check this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceAddress(pub [u8; 2]);

impl DeviceAddress {
    pub const fn new(high: u8, low: u8) -> Self {
        Self([high, low])
    }

    pub fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }
}

impl TryFrom<&[u8]> for DeviceAddress {
    type Error = EncodingError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| EncodingError::InvalidAddressLength(bytes.len()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}:{:02X}", self.0[0], self.0[1])
    }
}

/// Key tying an address to a parameter set (single letters in practice)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MotorId(pub String);

impl MotorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for MotorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three control parameters, in wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parameter {
    Amplitude,
    Frequency,
    PhaseShift,
}

impl Parameter {
    pub const ALL: [Parameter; 3] = [Self::Amplitude, Self::Frequency, Self::PhaseShift];
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Amplitude => "amplitude",
            Self::Frequency => "frequency",
            Self::PhaseShift => "phase_shift",
        };
        f.write_str(name)
    }
}

/// Sinusoid driving one motor
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterSet {
    pub amplitude: f64,
    pub frequency: f64,
    pub phase_shift: f64,
}

impl ParameterSet {
    pub fn new(amplitude: f64, frequency: f64, phase_shift: f64) -> Self {
        Self {
            amplitude,
            frequency,
            phase_shift,
        }
    }

    /// Value of a single parameter
    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Amplitude => self.amplitude,
            Parameter::Frequency => self.frequency,
            Parameter::PhaseShift => self.phase_shift,
        }
    }
}

/// One entry of the ordered motor table fed to the encoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorRecord {
    pub id: MotorId,
    pub address: DeviceAddress,
    pub params: ParameterSet,
}

impl MotorRecord {
    pub fn new(id: impl Into<String>, address: DeviceAddress, params: ParameterSet) -> Self {
        Self {
            id: MotorId::new(id),
            address,
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_from_slice() {
        let addr = DeviceAddress::try_from(&[0x00, 0x01][..]).unwrap();
        assert_eq!(addr, DeviceAddress::new(0x00, 0x01));
        assert_eq!(addr.to_string(), "00:01");

        assert_eq!(
            DeviceAddress::try_from(&[0x00][..]),
            Err(EncodingError::InvalidAddressLength(1))
        );
        assert_eq!(
            DeviceAddress::try_from(&[0x00, 0x01, 0x02][..]),
            Err(EncodingError::InvalidAddressLength(3))
        );
    }

    #[test]
    fn test_message_type_from_slice() {
        assert_eq!(MessageType::try_from(&[0xFF, 0xFF][..]), Ok(MessageType::MOTOR));
        assert_eq!(MessageType::TIME.to_string(), "FEFF");
        assert_eq!(
            MessageType::try_from(&[0u8; 0][..]),
            Err(EncodingError::InvalidMessageTypeLength(0))
        );
    }

    #[test]
    fn test_parameter_lookup() {
        let params = ParameterSet::new(1.0, 0.5, 0.25);
        let values: Vec<f64> = Parameter::ALL.iter().map(|p| params.get(*p)).collect();
        assert_eq!(values, vec![1.0, 0.5, 0.25]);
    }
}
