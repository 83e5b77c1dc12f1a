/*!
Error types for frame encoding, decoding and transport.
*/

use std::time::Duration;

use thiserror::Error;

use crate::motor::Parameter;

/// Common result type used throughout the library
pub type Result<T> = std::result::Result<T, FrameError>;

/// Errors raised while building a frame. No bytes are produced when one occurs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodingError {
    #[error("Too many motors: a frame carries at most {max}, got {count}")]
    TooManyMotors { count: usize, max: usize },

    #[error("Invalid device address length: expected 2 bytes, got {0}")]
    InvalidAddressLength(usize),

    #[error("Invalid message type length: expected 2 bytes, got {0}")]
    InvalidMessageTypeLength(usize),

    #[error("Quantization overflow: {parameter} = {value} does not fit in 0..=65535 once scaled")]
    QuantizationOverflow { parameter: Parameter, value: f64 },
}

impl EncodingError {
    /// True for errors caused by the shape of the input rather than its values
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::QuantizationOverflow { .. })
    }
}

/// Errors raised while interpreting bytes or hex text received from elsewhere
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Invalid frame length {0}: expected 2 + 8 * N bytes with N <= 6")]
    InvalidFrameLength(usize),

    #[error("Invalid time message length: expected 6 bytes, got {0}")]
    InvalidTimeLength(usize),

    #[error("Unexpected message type {found:02X?}, expected {expected:02X?}")]
    UnexpectedMessageType { found: [u8; 2], expected: [u8; 2] },

    #[error("Invalid hex token {token:?}: {reason}")]
    InvalidHexToken { token: String, reason: String },
}

/// Errors raised by the link to the access point
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to open {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Invalid {setting}: {value} is not a usable number of seconds")]
    InvalidTimeout { setting: &'static str, value: f64 },

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Map an I/O error, turning timeouts into [`TransportError::Timeout`]
    pub fn from_io(err: std::io::Error, timeout: Duration) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => Self::Timeout(timeout),
            _ => Self::Io(err),
        }
    }
}

/// Umbrella error type for all library operations
#[derive(Error, Debug)]
pub enum FrameError {
    /// Frame encoding errors
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Frame or hex decoding errors
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Serial link errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
